//! Flow executor
//!
//! Turns one rendered prompt into one schema-valid JSON value. The executor
//! owns the backend handle; flows own templates, guards and typed decoding.

use crate::config::EngineConfig;
use crate::error::{EngineError, OutputViolation, ResponsePart};
use brandscope_backend::{GenerationBackend, GenerationRequest, MediaOutput};
use brandscope_schema::Schema;
use brandscope_template::Template;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Media prompt rendered from a flow's validated text output
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInstruction {
    template: Template,
}

impl MediaInstruction {
    /// Compile against the output schema of the text step
    ///
    /// # Errors
    /// [`EngineError::Template`] when the template references fields the
    /// output schema does not declare.
    pub fn compile(source: &str, output_schema: &Schema) -> Result<Self, EngineError> {
        Ok(Self {
            template: Template::compile(source, output_schema)?,
        })
    }

    #[inline]
    #[must_use]
    pub fn render(&self, output: &Value) -> String {
        self.template.render(output)
    }
}

/// One execution: prompt, output contract and optional media step
#[derive(Debug, Clone, Copy)]
pub struct ExecutionRequest<'a> {
    pub flow: &'a str,
    pub prompt: &'a str,
    pub schema: &'a Schema,
    pub media: Option<&'a MediaInstruction>,
}

impl<'a> ExecutionRequest<'a> {
    #[inline]
    #[must_use]
    pub fn new(flow: &'a str, prompt: &'a str, schema: &'a Schema) -> Self {
        Self {
            flow,
            prompt,
            schema,
            media: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_media(mut self, media: &'a MediaInstruction) -> Self {
        self.media = Some(media);
        self
    }
}

/// Schema-valid output of one execution
#[derive(Debug, Clone, PartialEq)]
pub struct Generation {
    pub value: Value,
    pub media: Option<MediaOutput>,
}

/// Executes bound prompts against a shared backend
///
/// Cheap to clone; every flow holds its own copy.
#[derive(Clone)]
pub struct FlowExecutor {
    backend: Arc<dyn GenerationBackend>,
    config: EngineConfig,
}

impl fmt::Debug for FlowExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowExecutor")
            .field("backend", &self.backend.name())
            .field("config", &self.config)
            .finish()
    }
}

impl FlowExecutor {
    #[must_use]
    pub fn new(backend: Arc<dyn GenerationBackend>, config: EngineConfig) -> Self {
        Self { backend, config }
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run one structured call, plus one media call when requested
    ///
    /// The text step is checked in order: missing text, code fences stripped,
    /// JSON syntax, then the output schema. The media prompt is rendered from
    /// the validated value. No retries.
    ///
    /// # Errors
    /// [`EngineError::Transport`], [`EngineError::EmptyResponse`] or
    /// [`EngineError::OutputContract`], each naming `request.flow`.
    pub async fn execute(&self, request: ExecutionRequest<'_>) -> Result<Generation, EngineError> {
        let flow = request.flow;
        debug!(flow, prompt_len = request.prompt.len(), "executing prompt");
        if self.config.log_prompts {
            debug!(flow, prompt = request.prompt, "rendered prompt");
        }

        let response = self
            .backend
            .generate(GenerationRequest::structured(
                request.prompt,
                request.schema.to_json_schema(),
            ))
            .await
            .map_err(|source| {
                error!(flow, error = %source, "backend call failed");
                EngineError::Transport {
                    flow: flow.to_string(),
                    source,
                }
            })?;

        let text = response
            .non_empty_text()
            .ok_or_else(|| EngineError::EmptyResponse {
                flow: flow.to_string(),
                part: ResponsePart::Text,
            })?;

        let value = parse_output(flow, request.schema, text)?;

        let media = match request.media {
            Some(instruction) => Some(self.generate_media(flow, instruction, &value).await?),
            None => None,
        };

        Ok(Generation { value, media })
    }

    async fn generate_media(
        &self,
        flow: &str,
        instruction: &MediaInstruction,
        value: &Value,
    ) -> Result<MediaOutput, EngineError> {
        let prompt = instruction.render(value);
        debug!(flow, prompt_len = prompt.len(), "requesting media");

        let response = self
            .backend
            .generate(GenerationRequest::media(prompt))
            .await
            .map_err(|source| {
                error!(flow, error = %source, "media call failed");
                EngineError::Transport {
                    flow: flow.to_string(),
                    source,
                }
            })?;

        response
            .media
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::EmptyResponse {
                flow: flow.to_string(),
                part: ResponsePart::Media,
            })
    }
}

fn parse_output(flow: &str, schema: &Schema, text: &str) -> Result<Value, EngineError> {
    let reject = |source: OutputViolation| {
        warn!(flow, error = %source, "model output rejected");
        EngineError::OutputContract {
            flow: flow.to_string(),
            source,
        }
    };

    let value: Value = serde_json::from_str(strip_code_fence(text))
        .map_err(|e| reject(OutputViolation::Malformed(e)))?;
    schema
        .validate(&value)
        .map_err(|e| reject(OutputViolation::Schema(e)))?;
    Ok(value)
}

/// Remove a surrounding Markdown code fence, with or without a language tag
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string on the opening line
    match body.find('\n') {
        Some(newline) if !body[..newline].contains(['{', '[']) => body[newline + 1..].trim(),
        _ => body.trim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use brandscope_backend::{BackendError, GenerationResponse};
    use brandscope_schema::FieldKind;
    use mockall::mock;
    use mockall::predicate::function;
    use serde_json::json;

    mock! {
        pub Backend {}

        #[async_trait]
        impl GenerationBackend for Backend {
            async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, BackendError>;
            fn name(&self) -> &'static str;
        }
    }

    fn summary_schema() -> Schema {
        Schema::object("MarketResearch").required("summary", FieldKind::string())
    }

    fn executor(backend: MockBackend) -> FlowExecutor {
        FlowExecutor::new(Arc::new(backend), EngineConfig::new())
    }

    fn text_reply(text: &'static str) -> MockBackend {
        let mut backend = MockBackend::new();
        backend
            .expect_generate()
            .times(1)
            .returning(move |_| Ok(GenerationResponse::text(text)));
        backend
    }

    #[tokio::test]
    async fn one_call_returns_valid_value() {
        let mut backend = MockBackend::new();
        backend
            .expect_generate()
            .with(function(|req: &GenerationRequest| {
                matches!(req, GenerationRequest::Structured { prompt, response_schema }
                    if prompt == "Summarize" && response_schema["required"] == json!(["summary"]))
            }))
            .times(1)
            .returning(|_| Ok(GenerationResponse::text(r#"{"summary":"Growing market"}"#)));

        let schema = summary_schema();
        let generation = executor(backend)
            .execute(ExecutionRequest::new("generate-market-research", "Summarize", &schema))
            .await
            .unwrap();
        assert_eq!(generation.value, json!({ "summary": "Growing market" }));
        assert!(generation.media.is_none());
    }

    #[tokio::test]
    async fn fenced_json_is_accepted() {
        let schema = summary_schema();
        let generation = executor(text_reply("```json\n{\"summary\":\"ok\"}\n```"))
            .execute(ExecutionRequest::new("f", "p", &schema))
            .await
            .unwrap();
        assert_eq!(generation.value["summary"], "ok");
    }

    #[tokio::test]
    async fn blank_text_is_empty_response() {
        let schema = summary_schema();
        let err = executor(text_reply("   "))
            .execute(ExecutionRequest::new("f", "p", &schema))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::EmptyResponse {
                part: ResponsePart::Text,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn non_json_is_malformed() {
        let schema = summary_schema();
        let err = executor(text_reply("Here is your analysis"))
            .execute(ExecutionRequest::new("f", "p", &schema))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::OutputContract {
                source: OutputViolation::Malformed(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn schema_violation_is_reported() {
        let schema = summary_schema();
        let err = executor(text_reply(r#"{"summary": 3}"#))
            .execute(ExecutionRequest::new("f", "p", &schema))
            .await
            .unwrap_err();
        let EngineError::OutputContract {
            source: OutputViolation::Schema(violations),
            ..
        } = err
        else {
            panic!("expected schema violation, got {err:?}");
        };
        assert!(violations.at("summary").is_some());
    }

    #[tokio::test]
    async fn transport_error_is_classified() {
        let mut backend = MockBackend::new();
        backend.expect_generate().times(1).returning(|_| {
            Err(BackendError::Status {
                status: 503,
                body: "overloaded".into(),
            })
        });
        let schema = summary_schema();
        let err = executor(backend)
            .execute(ExecutionRequest::new("f", "p", &schema))
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Transport { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn media_prompt_is_rendered_from_output() {
        let schema = Schema::object("Portrait").required("story", FieldKind::string());
        let media = MediaInstruction::compile("Headshot of: {{story}}", &schema).unwrap();

        let mut backend = MockBackend::new();
        let mut seq = mockall::Sequence::new();
        backend
            .expect_generate()
            .withf(|req| !req.is_media())
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| Ok(GenerationResponse::text(r#"{"story":"a baker"}"#)));
        backend
            .expect_generate()
            .withf(|req| req.is_media() && req.prompt() == "Headshot of: a baker")
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_| {
                Ok(GenerationResponse::default()
                    .with_media(MediaOutput::inline("image/png", "AAAA")))
            });

        let generation = executor(backend)
            .execute(ExecutionRequest::new("f", "p", &schema).with_media(&media))
            .await
            .unwrap();
        assert_eq!(
            generation.media.map(|m| m.url).as_deref(),
            Some("data:image/png;base64,AAAA")
        );
    }

    #[tokio::test]
    async fn missing_media_is_empty_response() {
        let schema = Schema::object("Portrait").required("story", FieldKind::string());
        let media = MediaInstruction::compile("{{story}}", &schema).unwrap();

        let mut backend = MockBackend::new();
        backend
            .expect_generate()
            .times(2)
            .returning(|req| {
                Ok(if req.is_media() {
                    GenerationResponse::text("no image today")
                } else {
                    GenerationResponse::text(r#"{"story":"s"}"#)
                })
            });

        let err = executor(backend)
            .execute(ExecutionRequest::new("f", "p", &schema).with_media(&media))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::EmptyResponse {
                part: ResponsePart::Media,
                ..
            }
        ));
    }

    #[test]
    fn media_template_is_checked_against_output() {
        let err = MediaInstruction::compile("{{portrait}}", &summary_schema()).unwrap_err();
        assert!(matches!(err, EngineError::Template(_)));
    }

    #[test]
    fn code_fences() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("```{\"a\":1}```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{"), "```json\n{");
    }
}
