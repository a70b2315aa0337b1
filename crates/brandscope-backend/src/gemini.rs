//! Google Generative Language (Gemini) REST backend
//!
//! Structured requests ask for `application/json` constrained by the output
//! contract's JSON Schema. Media requests go to the image model with text and
//! image response modalities; inline image parts come back as `data:` URIs.

use crate::backend::GenerationBackend;
use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::request::{GenerationRequest, GenerationResponse, MediaOutput};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Longest error body kept in [`BackendError::Status`]
const MAX_ERROR_BODY: usize = 512;

/// Gemini API client
#[derive(Debug, Clone)]
pub struct GeminiBackend {
    config: BackendConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GeminiGenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    role: &'static str,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_json_schema: Option<&'a Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    prompt_feedback: Option<GeminiPromptFeedback>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiCandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidateContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    inline_data: Option<GeminiInlineData>,
    #[serde(default)]
    thought: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: Option<u32>,
    #[serde(default)]
    candidates_token_count: Option<u32>,
    #[serde(default)]
    total_token_count: Option<u32>,
}

impl GeminiBackend {
    /// Create a new Gemini client
    ///
    /// # Errors
    /// [`BackendError::Configuration`] without an API key or when the HTTP
    /// client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, BackendError> {
        config.ensure_key()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BackendError::Configuration(e.to_string()))?;
        Ok(Self { config, client })
    }

    #[inline]
    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    fn model_for(&self, request: &GenerationRequest) -> &str {
        if request.is_media() {
            &self.config.image_model
        } else {
            &self.config.text_model
        }
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }
}

fn request_body<'a>(request: &'a GenerationRequest, config: &BackendConfig) -> GeminiRequest<'a> {
    let generation_config = match request {
        GenerationRequest::Structured {
            response_schema, ..
        } => GeminiGenerationConfig {
            temperature: config.temperature,
            response_mime_type: Some("application/json"),
            response_json_schema: Some(response_schema),
            ..GeminiGenerationConfig::default()
        },
        GenerationRequest::Media { .. } => GeminiGenerationConfig {
            response_modalities: vec!["TEXT", "IMAGE"],
            ..GeminiGenerationConfig::default()
        },
    };

    GeminiRequest {
        contents: vec![GeminiContent {
            role: "user",
            parts: vec![GeminiPart {
                text: request.prompt(),
            }],
        }],
        generation_config,
    }
}

fn into_response(parsed: GeminiResponse) -> Result<GenerationResponse, BackendError> {
    if let Some(reason) = parsed.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(BackendError::Blocked(reason));
    }

    let Some(candidate) = parsed.candidates.into_iter().next() else {
        return Ok(GenerationResponse::default());
    };

    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();
    if parts.is_empty() {
        if let Some(reason) = candidate
            .finish_reason
            .filter(|r| matches!(r.as_str(), "SAFETY" | "PROHIBITED_CONTENT" | "BLOCKLIST"))
        {
            return Err(BackendError::Blocked(reason));
        }
    }

    let mut text = String::new();
    let mut media = Vec::new();
    for part in parts.into_iter().filter(|p| !p.thought) {
        if let Some(chunk) = part.text {
            text.push_str(&chunk);
        }
        if let Some(inline) = part.inline_data {
            media.push(MediaOutput::inline(inline.mime_type, &inline.data));
        }
    }

    Ok(GenerationResponse {
        text: (!text.is_empty()).then_some(text),
        media,
    })
}

fn truncate(mut body: String) -> String {
    if body.len() > MAX_ERROR_BODY {
        let cut = (0..=MAX_ERROR_BODY)
            .rev()
            .find(|i| body.is_char_boundary(*i))
            .unwrap_or(0);
        body.truncate(cut);
        body.push('…');
    }
    body
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    #[tracing::instrument(skip_all, fields(model = %self.model_for(&request), media = request.is_media()))]
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, BackendError> {
        let model = self.model_for(&request);
        let url = self.endpoint(model);
        let body = request_body(&request, &self.config);

        debug!(prompt_len = request.prompt().len(), "sending Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;
        debug!(%status, "Gemini API response");

        if !status.is_success() {
            error!(%status, "Gemini API error");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: truncate(response_text),
            });
        }

        let parsed: GeminiResponse = serde_json::from_str(&response_text).map_err(|e| {
            warn!("failed to parse Gemini response: {}", e);
            BackendError::InvalidResponse(e.to_string())
        })?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                prompt_tokens = ?usage.prompt_token_count,
                response_tokens = ?usage.candidates_token_count,
                total_tokens = ?usage.total_token_count,
                "Gemini usage"
            );
        }

        into_response(parsed)
    }

    fn name(&self) -> &'static str {
        "gemini"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn backend() -> GeminiBackend {
        GeminiBackend::new(BackendConfig::new().with_api_key("test-key")).unwrap()
    }

    fn parse(value: Value) -> Result<GenerationResponse, BackendError> {
        into_response(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn client_requires_key() {
        assert!(matches!(
            GeminiBackend::new(BackendConfig::new()),
            Err(BackendError::Configuration(_))
        ));
    }

    #[test]
    fn endpoint_per_modality() {
        let backend = backend();
        let text = GenerationRequest::structured("p", json!({}));
        let media = GenerationRequest::media("p");
        assert_eq!(
            backend.endpoint(backend.model_for(&text)),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert!(backend
            .endpoint(backend.model_for(&media))
            .contains("gemini-2.0-flash-preview-image-generation"));
    }

    #[test]
    fn structured_body_carries_schema() {
        let config = BackendConfig::new().with_api_key("k").with_temperature(0.5);
        let request = GenerationRequest::structured("Analyze Acme", json!({ "type": "object" }));
        let body = serde_json::to_value(request_body(&request, &config)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Analyze Acme" }] }],
                "generationConfig": {
                    "temperature": 0.5,
                    "responseMimeType": "application/json",
                    "responseJsonSchema": { "type": "object" }
                }
            })
        );
    }

    #[test]
    fn media_body_requests_image_modality() {
        let request = GenerationRequest::media("A headshot");
        let body = serde_json::to_value(request_body(&request, &BackendConfig::new())).unwrap();
        assert_eq!(
            body["generationConfig"],
            json!({ "responseModalities": ["TEXT", "IMAGE"] })
        );
    }

    #[test]
    fn text_parts_are_concatenated() {
        let response = parse(json!({
            "candidates": [{
                "content": { "parts": [
                    { "text": "thinking", "thought": true },
                    { "text": "{\"summary\":" },
                    { "text": "\"ok\"}" }
                ]},
                "finishReason": "STOP"
            }],
            "usageMetadata": { "promptTokenCount": 10 }
        }))
        .unwrap();
        assert_eq!(response.text.as_deref(), Some("{\"summary\":\"ok\"}"));
        assert!(response.media.is_empty());
    }

    #[test]
    fn inline_image_becomes_data_uri() {
        let response = parse(json!({
            "candidates": [{ "content": { "parts": [
                { "text": "Here is the portrait" },
                { "inlineData": { "mimeType": "image/png", "data": "AAAA" } }
            ]}}]
        }))
        .unwrap();
        assert_eq!(response.media, vec![MediaOutput::inline("image/png", "AAAA")]);
    }

    #[test]
    fn blocked_prompt_is_error() {
        let err = parse(json!({ "promptFeedback": { "blockReason": "SAFETY" } })).unwrap_err();
        assert_eq!(err, BackendError::Blocked("SAFETY".into()));

        let err = parse(json!({ "candidates": [{ "finishReason": "SAFETY" }] })).unwrap_err();
        assert_eq!(err, BackendError::Blocked("SAFETY".into()));
    }

    #[test]
    fn no_candidates_is_empty_response() {
        let response = parse(json!({})).unwrap();
        assert_eq!(response, GenerationResponse::default());
    }

    #[test]
    fn long_error_bodies_are_truncated() {
        let body = truncate("x".repeat(2000));
        assert!(body.len() <= MAX_ERROR_BODY + '…'.len_utf8());
        assert!(body.ends_with('…'));
    }

    #[tokio::test]
    #[ignore = "Requires GEMINI_API_KEY environment variable"]
    async fn gemini_integration() {
        let backend = GeminiBackend::new(BackendConfig::from_env().unwrap()).unwrap();
        let request = GenerationRequest::structured(
            "Summarize the coffee market in one sentence.",
            json!({
                "type": "object",
                "properties": { "summary": { "type": "string" } },
                "required": ["summary"]
            }),
        );
        let response = backend.generate(request).await.unwrap();
        assert!(response.non_empty_text().is_some());
    }
}
