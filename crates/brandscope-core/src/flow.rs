//! Flow abstractions
//!
//! [`Flow`] is what callers invoke. [`FlowSpec`] declares a single-prompt flow
//! (name, contracts, template, guard) and [`PromptFlow`] runs it.

use crate::error::{EngineError, OutputViolation};
use crate::executor::{ExecutionRequest, FlowExecutor, MediaInstruction};
use async_trait::async_trait;
use brandscope_backend::MediaOutput;
use brandscope_composition::MergeGuard;
use brandscope_schema::{Contract, ContractError, Schema};
use brandscope_template::Template;
use serde_json::Value;
use std::fmt;
use std::marker::PhantomData;
use tracing::{info, warn};
use ulid::Ulid;

/// A named, stateless unit from typed input to schema-valid typed output
#[async_trait]
pub trait Flow: Send + Sync {
    type Input: Contract;
    type Output: Contract;

    /// Registry name, e.g. `generate-4cs-analysis`
    fn name(&self) -> &'static str;

    /// Run the flow once
    ///
    /// # Errors
    /// Any [`EngineError`]; no partial output is ever returned.
    async fn execute(&self, input: Self::Input) -> Result<Self::Output, EngineError>;
}

/// Declaration of a single-prompt flow
pub trait FlowSpec: Send + Sync + 'static {
    const NAME: &'static str;
    /// Prompt template, checked against `Input::schema()`
    const TEMPLATE: &'static str;
    /// Media prompt, checked against `Output::schema()`
    const MEDIA_TEMPLATE: Option<&'static str> = None;

    type Input: Contract;
    type Output: Contract;

    /// Output fields forced to echo input fields
    fn guard() -> MergeGuard {
        MergeGuard::new()
    }
}

/// Typed output plus the media item, when the flow requests one
#[derive(Debug, Clone, PartialEq)]
pub struct Generated<T> {
    pub output: T,
    pub media: Option<MediaOutput>,
}

/// Runs a [`FlowSpec`]: validate input, render, execute, guard, decode
pub struct PromptFlow<S: FlowSpec> {
    executor: FlowExecutor,
    template: Template,
    media: Option<MediaInstruction>,
    input_schema: Schema,
    output_schema: Schema,
    guard: MergeGuard,
    _spec: PhantomData<fn() -> S>,
}

impl<S: FlowSpec> fmt::Debug for PromptFlow<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PromptFlow")
            .field("name", &S::NAME)
            .field("executor", &self.executor)
            .field("guard", &self.guard)
            .finish_non_exhaustive()
    }
}

impl<S: FlowSpec> PromptFlow<S> {
    /// Compile templates against their schemas
    ///
    /// # Errors
    /// [`EngineError::Template`] if either template references an undeclared
    /// field. This is the only place template errors surface.
    pub fn new(executor: FlowExecutor) -> Result<Self, EngineError> {
        let input_schema = S::Input::schema();
        let output_schema = S::Output::schema();
        let template = Template::compile(S::TEMPLATE, &input_schema)?;
        let media = S::MEDIA_TEMPLATE
            .map(|source| MediaInstruction::compile(source, &output_schema))
            .transpose()?;

        Ok(Self {
            executor,
            template,
            media,
            input_schema,
            output_schema,
            guard: S::guard(),
            _spec: PhantomData,
        })
    }

    #[inline]
    #[must_use]
    pub fn input_schema(&self) -> &Schema {
        &self.input_schema
    }

    #[inline]
    #[must_use]
    pub fn output_schema(&self) -> &Schema {
        &self.output_schema
    }

    /// Prompt text for `input`, without calling the backend
    ///
    /// # Errors
    /// [`EngineError::InputContract`] when validation is enabled and fails.
    pub fn render(&self, input: &S::Input) -> Result<String, EngineError> {
        let value = self.input_value(input)?;
        Ok(self.template.render(&value))
    }

    /// Run the flow and keep the media item
    ///
    /// # Errors
    /// Any [`EngineError`] from validation, execution or decoding.
    #[tracing::instrument(skip_all, fields(flow = S::NAME))]
    pub async fn generate(&self, input: &S::Input) -> Result<Generated<S::Output>, EngineError> {
        let run_id = Ulid::new();
        info!(flow = S::NAME, %run_id, "flow started");

        let input_value = self.input_value(input)?;
        let prompt = self.template.render(&input_value);

        let mut request = ExecutionRequest::new(S::NAME, &prompt, &self.output_schema);
        if let Some(media) = &self.media {
            request = request.with_media(media);
        }
        let generation = self.executor.execute(request).await?;

        let guarded = self.guard.apply(generation.value, &input_value);
        let output = S::Output::decode(guarded).map_err(|err| {
            warn!(flow = S::NAME, error = %err, "guarded output rejected");
            EngineError::OutputContract {
                flow: S::NAME.to_string(),
                source: match err {
                    ContractError::Schema(e) => OutputViolation::Schema(e),
                    ContractError::Decode(e) => OutputViolation::Decode(e),
                },
            }
        })?;

        info!(flow = S::NAME, %run_id, "flow finished");
        Ok(Generated {
            output,
            media: generation.media,
        })
    }

    fn input_value(&self, input: &S::Input) -> Result<Value, EngineError> {
        let value = input
            .to_value()
            .map_err(|e| EngineError::Config(format!("{}: input not serializable: {e}", S::NAME)))?;
        if self.executor.config().validate_input {
            self.input_schema.validate(&value).map_err(|source| {
                warn!(flow = S::NAME, error = %source, "input rejected");
                EngineError::InputContract {
                    flow: S::NAME.to_string(),
                    source,
                }
            })?;
        }
        Ok(value)
    }
}

#[async_trait]
impl<S: FlowSpec> Flow for PromptFlow<S> {
    type Input = S::Input;
    type Output = S::Output;

    fn name(&self) -> &'static str {
        S::NAME
    }

    async fn execute(&self, input: Self::Input) -> Result<Self::Output, EngineError> {
        self.generate(&input).await.map(|generated| generated.output)
    }
}
