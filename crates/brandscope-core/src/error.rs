//! Error types for the generation engine
//!
//! Every failure a flow can report is classified here:
//! - Contract violations on the way in or out
//! - Transport failures from the backend
//! - Empty model responses
//! - Stage and fan-out failures from composite reports

use brandscope_backend::BackendError;
use brandscope_composition::FanOutError;
use brandscope_schema::ValidationError;
use brandscope_template::TemplateError;
use std::fmt::{self, Display, Formatter};

/// Main engine error type
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Caller-supplied input broke the flow's input schema; no backend call was made
    #[error("flow '{flow}' input rejected: {source}")]
    InputContract {
        flow: String,
        source: ValidationError,
    },

    /// Model output could not be turned into the declared output
    #[error("flow '{flow}' output rejected: {source}")]
    OutputContract {
        flow: String,
        source: OutputViolation,
    },

    /// Backend call failed
    #[error("flow '{flow}' transport failure: {source}")]
    Transport { flow: String, source: BackendError },

    /// Backend answered without the expected part
    #[error("flow '{flow}' got an empty {part} response")]
    EmptyResponse { flow: String, part: ResponsePart },

    /// Template failed its construction-time check
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// A step of a sequential composite failed
    #[error("stage '{stage}' failed: {source}")]
    Stage {
        stage: &'static str,
        source: Box<EngineError>,
    },

    /// An item of a parallel composite failed
    #[error("fan-out item {index} failed: {source}")]
    FanOut {
        index: usize,
        source: Box<EngineError>,
    },

    /// No flow registered under this name
    #[error("unknown flow: {0}")]
    UnknownFlow(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

impl EngineError {
    /// Wrap a failure of a composite step
    #[inline]
    #[must_use]
    pub fn stage(stage: &'static str, source: EngineError) -> Self {
        Self::Stage {
            stage,
            source: Box::new(source),
        }
    }

    /// Check if a retry could plausibly succeed
    ///
    /// Only retryable transport failures and empty responses qualify; contract
    /// violations are deterministic for a given model answer.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { source, .. } => source.is_retryable(),
            Self::EmptyResponse { .. } => true,
            Self::Stage { source, .. } | Self::FanOut { source, .. } => source.is_retryable(),
            Self::InputContract { .. }
            | Self::OutputContract { .. }
            | Self::Template(_)
            | Self::UnknownFlow(_)
            | Self::Config(_) => false,
        }
    }

    /// Innermost error, through stage and fan-out wrappers
    #[must_use]
    pub fn root_cause(&self) -> &EngineError {
        match self {
            Self::Stage { source, .. } | Self::FanOut { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Flow the innermost error was raised by, if any
    #[must_use]
    pub fn flow(&self) -> Option<&str> {
        match self.root_cause() {
            Self::InputContract { flow, .. }
            | Self::OutputContract { flow, .. }
            | Self::Transport { flow, .. }
            | Self::EmptyResponse { flow, .. } => Some(flow),
            _ => None,
        }
    }
}

impl From<FanOutError<EngineError>> for EngineError {
    fn from(err: FanOutError<EngineError>) -> Self {
        Self::FanOut {
            index: err.index,
            source: Box::new(err.source),
        }
    }
}

/// Why model output was rejected
#[derive(Debug, thiserror::Error)]
pub enum OutputViolation {
    /// Text was not JSON
    #[error("malformed JSON: {0}")]
    Malformed(serde_json::Error),

    /// JSON broke the output schema
    #[error(transparent)]
    Schema(ValidationError),

    /// Schema-valid JSON that the typed record rejected
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}

/// Which part of a backend response was missing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponsePart {
    Text,
    Media,
}

impl Display for ResponsePart {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Media => "media",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brandscope_schema::{FieldPath, Violation, ViolationKind};

    fn empty(flow: &str) -> EngineError {
        EngineError::EmptyResponse {
            flow: flow.into(),
            part: ResponsePart::Text,
        }
    }

    fn schema_violation() -> EngineError {
        EngineError::OutputContract {
            flow: "generate-4cs-analysis".into(),
            source: OutputViolation::Schema(ValidationError::new(
                "Generate4CsAnalysisOutput",
                vec![Violation::new(
                    FieldPath::key("culture"),
                    ViolationKind::MissingField,
                )],
            )),
        }
    }

    #[test]
    fn retryable_classification() {
        assert!(empty("x").is_retryable());
        assert!(EngineError::Transport {
            flow: "x".into(),
            source: BackendError::Status {
                status: 503,
                body: String::new()
            },
        }
        .is_retryable());
        assert!(!EngineError::Transport {
            flow: "x".into(),
            source: BackendError::Blocked("SAFETY".into()),
        }
        .is_retryable());
        assert!(!schema_violation().is_retryable());
        assert!(!EngineError::UnknownFlow("nope".into()).is_retryable());
    }

    #[test]
    fn wrappers_delegate_retryability() {
        let staged = EngineError::stage("prioritize-actionable-insights", empty("p"));
        assert!(staged.is_retryable());

        let fanned: EngineError = FanOutError::new(1, schema_violation()).into();
        assert!(!fanned.is_retryable());
        assert!(matches!(fanned, EngineError::FanOut { index: 1, .. }));
    }

    #[test]
    fn root_cause_and_flow() {
        let nested = EngineError::stage(
            "generate-category-insights",
            EngineError::FanOut {
                index: 0,
                source: Box::new(empty("generate-personas")),
            },
        );
        assert_eq!(nested.flow(), Some("generate-personas"));
        assert!(matches!(nested.root_cause(), EngineError::EmptyResponse { .. }));
    }

    #[test]
    fn messages_name_the_flow() {
        assert_eq!(
            schema_violation().to_string(),
            "flow 'generate-4cs-analysis' output rejected: \
             'Generate4CsAnalysisOutput' rejected value: culture: missing required field"
        );
        assert_eq!(
            empty("generate-personas").to_string(),
            "flow 'generate-personas' got an empty text response"
        );
    }
}
