//! Backend failures

/// A generation call that did not produce a response
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Connection, DNS, TLS or timeout failure
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// Model refused the prompt
    #[error("prompt blocked: {0}")]
    Blocked(String),

    /// Successful status with a body that is not a generation response
    #[error("invalid backend response: {0}")]
    InvalidResponse(String),

    /// Missing credentials or unusable settings
    #[error("backend configuration error: {0}")]
    Configuration(String),
}

impl BackendError {
    /// Check if a retry could plausibly succeed
    #[inline]
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Blocked(_) | Self::InvalidResponse(_) | Self::Configuration(_) => false,
        }
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => Self::Status {
                status: status.as_u16(),
                body: err.to_string(),
            },
            None if err.is_decode() => Self::InvalidResponse(err.to_string()),
            None => Self::Transport(err.to_string()),
        }
    }
}
