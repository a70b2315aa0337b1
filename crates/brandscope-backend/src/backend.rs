//! Backend trait

use crate::error::BackendError;
use crate::request::{GenerationRequest, GenerationResponse};
use async_trait::async_trait;

/// One generation call against a model
///
/// Implementations must be safe to share across concurrently running flows;
/// the engine holds one handle behind an `Arc` and never locks around it.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Perform exactly one request
    ///
    /// # Errors
    /// [`BackendError`] for transport, status and refusal failures. An empty
    /// but successful response is not an error here; callers classify it.
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, BackendError>;

    /// Backend identifier for logs
    fn name(&self) -> &'static str;
}
