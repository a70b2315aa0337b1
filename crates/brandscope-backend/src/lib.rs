//! Brandscope Generation Backend
//!
//! The single external collaborator of the engine: something that turns a
//! prompt into structured text, or into generated media.
//!
//! - [`GenerationBackend`]: Async seam injected into every flow
//! - [`GenerationRequest`] / [`GenerationResponse`]: One logical call
//! - [`GeminiBackend`]: Generative Language REST implementation
//! - [`BackendConfig`]: Models, endpoint and credentials
//!
//! # Example
//!
//! ```rust,ignore
//! use brandscope_backend::{BackendConfig, GeminiBackend, GenerationBackend, GenerationRequest};
//!
//! let backend = GeminiBackend::new(BackendConfig::from_env()?)?;
//! let response = backend
//!     .generate(GenerationRequest::structured(prompt, schema.to_json_schema()))
//!     .await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod backend;
mod config;
mod error;
mod gemini;
mod request;

pub use backend::GenerationBackend;
pub use config::BackendConfig;
pub use error::BackendError;
pub use gemini::GeminiBackend;
pub use request::{GenerationRequest, GenerationResponse, MediaOutput};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
