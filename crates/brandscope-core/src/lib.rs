//! Brandscope Core - generation-flow engine
//!
//! Turns typed business inputs into schema-valid analysis records:
//! - Validates caller input against each flow's input contract
//! - Renders prompt templates checked against those contracts
//! - Executes one structured call per flow and validates the result
//! - Forces echo fields back to trusted input values
//! - Chains flows into composite reports and fans personas out per segment
//!
//! # Example
//!
//! ```rust,ignore
//! use brandscope_core::prelude::*;
//! use brandscope_backend::{BackendConfig, GeminiBackend};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = Arc::new(GeminiBackend::new(BackendConfig::from_env()?)?);
//! let executor = FlowExecutor::new(backend, EngineConfig::new());
//!
//! let report = CompetitiveReportFlow::new(executor)?;
//! let brief = BrandBrief::new("Acme", "Anvils for cartoon coyotes", "Hardware")
//!     .with_location("Arizona");
//! let output = report.execute(brief).await?;
//!
//! println!("{} competitors", output.analysis.competition.len());
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
pub mod composite;
pub mod config;
pub mod error;
pub mod executor;
pub mod flow;
pub mod flows;
pub mod personas;
pub mod registry;

// Re-exports for convenience
pub use composite::{
    CategoryReport, CategoryReportFlow, CompetitiveReport, CompetitiveReportFlow, CulturalReport,
    CulturalReportFlow,
};
pub use config::EngineConfig;
pub use error::{EngineError, OutputViolation, ResponsePart};
pub use executor::{ExecutionRequest, FlowExecutor, Generation, MediaInstruction};
pub use flow::{Flow, FlowSpec, Generated, PromptFlow};
pub use flows::{BrandBrief, BrandIndustry, BusinessProfile};
pub use personas::{Persona, PersonaGenerationFlow, Personas, PersonasInput};
pub use registry::FlowRegistry;

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for running flows
    pub use crate::{
        BrandBrief, BrandIndustry, BusinessProfile, CategoryReportFlow, CompetitiveReportFlow,
        CulturalReportFlow, EngineConfig, EngineError, Flow, FlowExecutor, FlowRegistry,
        PersonaGenerationFlow, PromptFlow,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
