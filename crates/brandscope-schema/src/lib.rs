//! Brandscope Schema Contracts
//!
//! Declarative descriptions of the records that flow into and out of the
//! generation engine.
//!
//! # Core Concepts
//!
//! - [`Schema`]: Named object shape with ordered [`Field`]s
//! - [`FieldKind`]: Primitive, enumerated, nested object or list shape
//! - [`Schema::validate`]: Generic validator collecting every [`Violation`]
//! - [`Schema::to_json_schema`]: JSON Schema rendering sent to the backend
//! - [`FieldPath`]: Dotted addressing with list indices (`competition[2].rating`)
//! - [`Contract`]: Ties a typed serde record to its schema
//!
//! # Example
//!
//! ```rust,ignore
//! use brandscope_schema::{FieldKind, Schema};
//!
//! let competitor = Schema::object("Competitor")
//!     .required("name", FieldKind::string())
//!     .required("rating", FieldKind::number_in(0.0, 5.0))
//!     .describe("A competitive rating from 1 to 5.");
//!
//! competitor.validate(&serde_json::json!({ "name": "Acme", "rating": 4 }))?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

// Core modules
mod contract;
mod json_schema;
mod path;
mod schema;
mod validation;

// Re-exports
pub use contract::{Contract, ContractError};
pub use path::{FieldPath, PathError, Segment};
pub use schema::{Field, FieldKind, Schema};
pub use validation::{ValidationError, Violation, ViolationKind};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for declaring contracts
    pub use crate::{Contract, FieldKind, FieldPath, Schema, ValidationError};
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Score {
        score: f64,
        description: String,
    }

    impl Contract for Score {
        fn schema() -> Schema {
            Schema::object("Score")
                .required("score", FieldKind::number_in(0.0, 10.0))
                .required("description", FieldKind::string())
        }
    }

    #[test]
    fn contract_round_trips_through_validation() {
        let raw = json!({ "score": 7.5, "description": "Strong position" });
        let score = Score::decode(raw).unwrap();
        assert_eq!(score.description, "Strong position");
    }

    #[test]
    fn contract_rejects_out_of_range() {
        let raw = json!({ "score": 11, "description": "Too high" });
        let err = Score::schema().validate(&raw).unwrap_err();
        assert_eq!(err.violations().len(), 1);
        assert_eq!(err.violations()[0].path.to_string(), "score");
    }
}
