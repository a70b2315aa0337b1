//! Brandscope Composition
//!
//! The pieces that combine flow results.
//!
//! # Core Concepts
//!
//! - [`MergeGuard`]: Forces output fields to echo input fields after generation
//! - [`fan_out`]: Runs one future per item concurrently, all-or-nothing
//! - [`FanOutError`]: The failing item's index and error
//!
//! # Example
//!
//! ```rust,ignore
//! use brandscope_composition::{fan_out, MergeGuard};
//!
//! let guard = MergeGuard::new().bind_field("type", "competitorType");
//! let guarded = guard.apply(generated, &input);
//!
//! let personas = fan_out(segments, |_, segment| generate_persona(segment)).await?;
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod fan_out;
mod guard;

pub use error::FanOutError;
pub use fan_out::fan_out;
pub use guard::{Binding, MergeGuard};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
