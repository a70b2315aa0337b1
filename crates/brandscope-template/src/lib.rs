//! Brandscope Prompt Templates
//!
//! Small, explicit prompt binder. Templates are checked against the input
//! [`Schema`](brandscope_schema::Schema) when they are compiled, so a
//! reference to an undeclared field is a construction error rather than a
//! silently blank prompt.
//!
//! # Syntax
//!
//! - `{{brandName}}`, `{{analysis.topLevelMetrics.marketSize}}`: substitution
//! - `{{#if location}}...{{/if}}`: rendered only when the field is truthy
//! - `{{#each customerSegments}}...{{/each}}`: rendered once per element,
//!   with `{{this}}` / `{{this.name}}` addressing the element
//!
//! A block tag alone on its line takes the whole line with it when rendered.
//!
//! # Example
//!
//! ```rust,ignore
//! use brandscope_template::Template;
//!
//! let template = Template::compile("Brand to Analyze: {{brandName}}", &input_schema)?;
//! let prompt = template.render(&serde_json::json!({ "brandName": "Acme" }));
//! assert_eq!(prompt, "Brand to Analyze: Acme");
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod parse;
mod render;
mod template;

pub use error::TemplateError;
pub use template::Template;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
