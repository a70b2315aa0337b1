//! Template construction errors
//!
//! Every variant is raised by [`Template::compile`](crate::Template::compile).
//! Rendering a compiled template cannot fail.

use brandscope_schema::PathError;

/// A template that cannot be bound to its schema
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TemplateError {
    /// `{{` without a closing `}}`
    #[error("unterminated tag at byte {offset}")]
    UnterminatedTag { offset: usize },

    /// `{{}}` or whitespace only
    #[error("empty tag at byte {offset}")]
    EmptyTag { offset: usize },

    /// Tag that is neither a value, an open block nor a close block
    #[error("invalid tag '{body}' at byte {offset}")]
    InvalidTag { body: String, offset: usize },

    /// Field reference that is not a valid path
    #[error("invalid path in tag at byte {offset}: {source}")]
    InvalidPath {
        offset: usize,
        #[source]
        source: PathError,
    },

    /// Block opened and never closed
    #[error("unclosed #{kind} block opened at byte {offset}")]
    UnclosedBlock { kind: &'static str, offset: usize },

    /// Close tag with no open block
    #[error("/{kind} at byte {offset} closes nothing")]
    UnexpectedClose { kind: &'static str, offset: usize },

    /// Close tag for a different block than the innermost open one
    #[error("/{found} at byte {offset} does not close #{expected}")]
    MismatchedClose {
        expected: &'static str,
        found: &'static str,
        offset: usize,
    },

    /// Reference to a field the schema does not declare
    #[error("'{path}' is not declared in '{schema}'")]
    UndeclaredField { path: String, schema: String },

    /// `#each` over a field that is not a list
    #[error("#each over '{path}' which is not a list")]
    NotAList { path: String },

    /// `this` with no enclosing `#each`
    #[error("'this' used outside of an #each block")]
    ThisOutsideEach,
}
