//! Input echo guards
//!
//! A model may rename or paraphrase the entity it was asked about. A guard
//! overwrites those output fields with the caller-supplied input values, so
//! the field is correct by construction rather than by prompt instruction.

use brandscope_schema::FieldPath;
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// `output <- input`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    output: FieldPath,
    input: FieldPath,
}

impl Binding {
    #[inline]
    #[must_use]
    pub fn new(output: FieldPath, input: FieldPath) -> Self {
        Self { output, input }
    }

    #[inline]
    #[must_use]
    pub fn output(&self) -> &FieldPath {
        &self.output
    }

    #[inline]
    #[must_use]
    pub fn input(&self) -> &FieldPath {
        &self.input
    }
}

impl Display for Binding {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.output, self.input)
    }
}

/// Declarative list of output fields that must equal input fields
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeGuard {
    bindings: Vec<Binding>,
}

impl MergeGuard {
    /// Guard with no bindings; `apply` is the identity
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn bind(mut self, output: FieldPath, input: FieldPath) -> Self {
        self.bindings.push(Binding::new(output, input));
        self
    }

    /// Bind two top-level fields
    #[inline]
    #[must_use]
    pub fn bind_field(self, output: &str, input: &str) -> Self {
        self.bind(FieldPath::key(output), FieldPath::key(input))
    }

    #[inline]
    #[must_use]
    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Overwrite each bound output field with the input's value
    ///
    /// Bindings whose input value is absent or `null` are skipped. Fields not
    /// named by a binding are left untouched. Applying twice with the same
    /// input gives the same result as applying once.
    #[must_use]
    pub fn apply(&self, mut output: Value, input: &Value) -> Value {
        for binding in &self.bindings {
            let Some(value) = binding.input.lookup(input).filter(|v| !v.is_null()) else {
                continue;
            };
            if let Some(slot) = binding.output.lookup_mut(&mut output) {
                *slot = value.clone();
            }
        }
        output
    }
}

impl Display for MergeGuard {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, binding) in self.bindings.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{binding}")?;
        }
        Ok(())
    }
}
