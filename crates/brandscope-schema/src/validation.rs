//! Generic validation of JSON values against a [`Schema`]
//!
//! The validator walks the whole value and reports every violation it finds,
//! each addressed by a [`FieldPath`]. Unknown fields are ignored; `null` is
//! treated as absent for optional fields.

use crate::path::FieldPath;
use crate::schema::{FieldKind, Schema};
use serde_json::Value;
use std::fmt::{self, Display, Formatter};

/// What went wrong at one path
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    /// Required field absent or `null`
    MissingField,
    /// Value of the wrong JSON type
    WrongType {
        expected: &'static str,
        found: &'static str,
    },
    /// Number outside its declared bounds
    OutOfRange {
        value: f64,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// String not in the enumerated set
    NotInEnum { value: String, allowed: Vec<String> },
    /// List shorter than its declared minimum
    TooFewItems { len: usize, min: usize },
}

impl Display for ViolationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingField => f.write_str("missing required field"),
            Self::WrongType { expected, found } => write!(f, "expected {expected}, found {found}"),
            Self::OutOfRange { value, min, max } => {
                let lo = min.map_or_else(|| "-inf".to_string(), |m| m.to_string());
                let hi = max.map_or_else(|| "inf".to_string(), |m| m.to_string());
                write!(f, "{value} outside [{lo}, {hi}]")
            }
            Self::NotInEnum { value, allowed } => {
                write!(f, "'{value}' is not one of [{}]", allowed.join(", "))
            }
            Self::TooFewItems { len, min } => {
                write!(f, "expected at least {min} item(s), found {len}")
            }
        }
    }
}

/// A single contract violation
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub path: FieldPath,
    pub kind: ViolationKind,
}

impl Violation {
    #[inline]
    #[must_use]
    pub fn new(path: FieldPath, kind: ViolationKind) -> Self {
        Self { path, kind }
    }
}

impl Display for Violation {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

/// A value failed its schema
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("'{schema}' rejected value: {}", summarize(.violations))]
pub struct ValidationError {
    schema: String,
    violations: Vec<Violation>,
}

impl ValidationError {
    #[must_use]
    pub fn new(schema: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            schema: schema.into(),
            violations,
        }
    }

    /// Name of the schema that rejected the value
    #[inline]
    #[must_use]
    pub fn schema(&self) -> &str {
        &self.schema
    }

    #[inline]
    #[must_use]
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Violation at `path`, if any
    #[must_use]
    pub fn at(&self, path: &str) -> Option<&Violation> {
        self.violations.iter().find(|v| v.path.to_string() == path)
    }
}

fn summarize(violations: &[Violation]) -> String {
    const SHOWN: usize = 3;
    let mut text = violations
        .iter()
        .take(SHOWN)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    if violations.len() > SHOWN {
        text.push_str(&format!(" (+{} more)", violations.len() - SHOWN));
    }
    text
}

impl Schema {
    /// Validate `value` against this schema
    ///
    /// # Errors
    /// Returns every violation found, in document order.
    pub fn validate(&self, value: &Value) -> Result<(), ValidationError> {
        let mut violations = Vec::new();
        check_object(self, value, &FieldPath::root(), &mut violations);
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.name(), violations))
        }
    }

    /// Shorthand for `validate(value).is_ok()`
    #[inline]
    #[must_use]
    pub fn is_valid(&self, value: &Value) -> bool {
        self.validate(value).is_ok()
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn wrong_type(expected: &'static str, value: &Value) -> ViolationKind {
    ViolationKind::WrongType {
        expected,
        found: json_type(value),
    }
}

fn check_object(schema: &Schema, value: &Value, path: &FieldPath, out: &mut Vec<Violation>) {
    let Some(map) = value.as_object() else {
        out.push(Violation::new(path.clone(), wrong_type("object", value)));
        return;
    };

    for field in schema.fields() {
        let child = path.child(field.name());
        match map.get(field.name()) {
            None | Some(Value::Null) if !field.is_required() => {}
            None | Some(Value::Null) => {
                out.push(Violation::new(child, ViolationKind::MissingField));
            }
            Some(present) => check_kind(field.kind(), present, &child, out),
        }
    }
}

fn check_kind(kind: &FieldKind, value: &Value, path: &FieldPath, out: &mut Vec<Violation>) {
    match kind {
        FieldKind::String => {
            if !value.is_string() {
                out.push(Violation::new(path.clone(), wrong_type("string", value)));
            }
        }
        FieldKind::Boolean => {
            if !value.is_boolean() {
                out.push(Violation::new(path.clone(), wrong_type("boolean", value)));
            }
        }
        FieldKind::Number { min, max } => match value.as_f64() {
            None => out.push(Violation::new(path.clone(), wrong_type("number", value))),
            Some(n) => {
                let below = min.is_some_and(|m| n < m);
                let above = max.is_some_and(|m| n > m);
                if below || above {
                    out.push(Violation::new(
                        path.clone(),
                        ViolationKind::OutOfRange {
                            value: n,
                            min: *min,
                            max: *max,
                        },
                    ));
                }
            }
        },
        FieldKind::Enum(allowed) => match value.as_str() {
            None => out.push(Violation::new(path.clone(), wrong_type("string", value))),
            Some(s) if !allowed.iter().any(|a| a == s) => out.push(Violation::new(
                path.clone(),
                ViolationKind::NotInEnum {
                    value: s.to_string(),
                    allowed: allowed.clone(),
                },
            )),
            Some(_) => {}
        },
        FieldKind::Object(schema) => check_object(schema, value, path, out),
        FieldKind::Array { element, min_items } => match value.as_array() {
            None => out.push(Violation::new(path.clone(), wrong_type("array", value))),
            Some(items) => {
                if items.len() < *min_items {
                    out.push(Violation::new(
                        path.clone(),
                        ViolationKind::TooFewItems {
                            len: items.len(),
                            min: *min_items,
                        },
                    ));
                }
                for (i, item) in items.iter().enumerate() {
                    check_kind(element, item, &path.index(i), out);
                }
            }
        },
    }
}
