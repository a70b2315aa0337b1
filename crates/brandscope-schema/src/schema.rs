//! Schema descriptors
//!
//! A [`Schema`] is plain data: a named list of [`Field`]s, each carrying a
//! [`FieldKind`]. Nothing here executes; validation and JSON Schema rendering
//! walk the same structure.

use crate::path::{FieldPath, Segment};

/// Shape of a single field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    /// Free text
    String,
    /// Number with inclusive optional bounds
    Number {
        /// Lower bound
        min: Option<f64>,
        /// Upper bound
        max: Option<f64>,
    },
    /// `true` / `false`
    Boolean,
    /// String restricted to a fixed value set
    Enum(Vec<String>),
    /// Nested record
    Object(Schema),
    /// List of elements of one kind
    Array {
        /// Kind of every element
        element: Box<FieldKind>,
        /// Fewest elements accepted; `0` places no constraint
        min_items: usize,
    },
}

impl FieldKind {
    #[inline]
    #[must_use]
    pub fn string() -> Self {
        Self::String
    }

    /// Unbounded number
    #[inline]
    #[must_use]
    pub fn number() -> Self {
        Self::Number {
            min: None,
            max: None,
        }
    }

    /// Number within `[min, max]`
    #[inline]
    #[must_use]
    pub fn number_in(min: f64, max: f64) -> Self {
        Self::Number {
            min: Some(min),
            max: Some(max),
        }
    }

    #[inline]
    #[must_use]
    pub fn boolean() -> Self {
        Self::Boolean
    }

    /// Enumerated string
    #[must_use]
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Enum(values.into_iter().map(Into::into).collect())
    }

    #[inline]
    #[must_use]
    pub fn object(schema: Schema) -> Self {
        Self::Object(schema)
    }

    /// List of `element`
    #[inline]
    #[must_use]
    pub fn array_of(element: FieldKind) -> Self {
        Self::Array {
            element: Box::new(element),
            min_items: 0,
        }
    }

    /// Require at least one element; no effect on non-list kinds
    #[inline]
    #[must_use]
    pub fn non_empty(self) -> Self {
        self.with_min_items(1)
    }

    /// Require at least `min` elements; no effect on non-list kinds
    #[must_use]
    pub fn with_min_items(self, min: usize) -> Self {
        match self {
            Self::Array { element, .. } => Self::Array {
                element,
                min_items: min,
            },
            other => other,
        }
    }

    /// List of free text, the most common list shape
    #[inline]
    #[must_use]
    pub fn strings() -> Self {
        Self::array_of(Self::String)
    }

    /// Name used in violations and JSON Schema `type`
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String | Self::Enum(_) => "string",
            Self::Number { .. } => "number",
            Self::Boolean => "boolean",
            Self::Object(_) => "object",
            Self::Array { .. } => "array",
        }
    }

    /// Element kind, if this is a list
    #[inline]
    #[must_use]
    pub fn element(&self) -> Option<&FieldKind> {
        match self {
            Self::Array { element, .. } => Some(element.as_ref()),
            _ => None,
        }
    }

    /// Nested schema, if this is a record
    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Schema> {
        match self {
            Self::Object(schema) => Some(schema),
            _ => None,
        }
    }
}

/// Named field of a [`Schema`]
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    name: String,
    kind: FieldKind,
    required: bool,
    description: Option<String>,
}

impl Field {
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// Structural contract for one record
///
/// Field order is preserved; it is the order properties are presented to the
/// model.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    name: String,
    description: Option<String>,
    fields: Vec<Field>,
}

impl Schema {
    /// Start an object schema with no fields
    #[inline]
    #[must_use]
    pub fn object(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    /// Add a required field
    #[inline]
    #[must_use]
    pub fn required(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.push(name.into(), kind, true)
    }

    /// Add an optional field; `null` counts as absent
    #[inline]
    #[must_use]
    pub fn optional(self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.push(name.into(), kind, false)
    }

    /// Document the most recently added field
    ///
    /// Before any field is added, documents the schema itself.
    #[must_use]
    pub fn describe(mut self, text: impl Into<String>) -> Self {
        match self.fields.last_mut() {
            Some(field) => field.description = Some(text.into()),
            None => self.description = Some(text.into()),
        }
        self
    }

    /// Document the schema itself
    #[inline]
    #[must_use]
    pub fn with_description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    /// Append the fields of `other` that this schema does not declare yet
    #[must_use]
    pub fn merge(mut self, other: &Schema) -> Self {
        for field in &other.fields {
            if self.field(&field.name).is_none() {
                self.fields.push(field.clone());
            }
        }
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Find a field by name
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Resolve the kind a path points at
    ///
    /// Key segments step into records, index segments step into lists.
    /// Returns `None` for the root path or any undeclared step.
    #[must_use]
    pub fn resolve(&self, path: &FieldPath) -> Option<&FieldKind> {
        let (first, rest) = path.segments().split_first()?;
        let start = self.field(first.as_key()?)?.kind();
        rest.iter().try_fold(start, |kind, segment| match (kind, segment) {
            (FieldKind::Object(schema), Segment::Key(key)) => schema.field(key).map(Field::kind),
            (FieldKind::Array { element, .. }, Segment::Index(_)) => Some(element.as_ref()),
            _ => None,
        })
    }

    fn push(mut self, name: String, kind: FieldKind, required: bool) -> Self {
        debug_assert!(
            self.field(&name).is_none(),
            "field '{name}' declared twice in '{}'",
            self.name
        );
        self.fields.push(Field {
            name,
            kind,
            required,
            description: None,
        });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn competitor() -> Schema {
        Schema::object("Competitor")
            .required("name", FieldKind::string())
            .required("type", FieldKind::one_of(["Direct", "Indirect", "Substitute"]))
            .required("rating", FieldKind::number_in(0.0, 5.0))
            .describe("A competitive rating from 1 to 5.")
            .required("strengths", FieldKind::strings())
    }

    #[test]
    fn builder_keeps_field_order() {
        let schema = competitor();
        let names: Vec<_> = schema.fields().iter().map(Field::name).collect();
        assert_eq!(names, ["name", "type", "rating", "strengths"]);
    }

    #[test]
    fn describe_targets_last_field() {
        let schema = competitor();
        assert_eq!(
            schema.field("rating").and_then(Field::description),
            Some("A competitive rating from 1 to 5.")
        );
        assert!(schema.description().is_none());

        let documented = Schema::object("Empty").describe("no fields yet");
        assert_eq!(documented.description(), Some("no fields yet"));
    }

    #[test]
    fn resolve_walks_objects_and_lists() {
        let report = Schema::object("Report")
            .required("competition", FieldKind::array_of(FieldKind::object(competitor())))
            .optional("location", FieldKind::string());

        let rating = FieldPath::from_str("competition[0].rating").unwrap();
        assert_eq!(report.resolve(&rating), Some(&FieldKind::number_in(0.0, 5.0)));

        let list = FieldPath::key("competition");
        assert!(matches!(report.resolve(&list), Some(FieldKind::Array { .. })));

        assert!(report.resolve(&FieldPath::key("missing")).is_none());
        assert!(report
            .resolve(&FieldPath::from_str("competition.rating").unwrap())
            .is_none());
        assert!(report.resolve(&FieldPath::root()).is_none());
    }

    #[test]
    fn non_empty_only_touches_lists() {
        assert_eq!(
            FieldKind::strings().non_empty(),
            FieldKind::Array {
                element: Box::new(FieldKind::String),
                min_items: 1,
            }
        );
        assert_eq!(FieldKind::string().non_empty(), FieldKind::String);
        assert_eq!(FieldKind::strings().non_empty().element(), Some(&FieldKind::String));
    }

    #[test]
    fn merge_appends_new_fields_only() {
        let left = Schema::object("Left")
            .required("a", FieldKind::string())
            .required("b", FieldKind::number());
        let right = Schema::object("Right")
            .required("b", FieldKind::string())
            .required("c", FieldKind::boolean());

        let merged = left.merge(&right);
        let names: Vec<_> = merged.fields().iter().map(Field::name).collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(merged.field("b").map(Field::kind), Some(&FieldKind::number()));
    }
}
