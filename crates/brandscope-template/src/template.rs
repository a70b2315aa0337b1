//! Compiled, schema-checked templates

use crate::error::TemplateError;
use crate::parse::{parse, Node, Reference};
use crate::render::render_nodes;
use brandscope_schema::{FieldKind, Schema};
use serde_json::Value;

/// Prompt template bound to an input schema
///
/// Construction checks every reference against the schema, so a compiled
/// template can always be rendered from a value that satisfies it.
#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    schema: String,
    nodes: Vec<Node>,
}

impl Template {
    /// Parse `source` and check it against `schema`
    ///
    /// # Errors
    /// Structural errors from parsing, [`TemplateError::UndeclaredField`],
    /// [`TemplateError::NotAList`] and [`TemplateError::ThisOutsideEach`]
    /// from the schema check.
    pub fn compile(source: &str, schema: &Schema) -> Result<Self, TemplateError> {
        let nodes = parse(source)?;
        check(&nodes, schema, &mut Vec::new())?;
        Ok(Self {
            schema: schema.name().to_string(),
            nodes,
        })
    }

    /// Render against a value of the bound schema
    ///
    /// Pure and deterministic. Absent optional values render as empty text.
    #[must_use]
    pub fn render(&self, input: &Value) -> String {
        let mut out = String::new();
        render_nodes(&self.nodes, input, &mut Vec::new(), &mut out);
        out
    }

    /// Name of the schema this template was checked against
    #[inline]
    #[must_use]
    pub fn schema_name(&self) -> &str {
        &self.schema
    }

    /// Root-level field paths referenced anywhere in the template
    #[must_use]
    pub fn referenced_fields(&self) -> Vec<String> {
        let mut fields = Vec::new();
        collect_fields(&self.nodes, &mut fields);
        fields.sort();
        fields.dedup();
        fields
    }
}

fn collect_fields(nodes: &[Node], out: &mut Vec<String>) {
    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Value(reference) => push_field(reference, out),
            Node::If { condition: target, body } | Node::Each { list: target, body } => {
                push_field(target, out);
                collect_fields(body, out);
            }
        }
    }
}

fn push_field(reference: &Reference, out: &mut Vec<String>) {
    if let Reference::Field(path) = reference {
        out.push(path.to_string());
    }
}

fn check<'s>(
    nodes: &[Node],
    schema: &'s Schema,
    scopes: &mut Vec<&'s FieldKind>,
) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(_) => {}
            Node::Value(reference) => {
                resolve(reference, schema, scopes)?;
            }
            Node::If { condition, body } => {
                resolve(condition, schema, scopes)?;
                check(body, schema, scopes)?;
            }
            Node::Each { list, body } => {
                let element = resolve(list, schema, scopes)?
                    .element()
                    .ok_or_else(|| TemplateError::NotAList {
                        path: list.to_string(),
                    })?;
                scopes.push(element);
                check(body, schema, scopes)?;
                scopes.pop();
            }
        }
    }
    Ok(())
}

fn resolve<'s>(
    reference: &Reference,
    schema: &'s Schema,
    scopes: &[&'s FieldKind],
) -> Result<&'s FieldKind, TemplateError> {
    let undeclared = || TemplateError::UndeclaredField {
        path: reference.to_string(),
        schema: schema.name().to_string(),
    };

    match reference {
        Reference::Field(path) => schema.resolve(path).ok_or_else(undeclared),
        Reference::This(path) => {
            let element = *scopes.last().ok_or(TemplateError::ThisOutsideEach)?;
            if path.is_empty() {
                Ok(element)
            } else {
                element
                    .as_object()
                    .and_then(|inner| inner.resolve(path))
                    .ok_or_else(undeclared)
            }
        }
    }
}
