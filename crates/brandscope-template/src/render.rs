//! Node tree → prompt text

use crate::parse::{Node, Reference};
use serde_json::{Number, Value};

pub(crate) fn render_nodes<'v>(
    nodes: &[Node],
    root: &'v Value,
    scopes: &mut Vec<&'v Value>,
    out: &mut String,
) {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Value(reference) => {
                if let Some(value) = lookup(reference, root, scopes) {
                    write_value(value, out);
                }
            }
            Node::If { condition, body } => {
                if lookup(condition, root, scopes).is_some_and(truthy) {
                    render_nodes(body, root, scopes, out);
                }
            }
            Node::Each { list, body } => {
                if let Some(Value::Array(items)) = lookup(list, root, scopes) {
                    for item in items {
                        scopes.push(item);
                        render_nodes(body, root, scopes, out);
                        scopes.pop();
                    }
                }
            }
        }
    }
}

fn lookup<'v>(reference: &Reference, root: &'v Value, scopes: &[&'v Value]) -> Option<&'v Value> {
    match reference {
        Reference::Field(path) => path.lookup(root),
        Reference::This(path) => scopes.last().copied().and_then(|element| path.lookup(element)),
    }
}

/// Absent, `null`, `false`, `""`, `0` and `[]` are false
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

fn write_value(value: &Value, out: &mut String) {
    match value {
        Value::Null => {}
        Value::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Value::Number(n) => out.push_str(&format_number(n)),
        Value::String(s) => out.push_str(s),
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                write_value(item, out);
            }
        }
        Value::Object(_) => out.push_str(&value.to_string()),
    }
}

/// `12.0` renders as `12`
fn format_number(n: &Number) -> String {
    if n.is_f64() {
        n.as_f64().map_or_else(|| n.to_string(), |f| format!("{f}"))
    } else {
        n.to_string()
    }
}
