//! JSON Schema rendering
//!
//! The backend receives the output contract as a JSON Schema document. The
//! rendering mirrors [`Schema::validate`](crate::Schema::validate): optional
//! fields also admit `null`, unknown properties are allowed.

use crate::schema::{Field, FieldKind, Schema};
use serde_json::{json, Map, Value};

impl Schema {
    /// Render this contract as a JSON Schema object
    #[must_use]
    pub fn to_json_schema(&self) -> Value {
        let mut root = object_schema(self);
        if let (Some(text), Value::Object(map)) = (self.description(), &mut root) {
            map.insert("description".into(), Value::String(text.to_string()));
        }
        root
    }
}

fn object_schema(schema: &Schema) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for field in schema.fields() {
        properties.insert(field.name().to_string(), field_schema(field));
        if field.is_required() {
            required.push(Value::String(field.name().to_string()));
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn field_schema(field: &Field) -> Value {
    let mut rendered = kind_schema(field.kind());
    let Value::Object(map) = &mut rendered else {
        return rendered;
    };

    if !field.is_required() {
        let kind = field.kind().type_name();
        map.insert("type".into(), json!([kind, "null"]));
        if let Some(Value::Array(values)) = map.get_mut("enum") {
            values.push(Value::Null);
        }
    }
    if let Some(text) = field.description() {
        map.insert("description".into(), Value::String(text.to_string()));
    }
    rendered
}

fn kind_schema(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::String | FieldKind::Boolean => json!({ "type": kind.type_name() }),
        FieldKind::Number { min, max } => {
            let mut map = Map::new();
            map.insert("type".into(), json!("number"));
            if let Some(min) = min {
                map.insert("minimum".into(), json!(min));
            }
            if let Some(max) = max {
                map.insert("maximum".into(), json!(max));
            }
            Value::Object(map)
        }
        FieldKind::Enum(values) => json!({ "type": "string", "enum": values }),
        FieldKind::Object(schema) => {
            let mut rendered = object_schema(schema);
            if let (Some(text), Value::Object(map)) = (schema.description(), &mut rendered) {
                map.insert("description".into(), Value::String(text.to_string()));
            }
            rendered
        }
        FieldKind::Array { element, min_items } => {
            let mut map = Map::new();
            map.insert("type".into(), json!("array"));
            map.insert("items".into(), kind_schema(element));
            if *min_items > 0 {
                map.insert("minItems".into(), json!(min_items));
            }
            Value::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn renders_nested_contract() {
        let score = Schema::object("Score")
            .required("score", FieldKind::number_in(0.0, 10.0))
            .required("description", FieldKind::string())
            .describe("A short, two-word description summarizing the score.");
        let schema = Schema::object("Report")
            .required("scores", FieldKind::array_of(FieldKind::object(score)))
            .optional("trend", FieldKind::one_of(["up", "down"]));

        assert_eq!(
            schema.to_json_schema(),
            json!({
                "type": "object",
                "properties": {
                    "scores": {
                        "type": "array",
                        "items": {
                            "type": "object",
                            "properties": {
                                "score": { "type": "number", "minimum": 0.0, "maximum": 10.0 },
                                "description": {
                                    "type": "string",
                                    "description": "A short, two-word description summarizing the score."
                                }
                            },
                            "required": ["score", "description"]
                        }
                    },
                    "trend": { "type": ["string", "null"], "enum": ["up", "down", null] }
                },
                "required": ["scores"]
            })
        );
    }

    #[test]
    fn non_empty_list_renders_min_items() {
        let schema = Schema::object("Report")
            .required("competition", FieldKind::strings().non_empty())
            .optional("notes", FieldKind::strings());
        let rendered = schema.to_json_schema();
        assert_eq!(rendered["properties"]["competition"]["minItems"], json!(1));
        assert_eq!(rendered["properties"]["notes"].get("minItems"), None);
    }

    #[test]
    fn schema_description_lands_on_root() {
        let schema = Schema::object("Summary")
            .with_description("Market research summary")
            .required("summary", FieldKind::string());
        assert_eq!(
            schema.to_json_schema()["description"],
            json!("Market research summary")
        );
    }
}
