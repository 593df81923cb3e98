//! Rendering schema documents to their serialized text form, and back.
//!
//! The output is a pretty-printed JSON list of `{ "name", "fields" }`
//! objects. Field keys keep the model's declaration order and unset
//! properties are left out, so identical documents always render to
//! identical text.
//!
//! The only structural change made while rendering is enum normalization:
//! comma-separated enum text becomes a list of trimmed, non-empty tokens.
//! This is applied to nested `object` fields at every depth.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::data::{SchemaDocument, SchemaError};

/// Render schemas to indented JSON text.
pub fn render(schemas: &[SchemaDocument]) -> String {
    format!("{:#}", render_value(schemas))
}

/// The normalized JSON value that [`render`] prints.
pub fn render_value(schemas: &[SchemaDocument]) -> Value {
    Value::Array(
        schemas
            .iter()
            .map(|schema| {
                let mut map = Map::new();
                map.insert("name".into(), Value::String(schema.name.clone()));
                map.insert(
                    "fields".into(),
                    Value::Array(
                        schema
                            .fields
                            .iter()
                            .map(|f| normalize_field(&f.as_json()))
                            .collect(),
                    ),
                );
                Value::Object(map)
            })
            .collect(),
    )
}

/// Split enum text on commas into trimmed, non-empty tokens.
pub fn split_enum(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn normalize_field(field: &Value) -> Value {
    let Value::Object(map) = field else {
        return field.clone();
    };
    let mut out = map.clone();

    if let Some(Value::String(text)) = map.get("enum") {
        let tokens = split_enum(text).into_iter().map(Value::String).collect();
        out.insert("enum".into(), Value::Array(tokens));
    }

    if map.get("type").and_then(Value::as_str) == Some("object")
        && let Some(Value::Array(children)) = map.get("fields")
    {
        out.insert(
            "fields".into(),
            Value::Array(children.iter().map(normalize_field).collect()),
        );
    }

    // `items_type` is carried through unchanged for arrays.
    Value::Object(out)
}

/// Parse rendered text back into schema documents.
///
/// Enum lists are joined back into comma-separated text, so rendering the
/// result reproduces the input for anything [`render`] produced.
pub fn parse(text: &str) -> Result<Vec<SchemaDocument>, SchemaError> {
    let value: Value = serde_json::from_str(text)?;
    from_value(&value)
}

/// Convert a JSON list of schema objects into documents.
pub fn from_value(value: &Value) -> Result<Vec<SchemaDocument>, SchemaError> {
    let Value::Array(items) = value else {
        return Err(SchemaError::TypeMismatch {
            path: "$".to_string(),
            expected: "a list of schemas".to_string(),
            actual: kind(value).to_string(),
        });
    };
    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            SchemaDocument::deserialize(item).map_err(|e| SchemaError::TypeMismatch {
                path: format!("$[{i}]"),
                expected: "a schema document".to_string(),
                actual: e.to_string(),
            })
        })
        .collect()
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
