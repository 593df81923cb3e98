use log::{debug, warn};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::{
    data::{FieldNode, FieldType, SchemaDocument},
    render::kind,
};

/// Why a data value does not conform to a schema.
///
/// Paths are written `$.address.tags[1]`, rooted at the validated value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no schema named `{0}`")]
    UnknownSchema(String),

    #[error("missing required field {path}")]
    MissingField { path: String },

    #[error("type mismatch at {path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("{path} must have at least {min} items, got {actual}")]
    TooFewItems {
        path: String,
        min: usize,
        actual: usize,
    },

    #[error("{path} must have at most {max} items, got {actual}")]
    TooManyItems {
        path: String,
        max: usize,
        actual: usize,
    },
}

/// Check `data` against the schema called `schema_name`.
///
/// Required fields must be present, and present values must match their
/// field type; an `int` is accepted where a `float` is expected. A `null`
/// on an optional field is skipped. Array lengths are checked against
/// `items_range` and array items against `items_type`. Object fields are
/// checked against the schema named by `schemaRef`, or else against their
/// nested fields. Keys no field names are allowed.
///
/// With several schemas of the same name, the first one is used.
pub fn validate(
    schemas: &[SchemaDocument],
    schema_name: &str,
    data: &Value,
) -> Result<(), ValidationError> {
    let schema = lookup(schemas, schema_name)?;
    debug!("validating against schema `{}`", schema.name);
    Validator { schemas }.object(&schema.fields, data, "$")
}

fn lookup<'a>(schemas: &'a [SchemaDocument], name: &str) -> Result<&'a SchemaDocument, ValidationError> {
    schemas
        .iter()
        .find(|s| s.name == name)
        .ok_or_else(|| ValidationError::UnknownSchema(name.to_string()))
}

struct Validator<'a> {
    schemas: &'a [SchemaDocument],
}

impl<'a> Validator<'a> {
    fn object(&self, fields: &'a [FieldNode], data: &Value, path: &str) -> Result<(), ValidationError> {
        let map = as_object(data, path)?;
        for field in fields {
            let field_path = format!("{path}.{}", field.name);
            match map.get(&field.name) {
                None if field.required => {
                    return Err(ValidationError::MissingField { path: field_path });
                }
                None => {}
                Some(Value::Null) if !field.required => {}
                Some(value) => self.field(field, value, &field_path)?,
            }
        }
        Ok(())
    }

    fn field(&self, field: &'a FieldNode, value: &Value, path: &str) -> Result<(), ValidationError> {
        match field.field_type {
            FieldType::Array => {
                let items = as_array(value, path)?;
                if let Some(range) = field.items_range.as_deref() {
                    check_items_range(range, items.len(), path)?;
                }
                if let Some(item_type) = field.items_type {
                    for (i, item) in items.iter().enumerate() {
                        check_kind(item_type, item, &format!("{path}[{i}]"))?;
                    }
                }
                Ok(())
            }
            FieldType::Object => match field.schema_ref.as_deref() {
                Some(target) if !target.is_empty() => {
                    let schema = lookup(self.schemas, target)?;
                    self.object(&schema.fields, value, path)
                }
                _ => match field.children() {
                    Some(children) => self.object(children, value, path),
                    None => as_object(value, path).map(|_| ()),
                },
            },
            other => check_kind(other, value, path),
        }
    }
}

fn check_kind(expected: FieldType, value: &Value, path: &str) -> Result<(), ValidationError> {
    let ok = match expected {
        FieldType::String => value.is_string(),
        FieldType::Int => value.is_i64() || value.is_u64(),
        FieldType::Float => value.is_number(),
        FieldType::Bool => value.is_boolean(),
        FieldType::Array => value.is_array(),
        FieldType::Object => value.is_object(),
        FieldType::Any => true,
    };
    if ok {
        Ok(())
    } else {
        Err(mismatch(path, expected.as_str(), value))
    }
}

fn as_object<'v>(value: &'v Value, path: &str) -> Result<&'v Map<String, Value>, ValidationError> {
    value
        .as_object()
        .ok_or_else(|| mismatch(path, FieldType::Object.as_str(), value))
}

fn as_array<'v>(value: &'v Value, path: &str) -> Result<&'v Vec<Value>, ValidationError> {
    value
        .as_array()
        .ok_or_else(|| mismatch(path, FieldType::Array.as_str(), value))
}

fn mismatch(path: &str, expected: &str, value: &Value) -> ValidationError {
    ValidationError::TypeMismatch {
        path: path.to_string(),
        expected: expected.to_string(),
        actual: kind(value).to_string(),
    }
}

fn check_items_range(range: &str, len: usize, path: &str) -> Result<(), ValidationError> {
    let Some((min, max)) = parse_bounds(range) else {
        warn!("{path}: cannot read items_range `{range}`, not checked");
        return Ok(());
    };
    if let Some(min) = min
        && len < min
    {
        return Err(ValidationError::TooFewItems {
            path: path.to_string(),
            min,
            actual: len,
        });
    }
    if let Some(max) = max
        && len > max
    {
        return Err(ValidationError::TooManyItems {
            path: path.to_string(),
            max,
            actual: len,
        });
    }
    Ok(())
}

/// Reads `min,max`, optionally bracketed. An empty side is unbounded.
fn parse_bounds(text: &str) -> Option<(Option<usize>, Option<usize>)> {
    let inner = text
        .trim()
        .trim_start_matches(['[', '('])
        .trim_end_matches([']', ')']);
    let (lo, hi) = inner.split_once(',')?;
    let bound = |s: &str| -> Option<Option<usize>> {
        let s = s.trim();
        if s.is_empty() {
            Some(None)
        } else {
            s.parse().ok().map(Some)
        }
    };
    Some((bound(lo)?, bound(hi)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person() -> Vec<SchemaDocument> {
        let mut address = SchemaDocument::new("Address");
        address.fields = vec![FieldNode::named("city", FieldType::String)];

        let mut person = SchemaDocument::new("Person");
        let mut age = FieldNode::named("age", FieldType::Int);
        age.required = false;
        let mut score = FieldNode::named("score", FieldType::Float);
        score.required = false;
        let mut tags = FieldNode::named("tags", FieldType::Array);
        tags.items_type = Some(FieldType::String);
        tags.items_range = Some("1,3".into());
        tags.required = false;
        let mut home = FieldNode::named("home", FieldType::Object);
        home.schema_ref = Some("Address".into());
        home.required = false;
        let mut meta = FieldNode::named("meta", FieldType::Object);
        meta.fields = Some(vec![FieldNode::named("active", FieldType::Bool)]);
        meta.required = false;
        person.fields = vec![FieldNode::named("name", FieldType::String), age, score, tags, home, meta];
        vec![person, address]
    }

    #[test]
    fn test_valid_data_passes() {
        let data = json!({
            "name": "Ada",
            "age": 36,
            "score": 9,
            "tags": ["math"],
            "home": {"city": "London"},
            "meta": {"active": true},
            "extra": "ignored"
        });
        assert_eq!(validate(&person(), "Person", &data), Ok(()));
    }

    #[test]
    fn test_missing_required_field() {
        let err = validate(&person(), "Person", &json!({"age": 1})).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { path: "$.name".into() });
    }

    #[test]
    fn test_null_skipped_only_when_optional() {
        assert!(validate(&person(), "Person", &json!({"name": "a", "age": null})).is_ok());
        let err = validate(&person(), "Person", &json!({"name": null})).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { ref actual, .. } if actual == "null"));
    }

    #[test]
    fn test_primitive_mismatch() {
        let err = validate(&person(), "Person", &json!({"name": "a", "age": 1.5})).unwrap_err();
        assert_eq!(
            err,
            ValidationError::TypeMismatch {
                path: "$.age".into(),
                expected: "int".into(),
                actual: "number".into(),
            }
        );
    }

    #[test]
    fn test_items_range_and_item_type() {
        let schemas = person();
        let too_few = validate(&schemas, "Person", &json!({"name": "a", "tags": []})).unwrap_err();
        assert_eq!(
            too_few,
            ValidationError::TooFewItems {
                path: "$.tags".into(),
                min: 1,
                actual: 0
            }
        );
        let too_many = validate(&schemas, "Person", &json!({"name": "a", "tags": ["a", "b", "c", "d"]}));
        assert!(matches!(too_many, Err(ValidationError::TooManyItems { max: 3, actual: 4, .. })));
        let bad_item = validate(&schemas, "Person", &json!({"name": "a", "tags": ["a", 2]})).unwrap_err();
        assert!(matches!(bad_item, ValidationError::TypeMismatch { ref path, .. } if path == "$.tags[1]"));
    }

    #[test]
    fn test_unreadable_items_range_is_not_checked() {
        let mut schemas = person();
        schemas[0].fields[3].items_range = Some("few".into());
        assert!(validate(&schemas, "Person", &json!({"name": "a", "tags": []})).is_ok());
        assert_eq!(parse_bounds("[2, ]"), Some((Some(2), None)));
        assert_eq!(parse_bounds(" 0,5 "), Some((Some(0), Some(5))));
        assert_eq!(parse_bounds("5"), None);
    }

    #[test]
    fn test_referenced_and_nested_schemas() {
        let schemas = person();
        let err = validate(&schemas, "Person", &json!({"name": "a", "home": {}})).unwrap_err();
        assert_eq!(err, ValidationError::MissingField { path: "$.home.city".into() });
        let err = validate(&schemas, "Person", &json!({"name": "a", "meta": {"active": "yes"}})).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { ref path, .. } if path == "$.meta.active"));
        let err = validate(&schemas, "Person", &json!({"name": "a", "home": "London"})).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { ref expected, .. } if expected == "object"));
    }

    #[test]
    fn test_unknown_schema() {
        let mut schemas = person();
        assert_eq!(
            validate(&schemas, "Nope", &json!({})),
            Err(ValidationError::UnknownSchema("Nope".into()))
        );
        schemas[0].fields[4].schema_ref = Some("Gone".into());
        let err = validate(&schemas, "Person", &json!({"name": "a", "home": {}})).unwrap_err();
        assert_eq!(err, ValidationError::UnknownSchema("Gone".into()));
    }

    #[test]
    fn test_top_level_must_be_object() {
        let err = validate(&person(), "Person", &json!([1])).unwrap_err();
        assert!(matches!(err, ValidationError::TypeMismatch { ref path, .. } if path == "$"));
    }
}
