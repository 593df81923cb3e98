use log::warn;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::data::{
    error::SchemaError,
    types::{FieldType, Param},
};

/// One named, typed field of a schema, possibly holding nested fields.
///
/// Optional properties distinguish "unset" (`None`) from "being edited"
/// (`Some("")`). Constraint values are kept as the raw text the user typed.
/// Field declaration order is the key order of the rendered output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FieldNode {
    /// Field name, not checked for emptiness or uniqueness.
    pub name: String,
    /// Field type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Whether the field is mandatory.
    #[serde(default = "default_required")]
    pub required: bool,
    /// Free-form description.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "raw_text")]
    pub description: Option<String>,
    /// Default value, untyped.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "raw_text")]
    pub default: Option<String>,
    /// Comma-separated enumeration values.
    #[serde(
        rename = "enum",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "enum_text"
    )]
    pub enum_values: Option<String>,
    /// Inclusive range, `min,max`.
    #[serde(
        rename = "range_",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "raw_text"
    )]
    pub range: Option<String>,
    /// Exclusivity flags for the range bounds.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "raw_text")]
    pub exclusive_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "raw_text")]
    pub multiple_of: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "raw_text")]
    pub length_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "raw_text")]
    pub items_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "raw_text")]
    pub properties_range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "raw_text")]
    pub regex: Option<String>,
    /// Format hint such as `email`.
    #[serde(
        rename = "format_",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "raw_text"
    )]
    pub format: Option<String>,
    /// Nested fields, present for `object` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldNode>>,
    /// Element type, present for `array` fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items_type: Option<FieldType>,
    /// Name of a schema this `object` field refers to instead of `fields`.
    #[serde(
        rename = "schemaRef",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "raw_text"
    )]
    pub schema_ref: Option<String>,
}

fn default_required() -> bool {
    true
}

fn scalar_text<E: serde::de::Error>(value: Value) -> Result<Option<String>, E> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        other => Err(E::custom(format!("expected text, got {other}"))),
    }
}

fn raw_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    scalar_text(Value::deserialize(d)?)
}

/// Accepts enum values either as raw text or as a rendered list.
///
/// A list is joined with `", "` so that rendering it again splits back into
/// the same tokens.
fn enum_text<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    match Value::deserialize(d)? {
        Value::Array(items) => {
            let mut tokens = Vec::with_capacity(items.len());
            for item in items {
                if let Some(s) = scalar_text::<D::Error>(item)? {
                    tokens.push(s);
                }
            }
            Ok(Some(tokens.join(", ")))
        }
        other => scalar_text(other),
    }
}

impl FieldNode {
    /// A blank field of the given type.
    ///
    /// `description` starts as an empty string, every constraint is unset,
    /// `object` fields start with no nested fields and `array` fields start
    /// with `string` items.
    pub fn empty(field_type: FieldType) -> Self {
        Self {
            name: String::new(),
            field_type,
            required: true,
            description: Some(String::new()),
            default: None,
            enum_values: None,
            range: None,
            exclusive_range: None,
            multiple_of: None,
            length_range: None,
            items_range: None,
            properties_range: None,
            regex: None,
            format: None,
            fields: (field_type == FieldType::Object).then(Vec::new),
            items_type: (field_type == FieldType::Array).then_some(FieldType::String),
            schema_ref: None,
        }
    }

    /// A blank field with a name.
    pub fn named(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            ..Self::empty(field_type)
        }
    }

    /// Current text of a parameter; `required` is not a text parameter.
    pub fn param(&self, param: Param) -> Option<&str> {
        let slot = match param {
            Param::Enum => &self.enum_values,
            Param::Range => &self.range,
            Param::ExclusiveRange => &self.exclusive_range,
            Param::LengthRange => &self.length_range,
            Param::ItemsRange => &self.items_range,
            Param::PropertiesRange => &self.properties_range,
            Param::Regex => &self.regex,
            Param::MultipleOf => &self.multiple_of,
            Param::Format => &self.format,
            Param::Description => &self.description,
            Param::Default => &self.default,
            Param::Required => return None,
        };
        slot.as_deref()
    }

    fn param_mut(&mut self, param: Param) -> Option<&mut Option<String>> {
        Some(match param {
            Param::Enum => &mut self.enum_values,
            Param::Range => &mut self.range,
            Param::ExclusiveRange => &mut self.exclusive_range,
            Param::LengthRange => &mut self.length_range,
            Param::ItemsRange => &mut self.items_range,
            Param::PropertiesRange => &mut self.properties_range,
            Param::Regex => &mut self.regex,
            Param::MultipleOf => &mut self.multiple_of,
            Param::Format => &mut self.format,
            Param::Description => &mut self.description,
            Param::Default => &mut self.default,
            Param::Required => return None,
        })
    }

    /// Parameters allowed for this field's type that currently hold a value.
    ///
    /// An empty string counts as a value: the parameter is being edited.
    pub fn shown_params(&self) -> Vec<(Param, &str)> {
        self.field_type
            .allowed_params()
            .into_iter()
            .filter_map(|p| self.param(p).map(|v| (p, v)))
            .collect()
    }

    /// Whether the nested fields are in effect, i.e. no schema reference is set.
    pub fn uses_inline_fields(&self) -> bool {
        self.field_type == FieldType::Object && self.schema_ref.as_deref().is_none_or(str::is_empty)
    }

    /// Nested fields of an `object` field.
    ///
    /// Fields stored on any other type are not children.
    pub fn children(&self) -> Option<&[FieldNode]> {
        if self.field_type != FieldType::Object {
            return None;
        }
        self.fields.as_deref()
    }

    /// Nested fields of an `object` field, created empty if absent.
    pub fn children_mut(&mut self) -> Option<&mut Vec<FieldNode>> {
        if self.field_type != FieldType::Object {
            return None;
        }
        Some(self.fields.get_or_insert_with(Vec::new))
    }

    /// Raw JSON form of the field, unset properties omitted.
    pub fn as_json(&self) -> Value {
        let mut map = Map::new();
        map.insert("name".into(), Value::String(self.name.clone()));
        map.insert("type".into(), Value::String(self.field_type.to_string()));
        map.insert("required".into(), Value::Bool(self.required));
        for param in [Param::Description, Param::Default]
            .into_iter()
            .chain(Param::CONSTRAINTS)
        {
            if let Some(v) = self.param(param) {
                map.insert(param.to_string(), Value::String(v.to_string()));
            }
        }
        if let Some(fields) = &self.fields {
            map.insert(
                "fields".into(),
                Value::Array(fields.iter().map(FieldNode::as_json).collect()),
            );
        }
        if let Some(t) = self.items_type {
            map.insert("items_type".into(), Value::String(t.to_string()));
        }
        if let Some(r) = &self.schema_ref {
            map.insert("schemaRef".into(), Value::String(r.clone()));
        }
        Value::Object(map)
    }

    /// Apply one property edit.
    ///
    /// Changing the type resets the field to [`FieldNode::empty`] of the new
    /// type, keeping only `name` and `required`. Every other edit writes its
    /// value verbatim.
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Name(name) => self.name = name,
            FieldEdit::Type(field_type) => {
                let name = std::mem::take(&mut self.name);
                *self = Self {
                    name,
                    required: self.required,
                    ..Self::empty(field_type)
                };
            }
            FieldEdit::Required(required) => self.required = required,
            FieldEdit::Param(param, value) => match self.param_mut(param) {
                Some(slot) => *slot = value,
                None => warn!("`{param}` is not a text property, edit ignored"),
            },
            FieldEdit::ItemsType(items_type) => self.items_type = items_type,
            FieldEdit::SchemaRef(schema_ref) => self.schema_ref = schema_ref,
            FieldEdit::Fields(fields) => self.fields = Some(fields),
        }
    }
}

/// A single property change on a [`FieldNode`].
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEdit {
    Name(String),
    Type(FieldType),
    Required(bool),
    /// Set or unset a text parameter (a constraint, `description` or `default`).
    Param(Param, Option<String>),
    ItemsType(Option<FieldType>),
    SchemaRef(Option<String>),
    /// Replace the whole nested field sequence.
    Fields(Vec<FieldNode>),
}

/// Text that stands for "unset" when an edit is given as a string.
pub const UNSET: &str = "-";

impl FieldEdit {
    /// Build an edit from a property name and its text value.
    ///
    /// The value [`UNSET`] clears optional properties. `fields` takes a JSON
    /// list of fields.
    pub fn parse(prop: &str, value: &str) -> Result<Self, SchemaError> {
        let optional = |v: &str| (v != UNSET).then(|| v.to_string());
        Ok(match prop {
            "name" => FieldEdit::Name(value.to_string()),
            "type" => FieldEdit::Type(value.parse()?),
            "required" => FieldEdit::Required(value.parse().map_err(|_| {
                SchemaError::InvalidValue {
                    prop: prop.to_string(),
                    expected: "true or false".to_string(),
                    actual: value.to_string(),
                }
            })?),
            "items_type" => FieldEdit::ItemsType(match value {
                UNSET => None,
                v => Some(v.parse()?),
            }),
            "schemaRef" | "schema_ref" => FieldEdit::SchemaRef(optional(value)),
            "fields" => FieldEdit::Fields(serde_json::from_str(value)?),
            other => FieldEdit::Param(other.parse()?, optional(value)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_field_defaults() {
        let f = FieldNode::empty(FieldType::String);
        assert_eq!(f.name, "");
        assert!(f.required);
        assert_eq!(f.description.as_deref(), Some(""));
        assert!(f.fields.is_none());
        assert!(f.items_type.is_none());
        assert!(f.schema_ref.is_none());
        for p in Param::CONSTRAINTS {
            assert_eq!(f.param(p), None, "{p} should be unset");
        }
    }

    #[test]
    fn test_empty_composite_fields() {
        let obj = FieldNode::empty(FieldType::Object);
        assert_eq!(obj.fields, Some(vec![]));
        assert!(obj.items_type.is_none());

        let arr = FieldNode::empty(FieldType::Array);
        assert_eq!(arr.items_type, Some(FieldType::String));
        assert!(arr.fields.is_none());
    }

    #[test]
    fn test_type_switch_keeps_name_and_required() {
        let mut f = FieldNode::named("address", FieldType::Object);
        f.required = false;
        f.properties_range = Some("1,3".into());
        f.schema_ref = Some("Address".into());
        f.fields = Some(vec![
            FieldNode::named("a", FieldType::String),
            FieldNode::named("b", FieldType::Int),
            FieldNode::named("c", FieldType::Bool),
        ]);

        f.apply(FieldEdit::Type(FieldType::String));

        let mut expected = FieldNode::empty(FieldType::String);
        expected.name = "address".into();
        expected.required = false;
        assert_eq!(f, expected);
    }

    #[test]
    fn test_param_edit_distinguishes_empty_and_unset() {
        let mut f = FieldNode::empty(FieldType::Int);
        f.apply(FieldEdit::Param(Param::Range, Some(String::new())));
        assert_eq!(f.param(Param::Range), Some(""));
        assert_eq!(f.shown_params(), vec![(Param::Range, ""), (Param::Description, "")]);

        f.apply(FieldEdit::Param(Param::Range, None));
        assert_eq!(f.param(Param::Range), None);
    }

    #[test]
    fn test_shown_params_respect_type() {
        let mut f = FieldNode::empty(FieldType::Bool);
        f.regex = Some("^x$".into());
        f.enum_values = Some("true".into());
        let shown: Vec<_> = f.shown_params().into_iter().map(|(p, _)| p).collect();
        assert_eq!(shown, vec![Param::Enum, Param::Description]);
    }

    #[test]
    fn test_parse_edits() {
        assert_eq!(
            FieldEdit::parse("type", "float").unwrap(),
            FieldEdit::Type(FieldType::Float)
        );
        assert_eq!(
            FieldEdit::parse("required", "false").unwrap(),
            FieldEdit::Required(false)
        );
        assert_eq!(
            FieldEdit::parse("enum", "A, B").unwrap(),
            FieldEdit::Param(Param::Enum, Some("A, B".into()))
        );
        assert_eq!(
            FieldEdit::parse("regex", UNSET).unwrap(),
            FieldEdit::Param(Param::Regex, None)
        );
        assert_eq!(
            FieldEdit::parse("items_type", "int").unwrap(),
            FieldEdit::ItemsType(Some(FieldType::Int))
        );
        assert!(matches!(
            FieldEdit::parse("required", "yes"),
            Err(SchemaError::InvalidValue { .. })
        ));
        assert!(matches!(
            FieldEdit::parse("colour", "red"),
            Err(SchemaError::UnknownParam(_))
        ));
    }

    #[test]
    fn test_parse_fields_edit() {
        let edit = FieldEdit::parse("fields", r#"[{"name": "x", "type": "int"}]"#).unwrap();
        let FieldEdit::Fields(fields) = edit else {
            panic!("expected a fields edit");
        };
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].field_type, FieldType::Int);
        assert!(fields[0].required);
        assert_eq!(fields[0].description, None);
    }

    #[test]
    fn test_inline_fields_yield_to_schema_ref() {
        let mut f = FieldNode::empty(FieldType::Object);
        assert!(f.uses_inline_fields());
        f.apply(FieldEdit::SchemaRef(Some(String::new())));
        assert!(f.uses_inline_fields());
        f.apply(FieldEdit::SchemaRef(Some("Other".into())));
        assert!(!f.uses_inline_fields());
        assert_eq!(f.fields, Some(vec![]));
    }

    #[test]
    fn test_children_only_for_objects() {
        let mut s = FieldNode::empty(FieldType::String);
        s.fields = Some(vec![FieldNode::empty(FieldType::Int)]);
        assert!(s.children().is_none());
        assert!(s.children_mut().is_none());

        let mut o = FieldNode::empty(FieldType::Object);
        o.fields = None;
        o.children_mut().unwrap().push(FieldNode::empty(FieldType::Int));
        assert_eq!(o.fields.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_as_json_matches_serde_form() {
        let mut f = FieldNode::named("tags", FieldType::Array);
        f.enum_values = Some("a,b".into());
        f.items_range = Some(String::new());
        f.default = Some("a".into());
        assert_eq!(f.as_json(), serde_json::to_value(&f).unwrap());

        let keys: Vec<_> = f.as_json().as_object().unwrap().keys().cloned().collect();
        assert_eq!(
            keys,
            vec!["name", "type", "required", "description", "default", "enum", "items_range", "items_type"]
        );
    }

    #[test]
    fn test_deserialize_enum_list_and_scalars() {
        let f: FieldNode = serde_json::from_str(
            r#"{"name": "n", "type": "int", "enum": ["1", 2, "3"], "default": 5}"#,
        )
        .unwrap();
        assert_eq!(f.enum_values.as_deref(), Some("1, 2, 3"));
        assert_eq!(f.default.as_deref(), Some("5"));
    }
}
