//! Field type names and the constraint parameters each type accepts.

use std::{fmt, str::FromStr};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::data::error::SchemaError;

/// The fixed set of field types a schema field can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Text value.
    String,
    /// Integer value.
    Int,
    /// Floating-point value.
    Float,
    /// Boolean value.
    Bool,
    /// Sequence of values of one item type.
    Array,
    /// Composite value with nested fields or a schema reference.
    Object,
    /// Unconstrained value.
    Any,
}

impl FieldType {
    /// All types, in the order the editor lists them.
    pub const ALL: [FieldType; 7] = [
        FieldType::String,
        FieldType::Int,
        FieldType::Float,
        FieldType::Bool,
        FieldType::Array,
        FieldType::Object,
        FieldType::Any,
    ];

    /// Type name as written in schema output.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Array => "array",
            FieldType::Object => "object",
            FieldType::Any => "any",
        }
    }

    /// Types selectable as the element type of an array.
    pub fn item_types() -> impl Iterator<Item = FieldType> {
        Self::ALL.into_iter().filter(|t| *t != FieldType::Array)
    }

    /// Constraint parameters specific to this type.
    pub fn type_params(self) -> &'static [Param] {
        match self {
            FieldType::String => &[
                Param::Enum,
                Param::LengthRange,
                Param::Regex,
                Param::Format,
            ],
            FieldType::Int | FieldType::Float => &[
                Param::Enum,
                Param::Range,
                Param::ExclusiveRange,
                Param::MultipleOf,
            ],
            FieldType::Bool | FieldType::Any => &[Param::Enum],
            FieldType::Array => &[Param::Enum, Param::ItemsRange],
            FieldType::Object => &[Param::Enum, Param::PropertiesRange],
        }
    }

    /// Type-specific parameters followed by the common ones.
    pub fn allowed_params(self) -> Vec<Param> {
        let mut params = self.type_params().to_vec();
        for p in Param::COMMON {
            if !params.contains(&p) {
                params.push(p);
            }
        }
        params
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownType(s.to_string()))
    }
}

/// Parameters allowed for a type given by name.
///
/// Unrecognized names fall back to the parameter set of [`FieldType::Any`].
pub fn allowed_params_for(type_name: &str) -> Vec<Param> {
    type_name
        .parse::<FieldType>()
        .unwrap_or(FieldType::Any)
        .allowed_params()
}

/// Named parameters a field may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Param {
    Enum,
    Range,
    ExclusiveRange,
    LengthRange,
    ItemsRange,
    PropertiesRange,
    Regex,
    MultipleOf,
    Format,
    Description,
    Required,
    Default,
}

impl Param {
    /// Parameters every type accepts.
    pub const COMMON: [Param; 3] = [Param::Description, Param::Required, Param::Default];

    /// Constraint parameters, stored as raw text on a field.
    pub const CONSTRAINTS: [Param; 9] = [
        Param::Enum,
        Param::Range,
        Param::ExclusiveRange,
        Param::MultipleOf,
        Param::LengthRange,
        Param::ItemsRange,
        Param::PropertiesRange,
        Param::Regex,
        Param::Format,
    ];

    /// Property name as written in schema output.
    pub fn as_str(self) -> &'static str {
        match self {
            Param::Enum => "enum",
            Param::Range => "range_",
            Param::ExclusiveRange => "exclusive_range",
            Param::LengthRange => "length_range",
            Param::ItemsRange => "items_range",
            Param::PropertiesRange => "properties_range",
            Param::Regex => "regex",
            Param::MultipleOf => "multiple_of",
            Param::Format => "format_",
            Param::Description => "description",
            Param::Required => "required",
            Param::Default => "default",
        }
    }

    /// Whether this is one of the raw-text constraint parameters.
    pub fn is_constraint(self) -> bool {
        Self::CONSTRAINTS.contains(&self)
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Param {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::CONSTRAINTS
            .into_iter()
            .chain(Self::COMMON)
            .find(|p| p.as_str() == s)
            .ok_or_else(|| SchemaError::UnknownParam(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_type_has_common_params() {
        for t in FieldType::ALL {
            let params = t.allowed_params();
            for p in Param::COMMON {
                assert!(params.contains(&p), "{t} is missing {p}");
            }
        }
    }

    #[test]
    fn test_numeric_params() {
        assert_eq!(
            FieldType::Int.allowed_params(),
            vec![
                Param::Enum,
                Param::Range,
                Param::ExclusiveRange,
                Param::MultipleOf,
                Param::Description,
                Param::Required,
                Param::Default,
            ]
        );
        assert_eq!(FieldType::Int.allowed_params(), FieldType::Float.allowed_params());
    }

    #[test]
    fn test_unknown_type_falls_back_to_any() {
        assert_eq!(
            allowed_params_for("decimal"),
            vec![
                Param::Enum,
                Param::Description,
                Param::Required,
                Param::Default
            ]
        );
        assert_eq!(allowed_params_for("string"), FieldType::String.allowed_params());
    }

    #[test]
    fn test_type_names_round_trip() {
        for t in FieldType::ALL {
            assert_eq!(t.as_str().parse::<FieldType>().unwrap(), t);
        }
        assert!(matches!(
            "Object".parse::<FieldType>(),
            Err(SchemaError::UnknownType(_))
        ));
    }

    #[test]
    fn test_item_types_exclude_array() {
        let items: Vec<_> = FieldType::item_types().collect();
        assert_eq!(items.len(), 6);
        assert!(!items.contains(&FieldType::Array));
    }

    #[test]
    fn test_param_names() {
        assert_eq!("range_".parse::<Param>().unwrap(), Param::Range);
        assert_eq!("format_".parse::<Param>().unwrap(), Param::Format);
        assert_eq!("default".parse::<Param>().unwrap(), Param::Default);
        assert!("range".parse::<Param>().is_err());
        assert!(Param::Regex.is_constraint());
        assert!(!Param::Required.is_constraint());
    }
}
