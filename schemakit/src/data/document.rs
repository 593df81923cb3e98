use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::data::{field::FieldNode, types::FieldType};

/// A named, ordered list of fields.
///
/// The name is both the tab label and the token `schemaRef` fields use to
/// point at this schema. It is not required to be unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SchemaDocument {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<FieldNode>,
}

impl SchemaDocument {
    /// A schema holding one blank `string` field.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: vec![FieldNode::empty(FieldType::String)],
        }
    }
}
