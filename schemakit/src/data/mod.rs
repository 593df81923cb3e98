//! Schema document model.
//!
//! This module holds the editable model behind the schema builder:
//!
//! - [`types`] - Field type names and the parameters each type accepts
//! - [`field`] - Field nodes, their defaults and property edits
//! - [`document`] - Named schema documents
//! - [`path`] - Addressing fields at any nesting depth
//! - [`store`] - The document store and its edit operations
//! - [`error`] - Errors raised where text enters the model

/// Field type registry.
pub mod types;

/// Recursive field nodes and edits.
pub mod field;

/// Named, ordered field lists.
pub mod document;

/// Dot-separated field addresses.
pub mod path;

/// Owning collection of schema documents plus the selected tab.
pub mod store;

pub mod error;

pub use document::SchemaDocument;
pub use error::SchemaError;
pub use field::{FieldEdit, FieldNode, UNSET};
pub use path::FieldPath;
pub use store::{DanglingRef, DocumentStore};
pub use types::{FieldType, Param, allowed_params_for};
