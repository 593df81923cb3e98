//! # schemakit
//!
//! Editable schema documents: named record definitions built from typed
//! fields with validation constraints, nested `object` fields and
//! references between schemas, rendered to a live JSON view.
//!
//! ## Features
//!
//! - Seven field types with type-gated constraint parameters
//! - Arbitrarily deep nested `object` fields, addressed by dot paths
//! - Cross-schema references by name
//! - Deterministic JSON rendering with enum normalization
//! - One-line edit intents for scripts and interactive front ends
//! - Session files in JSON or TOML
//! - Checking JSON data against a schema
//!
//! ## Quick Start
//!
//! ```rust
//! use schemakit::data::{DocumentStore, FieldEdit, FieldPath, FieldType, Param};
//!
//! let mut store = DocumentStore::new();
//! let status = FieldPath::top(0);
//! store.set_field(&status, FieldEdit::Name("status".into()));
//! store.set_field(&status, FieldEdit::Param(Param::Enum, Some("on, off".into())));
//! store.add_field(FieldType::Int);
//!
//! let text = store.render();
//! assert!(text.contains("\"status\""));
//! ```
//!
//! ## Modules
//!
//! - [`data`] - The document model and its edit operations
//! - [`render`] - Serialized output and re-import
//! - [`intent`] - Text-form edit intents
//! - [`session`] - Session files
//! - [`validate`] - Data validation against a schema

/// The schema document model.
///
/// Field types, field nodes, schema documents and the store that owns
/// them.
pub mod data;

/// Edit intents dispatched by a front end.
pub mod intent;

/// Rendering schemas to text and parsing them back.
pub mod render;

/// Saving and loading editing sessions.
pub mod session;

/// Checking data against the schemas of a store.
pub mod validate;

pub use data::{DocumentStore, FieldNode, FieldType, SchemaDocument};
pub use intent::{Intent, IntentError};
pub use render::render;
pub use session::{Session, SessionError};
pub use validate::{ValidationError, validate};
