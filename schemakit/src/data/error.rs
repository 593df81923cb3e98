use thiserror::Error;

/// Errors raised while parsing names, paths or imported schema text.
///
/// Edits on a [`DocumentStore`](crate::data::DocumentStore) never fail; these
/// only occur where text enters the model.
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("unknown field type `{0}`")]
    UnknownType(String),

    #[error("unknown field property `{0}`")]
    UnknownParam(String),

    #[error("invalid field path `{0}`")]
    InvalidPath(String),

    #[error("invalid value for `{prop}`: expected {expected}, got `{actual}`")]
    InvalidValue {
        prop: String,
        expected: String,
        actual: String,
    },

    #[error("type mismatch at {path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    #[error("malformed schema text: {0}")]
    Malformed(#[from] serde_json::Error),
}
