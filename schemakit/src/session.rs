use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::data::{DocumentStore, SchemaDocument, SchemaError};

/// Saved state of an editing session.
///
/// Fields are kept in their editable form: enum values stay as text and
/// unset properties are distinguished from empty ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Session {
    /// Index of the selected schema.
    #[serde(default)]
    pub selected: usize,
    /// All schemas, in tab order.
    pub schemas: Vec<SchemaDocument>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unsupported session file extension: {0:?}")]
    UnsupportedExtension(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid JSON session: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid TOML session: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("cannot write TOML session: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// On-disk encodings, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Toml,
}

impl Format {
    pub fn from_path(path: &Path) -> Result<Self, SessionError> {
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        match ext {
            "json" => Ok(Format::Json),
            "toml" | "tml" => Ok(Format::Toml),
            _ => Err(SessionError::UnsupportedExtension(ext.to_string())),
        }
    }
}

impl From<&DocumentStore> for Session {
    fn from(store: &DocumentStore) -> Self {
        Self {
            selected: store.selected_index(),
            schemas: store.schemas().to_vec(),
        }
    }
}

impl From<Session> for DocumentStore {
    fn from(session: Session) -> Self {
        DocumentStore::from_parts(session.schemas, session.selected)
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::from(&DocumentStore::new())
    }
}

impl Session {
    /// Decode a session from text.
    ///
    /// JSON input may also be rendered output, a bare list of schemas, which
    /// loads with the first schema selected.
    pub fn decode(content: &str, format: Format) -> Result<Self, SessionError> {
        match format {
            Format::Json => {
                let value: Value = serde_json::from_str(content)?;
                if value.is_array() {
                    return Ok(Session {
                        selected: 0,
                        schemas: crate::render::from_value(&value)?,
                    });
                }
                Ok(serde_json::from_value(value)?)
            }
            Format::Toml => Ok(toml::from_str(content)?),
        }
    }

    /// Encode the session as text.
    pub fn encode(&self, format: Format) -> Result<String, SessionError> {
        Ok(match format {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        })
    }

    /// Load a session file; a missing or blank file gives a fresh session.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        if !path.exists() {
            info!("{} not found, starting a new session", path.display());
            return Ok(Session::default());
        }
        let content = fs::read_to_string(path).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if content.trim().is_empty() {
            return Ok(Session::default());
        }
        Self::decode(&content, format)
    }

    /// Write the session, backing up an existing file first.
    ///
    /// Returns the backup path when one was written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<Option<PathBuf>, SessionError> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
        let content = self.encode(format)?;
        let io_err = |source: std::io::Error| SessionError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut backup = None;
        if path.exists() {
            let secs = SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default();
            let backup_path = path.with_extension(format!("bk-{secs}.{ext}"));
            fs::copy(path, &backup_path).map_err(io_err)?;
            debug!("backed up {} to {}", path.display(), backup_path.display());
            backup = Some(backup_path);
        }
        fs::write(path, content).map_err(io_err)?;
        Ok(backup)
    }
}
