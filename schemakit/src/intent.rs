//! User intents dispatched by a presentation layer into a [`DocumentStore`].
//!
//! Each intent has a one-line text form, used by scripts and the
//! interactive shell:
//!
//! ```text
//! add-schema
//! rename-schema 1 Person
//! remove-schema 2
//! select 0
//! set 0.1 enum "A, B"
//! set-ref 0 Address
//! add-field int          # top level
//! add-field int 0        # nested under field 0
//! remove-field 0.1
//! ```
//!
//! Arguments are whitespace separated; double quotes group words and `\"`
//! escapes a quote inside them.

use std::str::FromStr;

use thiserror::Error;

use crate::data::{DocumentStore, FieldEdit, FieldPath, FieldType, SchemaError};

/// One editing operation on a document store.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    AddSchema,
    RenameSchema { idx: usize, name: String },
    RemoveSchema { idx: usize },
    SelectSchema { idx: usize },
    SetField { path: FieldPath, edit: FieldEdit },
    SetSchemaRef { path: FieldPath, schema: String },
    AddField { parent: Option<FieldPath>, field_type: FieldType },
    RemoveField { path: FieldPath },
}

#[derive(Debug, Error)]
pub enum IntentError {
    #[error("empty intent")]
    Empty,

    #[error("unknown intent `{0}`")]
    UnknownVerb(String),

    #[error("`{verb}` expects {expected}")]
    Arity { verb: String, expected: &'static str },

    #[error("invalid index `{0}`")]
    InvalidIndex(String),

    #[error("unterminated quote")]
    UnterminatedQuote,

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Split a line into words, honouring double quotes.
pub fn split_words(line: &str) -> Result<Vec<String>, IntentError> {
    let mut words = Vec::new();
    let mut chars = line.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let Some(&c) = chars.peek() else {
            break;
        };
        let mut word = String::new();
        if c == '"' {
            chars.next();
            let mut closed = false;
            while let Some(c) = chars.next() {
                match c {
                    '\\' if chars.peek() == Some(&'"') => {
                        chars.next();
                        word.push('"');
                    }
                    '"' => {
                        closed = true;
                        break;
                    }
                    c => word.push(c),
                }
            }
            if !closed {
                return Err(IntentError::UnterminatedQuote);
            }
        } else {
            while let Some(c) = chars.next_if(|c| !c.is_whitespace()) {
                word.push(c);
            }
        }
        words.push(word);
    }
    Ok(words)
}

fn index(s: &str) -> Result<usize, IntentError> {
    s.parse().map_err(|_| IntentError::InvalidIndex(s.to_string()))
}

impl FromStr for Intent {
    type Err = IntentError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let words = split_words(line)?;
        let Some((verb, args)) = words.split_first() else {
            return Err(IntentError::Empty);
        };
        let arity = |expected| IntentError::Arity {
            verb: verb.clone(),
            expected,
        };

        let intent = match (verb.as_str(), args) {
            ("add-schema", []) => Intent::AddSchema,
            ("add-schema", _) => return Err(arity("no arguments")),
            ("rename-schema", [idx, name]) => Intent::RenameSchema {
                idx: index(idx)?,
                name: name.clone(),
            },
            ("rename-schema", _) => return Err(arity("<index> <name>")),
            ("remove-schema", [idx]) => Intent::RemoveSchema { idx: index(idx)? },
            ("remove-schema", _) => return Err(arity("<index>")),
            ("select", [idx]) => Intent::SelectSchema { idx: index(idx)? },
            ("select", _) => return Err(arity("<index>")),
            ("set", [path, prop, value]) => Intent::SetField {
                path: path.parse()?,
                edit: FieldEdit::parse(prop, value)?,
            },
            ("set", _) => return Err(arity("<path> <property> <value>")),
            ("set-ref", [path, schema]) => Intent::SetSchemaRef {
                path: path.parse()?,
                schema: schema.clone(),
            },
            ("set-ref", _) => return Err(arity("<path> <schema>")),
            ("add-field", []) => Intent::AddField {
                parent: None,
                field_type: FieldType::String,
            },
            ("add-field", [t]) => Intent::AddField {
                parent: None,
                field_type: t.parse()?,
            },
            ("add-field", [t, parent]) => Intent::AddField {
                parent: Some(parent.parse()?),
                field_type: t.parse()?,
            },
            ("add-field", _) => return Err(arity("[type] [parent path]")),
            ("remove-field", [path]) => Intent::RemoveField { path: path.parse()? },
            ("remove-field", _) => return Err(arity("<path>")),
            (other, _) => return Err(IntentError::UnknownVerb(other.to_string())),
        };
        Ok(intent)
    }
}

impl DocumentStore {
    /// Dispatch an intent to the matching store operation.
    pub fn apply(&mut self, intent: Intent) {
        match intent {
            Intent::AddSchema => self.add_schema(),
            Intent::RenameSchema { idx, name } => self.rename_schema(idx, name),
            Intent::RemoveSchema { idx } => self.remove_schema(idx),
            Intent::SelectSchema { idx } => self.select_schema(idx),
            Intent::SetField { path, edit } => self.set_field(&path, edit),
            Intent::SetSchemaRef { path, schema } => self.set_field_schema_ref(&path, schema),
            Intent::AddField { parent, field_type } => {
                self.add_field_at(parent.as_ref(), field_type)
            }
            Intent::RemoveField { path } => self.remove_field_at(&path),
        }
    }

    /// Parse and apply intent lines, skipping blanks and `#` comments.
    ///
    /// Stops at the first line that fails to parse, returning its 1-based
    /// line number with the error. Lines before it stay applied.
    pub fn apply_script(&mut self, script: &str) -> Result<usize, (usize, IntentError)> {
        let mut applied = 0;
        for (n, line) in script.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let intent = line.parse::<Intent>().map_err(|e| (n + 1, e))?;
            self.apply(intent);
            applied += 1;
        }
        Ok(applied)
    }
}
