use std::sync::Arc;

use log::{debug, warn};

use crate::data::{
    document::SchemaDocument,
    field::{FieldEdit, FieldNode},
    path::{self, FieldPath},
    types::FieldType,
};

/// All schema documents of an editing session plus the selected tab.
///
/// The store always holds at least one schema and the selection always
/// points at one of them. Field edits target the selected schema.
///
/// Edits never fail: values are stored as given, and an edit addressing a
/// field that does not exist leaves the store unchanged. Documents are
/// shared copy-on-write, so a [`snapshot`](Self::snapshot) is unaffected by
/// later edits.
#[derive(Debug, Clone)]
pub struct DocumentStore {
    schemas: Arc<Vec<SchemaDocument>>,
    selected: usize,
}

/// A `schemaRef` that names no existing schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingRef {
    /// Index of the schema holding the field.
    pub schema: usize,
    /// Location of the field within that schema.
    pub path: FieldPath,
    /// The referenced name.
    pub target: String,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentStore {
    /// A store with a single `Schema1` holding one blank field.
    pub fn new() -> Self {
        Self {
            schemas: Arc::new(vec![SchemaDocument::new("Schema1")]),
            selected: 0,
        }
    }

    /// Build a store from existing documents.
    ///
    /// An empty list gets the default schema, and an out-of-range selection
    /// is clamped to the last schema.
    pub fn from_parts(mut schemas: Vec<SchemaDocument>, selected: usize) -> Self {
        if schemas.is_empty() {
            schemas.push(SchemaDocument::new("Schema1"));
        }
        let selected = selected.min(schemas.len() - 1);
        Self {
            schemas: Arc::new(schemas),
            selected,
        }
    }

    pub fn schemas(&self) -> &[SchemaDocument] {
        &self.schemas
    }

    /// The current documents, frozen.
    pub fn snapshot(&self) -> Arc<Vec<SchemaDocument>> {
        Arc::clone(&self.schemas)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn selected(&self) -> &SchemaDocument {
        &self.schemas[self.selected]
    }

    /// Field at `path` in the selected schema.
    pub fn field(&self, path: &FieldPath) -> Option<&FieldNode> {
        path::resolve(&self.selected().fields, path)
    }

    fn schemas_mut(&mut self) -> &mut Vec<SchemaDocument> {
        Arc::make_mut(&mut self.schemas)
    }

    fn selected_fields_mut(&mut self) -> &mut Vec<FieldNode> {
        let idx = self.selected;
        &mut self.schemas_mut()[idx].fields
    }

    /// Append a schema named `Schema<n+1>` and select it.
    pub fn add_schema(&mut self) {
        let name = format!("Schema{}", self.len() + 1);
        debug!("add schema {name}");
        self.schemas_mut().push(SchemaDocument::new(name));
        self.selected = self.len() - 1;
    }

    /// Rename a schema. References to the old name are left as they are.
    pub fn rename_schema(&mut self, idx: usize, name: impl Into<String>) {
        if idx >= self.len() {
            warn!("rename: no schema at index {idx}");
            return;
        }
        let name = name.into();
        debug!("rename schema {idx} to {name:?}");
        self.schemas_mut()[idx].name = name;
    }

    /// Remove a schema unless it is the last one, selecting the one before it.
    pub fn remove_schema(&mut self, idx: usize) {
        if self.len() == 1 {
            warn!("the last schema cannot be removed");
            return;
        }
        if idx >= self.len() {
            warn!("remove: no schema at index {idx}");
            return;
        }
        debug!("remove schema {idx}");
        self.schemas_mut().remove(idx);
        self.selected = idx.saturating_sub(1);
    }

    pub fn select_schema(&mut self, idx: usize) {
        if idx >= self.len() {
            warn!("select: no schema at index {idx}");
            return;
        }
        self.selected = idx;
    }

    /// Apply an edit to the field at `path` in the selected schema.
    pub fn set_field(&mut self, path: &FieldPath, edit: FieldEdit) {
        if self.field(path).is_none() {
            warn!("set: no field at {path}");
            return;
        }
        debug!("set field {path}: {edit:?}");
        if let Some(field) = path::resolve_mut(self.selected_fields_mut(), path) {
            field.apply(edit);
        }
    }

    /// Point an `object` field at another schema by name. Nested fields are kept.
    pub fn set_field_schema_ref(&mut self, path: &FieldPath, schema_name: impl Into<String>) {
        self.set_field(path, FieldEdit::SchemaRef(Some(schema_name.into())));
    }

    /// Append a blank field to the selected schema's top level.
    pub fn add_field(&mut self, field_type: FieldType) {
        self.add_field_at(None, field_type);
    }

    /// Remove a top-level field of the selected schema.
    pub fn remove_field(&mut self, idx: usize) {
        self.remove_field_at(&FieldPath::top(idx));
    }

    /// Append a blank field under `parent`, or at the top level when `None`.
    ///
    /// The parent must be an `object` field.
    pub fn add_field_at(&mut self, parent: Option<&FieldPath>, field_type: FieldType) {
        if let Some(p) = parent {
            match self.field(p) {
                Some(f) if f.field_type == FieldType::Object => {}
                Some(_) => {
                    warn!("add: field {p} is not an object");
                    return;
                }
                None => {
                    warn!("add: no field at {p}");
                    return;
                }
            }
        }
        debug!(
            "add {field_type} field under {}",
            parent.map_or_else(|| "top level".to_string(), ToString::to_string)
        );
        let fields = self.selected_fields_mut();
        let target = match parent {
            None => Some(fields),
            Some(p) => path::resolve_mut(fields, p).and_then(FieldNode::children_mut),
        };
        if let Some(seq) = target {
            seq.push(FieldNode::empty(field_type));
        }
    }

    /// Remove the field at `path`, at any depth.
    pub fn remove_field_at(&mut self, path: &FieldPath) {
        if self.field(path).is_none() {
            warn!("remove: no field at {path}");
            return;
        }
        if let Some(seq) = path::siblings_mut(self.selected_fields_mut(), path) {
            seq.remove(path.last());
            debug!("removed field {path}");
        }
    }

    /// Schema names an `object` field of the selected schema may refer to.
    pub fn schema_ref_options(&self) -> Vec<&str> {
        self.schemas
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != self.selected)
            .map(|(_, s)| s.name.as_str())
            .collect()
    }

    /// Fields whose non-empty `schemaRef` matches no schema name.
    pub fn dangling_refs(&self) -> Vec<DanglingRef> {
        let mut out = Vec::new();
        for (i, schema) in self.schemas.iter().enumerate() {
            path::walk(&schema.fields, |p, f| {
                if let Some(target) = f.schema_ref.as_deref().filter(|t| !t.is_empty())
                    && !self.schemas.iter().any(|s| s.name == target)
                {
                    out.push(DanglingRef {
                        schema: i,
                        path: p.clone(),
                        target: target.to_string(),
                    });
                }
            });
        }
        out
    }

    /// Serialized output of every schema.
    pub fn render(&self) -> String {
        crate::render::render(&self.schemas)
    }
}
