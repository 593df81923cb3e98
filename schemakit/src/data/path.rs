use std::{fmt, str::FromStr};

use crate::data::{error::SchemaError, field::FieldNode, types::FieldType};

/// Address of a field inside a schema: child indices from the top level down.
///
/// Written dot-separated, `"1.0.2"` is the third nested field of the first
/// nested field of top-level field 1.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldPath(Vec<usize>);

impl FieldPath {
    /// Path of a top-level field.
    pub fn top(idx: usize) -> Self {
        Self(vec![idx])
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Path of the containing field, `None` at the top level.
    pub fn parent(&self) -> Option<FieldPath> {
        (self.0.len() > 1).then(|| FieldPath(self.0[..self.0.len() - 1].to_vec()))
    }

    /// Index within the containing sequence.
    pub fn last(&self) -> usize {
        self.0[self.0.len() - 1]
    }

    /// Path of the `idx`-th nested field of this one.
    pub fn child(&self, idx: usize) -> FieldPath {
        let mut v = self.0.clone();
        v.push(idx);
        FieldPath(v)
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, idx) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{idx}")?;
        }
        Ok(())
    }
}

impl FromStr for FieldPath {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let indices = s
            .split('.')
            .map(|part| part.trim().parse::<usize>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| SchemaError::InvalidPath(s.to_string()))?;
        Ok(FieldPath(indices))
    }
}

impl From<usize> for FieldPath {
    fn from(idx: usize) -> Self {
        FieldPath::top(idx)
    }
}

/// Field at `path` within a top-level field list.
///
/// Every intermediate node must be an `object` field holding nested fields;
/// `fields` stored on any other type are not walked into.
pub fn resolve<'a>(fields: &'a [FieldNode], path: &FieldPath) -> Option<&'a FieldNode> {
    let (first, rest) = path.indices().split_first()?;
    let mut node = fields.get(*first)?;
    for idx in rest {
        node = node.children()?.get(*idx)?;
    }
    Some(node)
}

/// Mutable counterpart of [`resolve`].
pub fn resolve_mut<'a>(fields: &'a mut [FieldNode], path: &FieldPath) -> Option<&'a mut FieldNode> {
    let (first, rest) = path.indices().split_first()?;
    let mut node = fields.get_mut(*first)?;
    for idx in rest {
        if node.field_type != FieldType::Object {
            return None;
        }
        node = node.fields.as_mut()?.get_mut(*idx)?;
    }
    Some(node)
}

/// The sequence holding the field at `path`: the top-level list or the
/// nested fields of its parent.
pub fn siblings_mut<'a>(
    fields: &'a mut Vec<FieldNode>,
    path: &FieldPath,
) -> Option<&'a mut Vec<FieldNode>> {
    match path.parent() {
        None => Some(fields),
        Some(parent) => resolve_mut(fields, &parent)?.children_mut(),
    }
}

/// Walk every field depth-first, in sequence order, descending into
/// `object` fields only.
pub fn walk<'a>(fields: &'a [FieldNode], mut visit: impl FnMut(&FieldPath, &'a FieldNode)) {
    fn go<'a>(
        fields: &'a [FieldNode],
        prefix: Option<&FieldPath>,
        visit: &mut dyn FnMut(&FieldPath, &'a FieldNode),
    ) {
        for (i, f) in fields.iter().enumerate() {
            let path = match prefix {
                Some(p) => p.child(i),
                None => FieldPath::top(i),
            };
            visit(&path, f);
            if let Some(children) = f.children() {
                go(children, Some(&path), visit);
            }
        }
    }
    go(fields, None, &mut visit);
}
