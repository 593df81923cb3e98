//! Text rendering of the editor screen: tab strip, field tree and output.

use std::fmt::Write;

use colored::Colorize;
use schemakit::{
    DocumentStore, FieldNode,
    data::{FieldPath, FieldType},
};

/// One line listing every schema, the selected one highlighted.
pub fn tab_strip(store: &DocumentStore) -> String {
    let mut line = String::new();
    for (i, schema) in store.schemas().iter().enumerate() {
        if i > 0 {
            line.push(' ');
        }
        let label = format!("[{i}:{}]", schema.name);
        if i == store.selected_index() {
            let _ = write!(line, "{}", label.reversed().bold());
        } else {
            let _ = write!(line, "{label}");
        }
    }
    line
}

fn field_line(path: &FieldPath, field: &FieldNode) -> String {
    let indent = "  ".repeat(path.depth() - 1);
    let name = if field.name.is_empty() {
        "<unnamed>".dimmed().to_string()
    } else {
        field.name.bold().to_string()
    };
    let mut line = format!("{indent}{path} {name}: {}", field.field_type.to_string().cyan());
    if field.field_type == FieldType::Array
        && let Some(items) = field.items_type
    {
        let _ = write!(line, "<{items}>");
    }
    if !field.required {
        line.push('?');
    }
    if let Some(target) = field.schema_ref.as_deref().filter(|t| !t.is_empty()) {
        let _ = write!(line, " -> {}", target.yellow());
    }
    for (param, value) in field.shown_params() {
        let _ = write!(line, " {param}={value:?}");
    }
    line
}

fn push_fields(out: &mut String, fields: &[FieldNode], parent: Option<&FieldPath>) {
    for (i, field) in fields.iter().enumerate() {
        let path = match parent {
            Some(p) => p.child(i),
            None => FieldPath::top(i),
        };
        out.push_str(&field_line(&path, field));
        out.push('\n');
        if field.uses_inline_fields()
            && let Some(children) = &field.fields
        {
            push_fields(out, children, Some(&path));
        }
    }
}

/// The selected schema's fields, one per line, nested fields indented.
///
/// Nested fields of an `object` that refers to another schema are hidden.
pub fn field_tree(store: &DocumentStore) -> String {
    let mut out = String::new();
    push_fields(&mut out, &store.selected().fields, None);
    out
}

/// Everything the shell shows after an edit.
pub fn screen(store: &DocumentStore) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", tab_strip(store));
    out.push('\n');
    out.push_str(&field_tree(store));

    let options = store.schema_ref_options();
    if !options.is_empty() {
        let _ = writeln!(out, "{} {}", "refs:".dimmed(), options.join(", "));
    }
    for dangling in store.dangling_refs() {
        let _ = writeln!(
            out,
            "{} schema {} field {} refers to missing `{}`",
            "warning:".yellow().bold(),
            dangling.schema,
            dangling.path,
            dangling.target
        );
    }
    out.push('\n');
    out.push_str(&store.render());
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain() {
        colored::control::set_override(false);
    }

    fn store() -> DocumentStore {
        let mut store = DocumentStore::new();
        store
            .apply_script(
                r#"
set 0 name id
set 0 type int
set 0 range_ 1,9
add-field object
set 1 name home
set 1 required false
add-field string 1
set 1.0 name street
add-field array
set 2 name tags
add-schema
rename-schema 1 Address
select 0
"#,
            )
            .unwrap();
        store
    }

    #[test]
    fn test_tab_strip() {
        plain();
        assert_eq!(tab_strip(&store()), "[0:Schema1] [1:Address]");
    }

    #[test]
    fn test_field_tree() {
        plain();
        let tree = field_tree(&store());
        let lines: Vec<_> = tree.lines().collect();
        assert_eq!(
            lines,
            vec![
                r#"0 id: int range_="1,9" description="""#,
                r#"1 home: object? description="""#,
                r#"  1.0 street: string description="""#,
                r#"2 tags: array<string> description="""#,
            ]
        );
    }

    #[test]
    fn test_schema_ref_hides_nested_fields() {
        plain();
        let mut store = store();
        store.apply("set-ref 1 Address".parse().unwrap());
        let tree = field_tree(&store);
        assert!(tree.contains("1 home: object? -> Address"));
        assert!(!tree.contains("street"));
    }

    #[test]
    fn test_screen_warns_on_dangling_ref() {
        plain();
        let mut store = store();
        store.apply("set-ref 1 Address".parse().unwrap());
        store.apply("rename-schema 1 Place".parse().unwrap());
        let screen = screen(&store);
        assert!(screen.contains("refs: Place"));
        assert!(screen.contains("warning: schema 0 field 1 refers to missing `Address`"));
        assert!(screen.ends_with("]\n"));
    }
}
