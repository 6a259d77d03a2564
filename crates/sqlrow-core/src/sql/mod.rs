//! SQL-side helpers: the select-fragment generator whose aliases agree
//! with the decoder, a small composable query builder, and named-argument
//! utilities.

mod args;
mod builder;

pub use args::{record_args, SqlArg, SqlArgs};
pub use builder::SqlQuery;

use crate::traits::{FieldKind, FieldMeta, Record};

/// Render the `select` fragment for a record destination.
///
/// Root leaves render as `"tag"`. Nested leaves render as composite
/// access with the alias the decoder expects:
///
/// ```text
/// "val", ("nested")."val" as "nested.val"
/// ```
///
/// The output is the caller's to splice into a `select` clause; it is the
/// only way to guarantee the column aliases agree with the decoder.
#[must_use]
pub fn columns_of<R: Record>() -> String {
    let mut selectors = Vec::new();
    let mut path = Vec::new();
    collect_selectors(R::fields(), &mut path, &mut selectors);
    selectors.join(", ")
}

fn collect_selectors(
    fields: &'static [FieldMeta],
    path: &mut Vec<&'static str>,
    out: &mut Vec<String>,
) {
    for meta in fields {
        match meta.kind {
            FieldKind::Leaf { .. } => {
                if excluded(meta.tag) {
                    continue;
                }
                out.push(render_selector(path, meta.tag));
            }
            FieldKind::Record { fields, .. } => {
                if excluded(meta.tag) {
                    continue;
                }
                path.push(meta.tag);
                collect_selectors(fields(), path, out);
                path.pop();
            }
            FieldKind::Flattened { fields } => {
                // Embedded records render at the enclosing level.
                collect_selectors(fields(), path, out);
            }
        }
    }
}

fn render_selector(path: &[&str], tag: &str) -> String {
    if path.is_empty() {
        return format!("\"{tag}\"");
    }

    // First hop parenthesised for composite-column access, the rest as
    // dotted field access, then the alias the plan builder expects.
    let mut selector = format!("(\"{}\")", path[0]);
    for segment in &path[1..] {
        selector.push_str(&format!(".\"{segment}\""));
    }
    selector.push_str(&format!(".\"{tag}\""));

    let mut alias = path.join(".");
    alias.push('.');
    alias.push_str(tag);

    format!("{selector} as \"{alias}\"")
}

fn excluded(tag: &str) -> bool {
    tag.is_empty() || tag == "-"
}
