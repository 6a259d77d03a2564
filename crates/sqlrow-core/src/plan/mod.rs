//! Decode plans: the precomputed mapping from a cursor's column list onto
//! positions inside a destination record type.
//!
//! A plan is a pure function of the destination type and the column list;
//! callers may cache one and reuse it for every row of a result set.


use crate::error::{Error, ErrorCode};
use crate::traits::{FieldKind, FieldMeta, Record};
use std::collections::HashMap;

///
/// Plan
///
/// Built once per query from the driver-reported column list and the
/// destination type. Holds the alias table (every leaf alias and its
/// expected leaf type) and the interior-node tree the row decoder walks.
///
/// Invariants, checked at build time:
/// - every alias maps to at most one column (otherwise `RedundantCol`)
/// - every column maps to some alias (otherwise `NoColDest`)
///

#[derive(Debug)]
pub struct Plan {
    columns: Vec<String>,
    aliases: HashMap<String, &'static str>,
    root: RecordNode,
}

impl Plan {
    pub fn build<R: Record>(columns: &[String]) -> Result<Self, Error> {
        let mut aliases = HashMap::new();
        let mut root = RecordNode::new(Vec::new(), false);

        let mut tags = Vec::new();
        let mut steps = Vec::new();
        walk(
            R::fields(),
            columns,
            &mut tags,
            &mut steps,
            &mut root,
            &mut aliases,
        )?;
        root.collect_mapped();

        for name in columns {
            if !aliases.contains_key(name.as_str()) {
                return Err(Error::new(ErrorCode::NoColDest)
                    .during("preparing decode plan")
                    .with_message(format!(
                        "column \"{name}\" has no matching destination field"
                    )));
            }
        }

        Ok(Self {
            columns: columns.to_vec(),
            aliases,
            root,
        })
    }

    /// The driver's claimed output schema this plan was built against.
    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Every leaf alias and its expected leaf type name.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &'static str)> {
        self.aliases.iter().map(|(alias, ty)| (alias.as_str(), *ty))
    }

    pub(crate) const fn root(&self) -> &RecordNode {
        &self.root
    }
}

///
/// RecordNode
///
/// One interior node of the plan tree, mirroring a (nested) record of the
/// destination type. `steps` navigate from the parent node's record:
/// flatten hops first, then the field index of this record.
///

#[derive(Debug)]
pub(crate) struct RecordNode {
    pub(crate) steps: Vec<usize>,
    /// True when this record, or any enclosing record above the root,
    /// can represent absence; such a node may be elided.
    pub(crate) nilable_path: bool,
    pub(crate) leaves: Vec<LeafNode>,
    pub(crate) children: Vec<RecordNode>,
    /// Column indexes of every mapped leaf in this subtree.
    pub(crate) mapped_columns: Vec<usize>,
}

impl RecordNode {
    fn new(steps: Vec<usize>, nilable_path: bool) -> Self {
        Self {
            steps,
            nilable_path,
            leaves: Vec::new(),
            children: Vec::new(),
            mapped_columns: Vec::new(),
        }
    }

    fn collect_mapped(&mut self) {
        let mut mapped: Vec<usize> = self.leaves.iter().filter_map(|leaf| leaf.column).collect();
        for child in &mut self.children {
            child.collect_mapped();
            mapped.extend_from_slice(&child.mapped_columns);
        }
        self.mapped_columns = mapped;
    }
}

///
/// LeafNode
///
/// A direct leaf of an interior node. `column` is the position in the
/// cursor's column list, or `None` when the query did not select this
/// field — such leaves are never touched by the decoder.
///

#[derive(Debug)]
pub(crate) struct LeafNode {
    pub(crate) alias: String,
    pub(crate) steps: Vec<usize>,
    pub(crate) column: Option<usize>,
    pub(crate) ty: &'static str,
}

fn walk(
    fields: &'static [FieldMeta],
    columns: &[String],
    tags: &mut Vec<&'static str>,
    steps: &mut Vec<usize>,
    node: &mut RecordNode,
    aliases: &mut HashMap<String, &'static str>,
) -> Result<(), Error> {
    for (index, meta) in fields.iter().enumerate() {
        match meta.kind {
            FieldKind::Leaf { ty, .. } => {
                if excluded(meta.tag) {
                    continue;
                }
                let alias = join_alias(tags, meta.tag);
                if aliases.insert(alias.clone(), ty).is_some() {
                    return Err(Error::new(ErrorCode::RedundantCol)
                        .during("preparing decode plan")
                        .with_message(format!("redundant occurrence of column \"{alias}\"")));
                }
                let column = columns.iter().position(|name| *name == alias);
                let mut leaf_steps = steps.clone();
                leaf_steps.push(index);
                node.leaves.push(LeafNode {
                    alias,
                    steps: leaf_steps,
                    column,
                    ty,
                });
            }
            FieldKind::Record {
                nilable,
                fields: child_fields,
            } => {
                if excluded(meta.tag) {
                    continue;
                }
                let mut child_steps = steps.clone();
                child_steps.push(index);
                let mut child = RecordNode::new(child_steps, node.nilable_path || nilable);

                tags.push(meta.tag);
                let mut child_relative = Vec::new();
                walk(
                    child_fields(),
                    columns,
                    tags,
                    &mut child_relative,
                    &mut child,
                    aliases,
                )?;
                tags.pop();

                node.children.push(child);
            }
            FieldKind::Flattened {
                fields: child_fields,
            } => {
                // Embedded records are transparent: a field-path hop, but
                // no alias segment.
                steps.push(index);
                walk(child_fields(), columns, tags, steps, node, aliases)?;
                steps.pop();
            }
        }
    }

    Ok(())
}

fn excluded(tag: &str) -> bool {
    tag.is_empty() || tag == "-"
}

fn join_alias(tags: &[&str], tag: &str) -> String {
    let mut alias = String::new();
    for segment in tags {
        alias.push_str(segment);
        alias.push('.');
    }
    alias.push_str(tag);
    alias
}
