//! Row decoding: populate a destination record from one row's cells by
//! walking the plan tree.

use crate::error::{Error, ErrorCode};
use crate::plan::{LeafNode, Plan, RecordNode};
use crate::traits::{ColumnSlot, FieldMut, Record, RecordDyn, RecordSlot};
use crate::value::{Value, ValueError};

/// Decode one row into the destination. Cells are consumed out of the row
/// buffer; refill it before the next call.
pub(crate) fn decode_row<R: Record>(
    dest: &mut R,
    plan: &Plan,
    row: &mut [Value],
) -> Result<(), Error> {
    decode_node(dest, plan.root(), row)
}

fn decode_node(
    rec: &mut dyn RecordDyn,
    node: &RecordNode,
    row: &mut [Value],
) -> Result<(), Error> {
    for leaf in &node.leaves {
        let Some(index) = leaf.column else {
            // Declared but not selected: prior contents are preserved.
            continue;
        };
        let value = row[index].take();
        let slot = leaf_slot(rec, &leaf.steps);
        slot.store(value).map_err(|err| leaf_error(leaf, err))?;
    }

    for child in &node.children {
        if child.mapped_columns.is_empty() {
            // No column of this subtree was selected: leave untouched.
            continue;
        }
        let all_null = child.mapped_columns.iter().all(|&index| row[index].is_null());
        let slot = record_slot(rec, &child.steps);
        if all_null && child.nilable_path {
            slot.clear();
            continue;
        }
        decode_node(slot.materialize(), child, row)?;
    }

    Ok(())
}

// Steps are flatten hops followed by the leaf's own field index; the plan
// guarantees each hop resolves to the matching field kind.
fn leaf_slot<'a>(mut rec: &'a mut dyn RecordDyn, steps: &[usize]) -> &'a mut dyn ColumnSlot {
    let last = steps.len() - 1;
    for &hop in &steps[..last] {
        rec = match rec.field_mut(hop) {
            FieldMut::Flattened(inner) => inner,
            FieldMut::Leaf(_) | FieldMut::Record(_) => {
                unreachable!("interior field-path step must be a flattened record")
            }
        };
    }
    match rec.field_mut(steps[last]) {
        FieldMut::Leaf(slot) => slot,
        FieldMut::Record(_) | FieldMut::Flattened(_) => {
            unreachable!("leaf field-path step must resolve to a leaf")
        }
    }
}

fn record_slot<'a>(mut rec: &'a mut dyn RecordDyn, steps: &[usize]) -> &'a mut dyn RecordSlot {
    let last = steps.len() - 1;
    for &hop in &steps[..last] {
        rec = match rec.field_mut(hop) {
            FieldMut::Flattened(inner) => inner,
            FieldMut::Leaf(_) | FieldMut::Record(_) => {
                unreachable!("interior field-path step must be a flattened record")
            }
        };
    }
    match rec.field_mut(steps[last]) {
        FieldMut::Record(slot) => slot,
        FieldMut::Leaf(_) | FieldMut::Flattened(_) => {
            unreachable!("record field-path step must resolve to a nested record")
        }
    }
}

fn leaf_error(leaf: &LeafNode, err: ValueError) -> Error {
    match err {
        ValueError::Null { .. } => Error::new(ErrorCode::Null)
            .during("decoding into struct")
            .with_message(format!(
                "column \"{}\" was null, but field type `{}` is not nilable",
                leaf.alias, leaf.ty
            )),
        err => Error::new(ErrorCode::Scan)
            .during("scanning into field")
            .with_message(format!("column \"{}\": {err}", leaf.alias)),
    }
}
