//! Sequential composition of operations.
//!
//! For any grid state `S`: `apply(apply(S, a), b) == apply(S, compose(a, b))`.
//! `a` is the earlier operation, `b` the later one.

use alloc::vec::Vec;

use crate::identity::{contains_id, Identity};
use crate::operation::{FilledOperation, Operation, RowCell, UpdateCell};

/// Combine two sequentially-applied operations into one equivalent operation.
///
/// Deterministic resolution rules:
/// - delete sets are the deduplicated union of both operands;
/// - an insert whose identity lands in the combined delete set vanishes
///   (inserted and deleted within the same batch);
/// - cell updates are unioned by `(row_id, col_id)`, the later operation's
///   value winning on conflict;
/// - an update targeting a row inserted by the same batch is folded into
///   that insert's initial data instead of staying standalone.
///
/// All set operations are explicit linear-scan passes over
/// [`Identity::id_eq`] so structural identities behave exactly like primitive
/// ones.
///
/// # Example
///
/// ```
/// use gridkit::{compose, Operation};
///
/// let first = Operation::update_cell("r1", "c1", "draft");
/// let second = Operation::update_cell("r1", "c1", "final");
/// let combined = compose(first, second);
///
/// let cells = combined.update_cells();
/// assert_eq!(cells.len(), 1);
/// assert_eq!(cells[0].value, "final");
/// ```
#[must_use]
pub fn compose<Id: Identity>(a: Operation<Id>, b: Operation<Id>) -> Operation<Id> {
    let a = a.fill();
    let b = b.fill();
    let mut out = FilledOperation::default();

    out.delete_rows = union_ids(a.delete_rows, b.delete_rows);
    out.delete_cols = union_ids(a.delete_cols, b.delete_cols);

    let mut insert_rows: Vec<_> = a.insert_rows;
    insert_rows.extend(b.insert_rows);
    insert_rows.retain(|row| !contains_id(&out.delete_rows, &row.id));
    // A column deleted by the batch also disappears from the initial data of
    // rows the batch inserts, matching what applying the operands in
    // sequence would leave behind.
    for row in &mut insert_rows {
        row.data
            .retain(|cell| !contains_id(&out.delete_cols, &cell.col_id));
    }

    let mut insert_cols: Vec<_> = a.insert_cols;
    insert_cols.extend(b.insert_cols);
    insert_cols.retain(|col| !contains_id(&out.delete_cols, &col.id));
    out.insert_cols = insert_cols;

    let mut updates = merge_updates(a.update_cells, b.update_cells);
    updates.retain(|cell| {
        !contains_id(&out.delete_rows, &cell.row_id) && !contains_id(&out.delete_cols, &cell.col_id)
    });

    // Updates addressing a row inserted in this same batch collapse into the
    // insert's initial data; everything else stays a standalone update.
    for cell in updates {
        match insert_rows
            .iter_mut()
            .find(|row| row.id.id_eq(&cell.row_id))
        {
            Some(row) => match row.data.iter_mut().find(|c| c.col_id.id_eq(&cell.col_id)) {
                Some(seed) => seed.value = cell.value,
                None => row.data.push(RowCell {
                    col_id: cell.col_id,
                    value: cell.value,
                }),
            },
            None => out.update_cells.push(cell),
        }
    }
    out.insert_rows = insert_rows;

    out.strip()
}

/// Deduplicated union of two identity lists, first occurrence wins.
fn union_ids<Id: Identity>(a: Vec<Id>, b: Vec<Id>) -> Vec<Id> {
    let mut out: Vec<Id> = Vec::with_capacity(a.len() + b.len());
    for id in a.into_iter().chain(b) {
        if !contains_id(&out, &id) {
            out.push(id);
        }
    }
    out
}

/// Union of cell updates keyed by `(row_id, col_id)`; on a key collision the
/// later operand's value replaces the earlier one in place, preserving the
/// earlier operand's ordering.
fn merge_updates<Id: Identity>(
    a: Vec<UpdateCell<Id>>,
    b: Vec<UpdateCell<Id>>,
) -> Vec<UpdateCell<Id>> {
    let mut out = a;
    for cell in b {
        match out
            .iter_mut()
            .find(|c| c.row_id.id_eq(&cell.row_id) && c.col_id.id_eq(&cell.col_id))
        {
            Some(existing) => existing.value = cell.value,
            None => out.push(cell),
        }
    }
    out
}
