//! Transformation of concurrently-generated operations.
//!
//! For two operations `local` and `remote` generated against the same base
//! state `S`, `transform(local, remote) = (local', remote')` satisfies
//! `apply(apply(S, local), remote') == apply(apply(S, remote), local')`.

use crate::identity::{contains_id, Identity};
use crate::operation::Operation;

/// Rewrite two concurrent operations so applying them in either order
/// converges.
///
/// Conflict rules, in order:
/// - **Delete dominates.** A cell update on either side is dropped when the
///   other side deletes its row or column; content a concurrent actor
///   removed is never resurrected.
/// - **Local priority.** When both sides update the very same cell, the
///   remote update is dropped: the caller's own edit takes the cell's final
///   value. Deterministic and cheap; at cell granularity a lost concurrent
///   edit is recoverable by simply editing again.
/// - Delete sets and inserts pass through, except that the initial data of
///   an inserted row loses cells under columns the other side deletes (the
///   same dominance rule, applied before the row ever materializes). Insert
///   *positions* (`index`, row append order) are not renumbered against
///   concurrent structural changes; the serialized log order decides the
///   final layout.
///
/// # Example
///
/// ```
/// use gridkit::{transform, Operation};
///
/// let local = Operation::<&str>::delete_row("r1");
/// let remote = Operation::update_cell("r1", "c1", "doomed");
///
/// let (local_p, remote_p) = transform(local.clone(), remote);
/// assert_eq!(local_p, local);
/// assert!(remote_p.is_identity());
/// ```
#[must_use]
pub fn transform<Id: Identity>(
    local: Operation<Id>,
    remote: Operation<Id>,
) -> (Operation<Id>, Operation<Id>) {
    let mut local = local.fill();
    let mut remote = remote.fill();

    remote.update_cells.retain(|cell| {
        !contains_id(&local.delete_rows, &cell.row_id)
            && !contains_id(&local.delete_cols, &cell.col_id)
            && !local
                .update_cells
                .iter()
                .any(|c| c.row_id.id_eq(&cell.row_id) && c.col_id.id_eq(&cell.col_id))
    });

    local.update_cells.retain(|cell| {
        !contains_id(&remote.delete_rows, &cell.row_id)
            && !contains_id(&remote.delete_cols, &cell.col_id)
    });

    // Delete-dominance extends to the initial data of inserted rows: a cell
    // under a concurrently deleted column never materializes on either
    // replica.
    for row in &mut remote.insert_rows {
        row.data
            .retain(|cell| !contains_id(&local.delete_cols, &cell.col_id));
    }
    for row in &mut local.insert_rows {
        row.data
            .retain(|cell| !contains_id(&remote.delete_cols, &cell.col_id));
    }

    (local.strip(), remote.strip())
}
