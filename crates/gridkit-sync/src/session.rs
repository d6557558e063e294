//! One grid's server-side session: snapshot, log, and broadcast.

use std::sync::mpsc::{self, Receiver, Sender};

use gridkit::{Column, Grid, Identity, Operation, Row};

use crate::log::{LogEntry, ReceiveError, SyncLog};

/// A display page of the grid, as handed to pagination/rendering layers.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Page<Id> {
    /// All columns, in display order.
    pub columns: Vec<Column<Id>>,
    /// The rows of the requested page.
    pub rows: Vec<Row<Id>>,
    /// Total row count of the grid.
    pub total: usize,
    /// Revision the page was read at.
    pub revision: u64,
}

/// A full-state snapshot, the resync fallback when a client's gap predates
/// whatever history the transport cares to replay.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct SnapshotState<Id> {
    /// The grid contents.
    pub grid: Grid<Id>,
    /// Revision the snapshot was taken at.
    pub revision: u64,
}

/// The authoritative state of one grid: snapshot + [`SyncLog`] + subscribers.
///
/// [`GridSession::receive`] is the single entry point for edits. It runs the
/// log's reconcile-and-append pipeline, applies the accepted operation to
/// the snapshot, and fans the resulting [`LogEntry`] out to every
/// subscriber — so subscribers observe entries in strictly increasing
/// revision order with no gaps.
///
/// # Example
///
/// ```
/// use gridkit::{Grid, Operation};
/// use gridkit_sync::GridSession;
///
/// let mut session = GridSession::new(Grid::<&str>::new());
/// let updates = session.subscribe();
///
/// let entry = session.receive(0, Operation::delete_row("r1")).unwrap();
/// assert_eq!(updates.recv().unwrap(), entry);
/// ```
#[derive(Debug)]
pub struct GridSession<Id> {
    grid: Grid<Id>,
    log: SyncLog<Id>,
    subscribers: Vec<Sender<LogEntry<Id>>>,
}

impl<Id: Identity> GridSession<Id> {
    /// A session over an initial grid, at revision `0`.
    #[must_use]
    pub fn new(grid: Grid<Id>) -> Self {
        Self {
            grid,
            log: SyncLog::new(),
            subscribers: Vec::new(),
        }
    }

    /// The current snapshot.
    #[must_use]
    pub fn grid(&self) -> &Grid<Id> {
        &self.grid
    }

    /// The revision of the last accepted operation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.log.current_revision()
    }

    /// Accept a submitted operation: reconcile against history, append,
    /// apply to the snapshot, and broadcast.
    ///
    /// # Errors
    ///
    /// Propagates [`ReceiveError`] from the log; on error neither the log
    /// nor the snapshot changes and nothing is broadcast.
    pub fn receive(
        &mut self,
        base_revision: u64,
        operation: Operation<Id>,
    ) -> Result<LogEntry<Id>, ReceiveError> {
        let entry = self.log.receive(base_revision, operation)?;
        self.grid.apply(&entry.operation);
        // Disconnected subscribers are pruned on the way through.
        self.subscribers.retain(|tx| tx.send(entry.clone()).is_ok());
        Ok(entry)
    }

    /// Register a broadcast subscriber.
    ///
    /// The receiver sees every entry accepted after this call, in revision
    /// order. Dropping the receiver unregisters it on the next broadcast.
    pub fn subscribe(&mut self) -> Receiver<LogEntry<Id>> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    /// Entries with revision greater than `from_revision`, for gap resync.
    pub fn history(&self, from_revision: u64) -> impl Iterator<Item = &LogEntry<Id>> {
        self.log.history(from_revision)
    }

    /// One display page plus the revision it was read at.
    #[must_use]
    pub fn page(&self, page: usize, size: usize) -> Page<Id> {
        Page {
            columns: self.grid.columns.clone(),
            rows: self.grid.rows_by_page(page, size).to_vec(),
            total: self.grid.row_count(),
            revision: self.revision(),
        }
    }

    /// A full-state snapshot for the resync fallback.
    #[must_use]
    pub fn snapshot(&self) -> SnapshotState<Id> {
        SnapshotState {
            grid: self.grid.clone(),
            revision: self.revision(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridkit::RowCell;

    fn seeded_session() -> GridSession<&'static str> {
        let grid = Grid::with(
            vec![Column {
                id: "c1",
                name: "title".into(),
                col_type: "text".into(),
            }],
            vec![Row {
                id: "r1",
                cells: vec![RowCell {
                    col_id: "c1",
                    value: "initial".into(),
                }],
            }],
        );
        GridSession::new(grid)
    }

    #[test]
    fn accepted_operation_is_applied_to_the_snapshot() {
        let mut session = seeded_session();
        session
            .receive(0, Operation::update_cell("r1", "c1", "edited"))
            .unwrap();
        assert_eq!(session.grid().cell(&"r1", &"c1"), Some("edited"));
        assert_eq!(session.revision(), 1);
    }

    #[test]
    fn rejected_operation_changes_nothing_and_broadcasts_nothing() {
        let mut session = seeded_session();
        let updates = session.subscribe();

        let err = session
            .receive(9, Operation::update_cell("r1", "c1", "x"))
            .unwrap_err();
        assert!(matches!(err, ReceiveError::StaleRevision { .. }));
        assert_eq!(session.grid().cell(&"r1", &"c1"), Some("initial"));
        assert!(updates.try_recv().is_err());
    }

    #[test]
    fn subscribers_see_entries_in_revision_order() {
        let mut session = seeded_session();
        let updates = session.subscribe();

        session
            .receive(0, Operation::update_cell("r1", "c1", "a"))
            .unwrap();
        session
            .receive(1, Operation::update_cell("r1", "c1", "b"))
            .unwrap();

        assert_eq!(updates.recv().unwrap().revision, 1);
        assert_eq!(updates.recv().unwrap().revision, 2);
    }

    #[test]
    fn dropped_subscriber_is_pruned() {
        let mut session = seeded_session();
        let first = session.subscribe();
        drop(first);
        let second = session.subscribe();

        session.receive(0, Operation::delete_row("r1")).unwrap();
        assert_eq!(second.recv().unwrap().revision, 1);
        assert_eq!(session.subscribers.len(), 1);
    }

    #[test]
    fn page_reports_total_and_revision() {
        let mut session = seeded_session();
        session
            .receive(0, Operation::update_cell("r1", "c1", "x"))
            .unwrap();

        let page = session.page(1, 10);
        assert_eq!(page.total, 1);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.revision, 1);
    }

    #[test]
    fn snapshot_carries_the_current_revision() {
        let mut session = seeded_session();
        session.receive(0, Operation::delete_row("r1")).unwrap();

        let snap = session.snapshot();
        assert_eq!(snap.revision, 1);
        assert!(!snap.grid.has_row(&"r1"));
    }
}
