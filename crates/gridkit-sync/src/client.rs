//! The optimistic client reconciler.
//!
//! A client applies its own edits immediately, queues them as pending, and
//! submits them with the last server revision it has seen. Remote entries
//! arriving in the meantime are transformed through the pending queue before
//! touching the local snapshot, so the local view stays equivalent to what
//! the server will eventually serialize.

use std::collections::VecDeque;
use std::mem;

use gridkit::{transform, Grid, Identity, Operation, ValidationError};

use crate::log::LogEntry;
use crate::session::SnapshotState;

/// Client-side state: local snapshot, last seen revision, and the ordered
/// queue of locally-applied-but-unacknowledged operations.
///
/// A sent operation cannot be retracted; consistency comes from eventually
/// transforming it, never from rollback.
///
/// # Example
///
/// ```
/// use gridkit::{Grid, Operation};
/// use gridkit_sync::ClientReconciler;
///
/// let mut client = ClientReconciler::new(Grid::<&str>::new(), 0);
/// let (base, op) = client.edit(Operation::delete_row("r1")).unwrap();
/// assert_eq!(base, 0);
/// assert_eq!(op, Operation::delete_row("r1"));
/// assert!(client.has_pending());
/// ```
#[derive(Debug, Clone)]
pub struct ClientReconciler<Id> {
    grid: Grid<Id>,
    revision: u64,
    pending: VecDeque<Operation<Id>>,
}

impl<Id: Identity> ClientReconciler<Id> {
    /// A reconciler over a known server state.
    #[must_use]
    pub fn new(grid: Grid<Id>, revision: u64) -> Self {
        Self {
            grid,
            revision,
            pending: VecDeque::new(),
        }
    }

    /// A reconciler seeded from a full-state snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: SnapshotState<Id>) -> Self {
        Self::new(snapshot.grid, snapshot.revision)
    }

    /// The local (optimistic) view of the grid.
    #[must_use]
    pub fn grid(&self) -> &Grid<Id> {
        &self.grid
    }

    /// The last server revision this client has seen.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Whether any local operation is still unacknowledged.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Record a local edit: validate it, apply it to the local view, queue
    /// it as pending, and return `(base_revision, operation)` to submit.
    ///
    /// # Errors
    ///
    /// [`ValidationError`] if the operation is malformed; nothing is applied
    /// or queued.
    pub fn edit(&mut self, operation: Operation<Id>) -> Result<(u64, Operation<Id>), ValidationError> {
        operation.validate()?;
        self.grid.apply(&operation);
        self.pending.push_back(operation.clone());
        Ok((self.revision, operation))
    }

    /// Integrate a remote log entry (another client's accepted operation).
    ///
    /// The remote operation is threaded through the pending queue in
    /// submission order: each pending operation is replaced by its
    /// transformed self, and the remote's transformed residue is fed forward
    /// to the next pending operation. The final residue is applied to the
    /// local snapshot.
    pub fn apply_remote(&mut self, entry: &LogEntry<Id>) {
        let mut remote = entry.operation.clone();
        for pending in &mut self.pending {
            let (local_p, remote_p) = transform(mem::take(pending), remote);
            *pending = local_p;
            remote = remote_p;
        }
        self.grid.apply(&remote);
        self.revision = entry.revision;
    }

    /// Handle the server's acknowledgment of this client's oldest pending
    /// operation.
    ///
    /// Matching is by submission order, not content: the server accepted
    /// whatever the head of `pending` became after its own transformation,
    /// so the head is popped and the assigned revision recorded.
    pub fn acknowledge(&mut self, entry: &LogEntry<Id>) {
        self.pending.pop_front();
        self.revision = entry.revision;
    }

    /// Replay a `history` gap after reconnecting.
    ///
    /// Equivalent to receiving each entry as a remote broadcast, in order.
    pub fn resync<'a>(&mut self, entries: impl IntoIterator<Item = &'a LogEntry<Id>>)
    where
        Id: 'a,
    {
        for entry in entries {
            self.apply_remote(entry);
        }
    }

    /// Discard all local state and restart from a snapshot.
    ///
    /// The fallback when the gap predates retained history. Pending
    /// operations are dropped — they were generated against a base the
    /// client can no longer reason about.
    pub fn reset(&mut self, snapshot: SnapshotState<Id>) {
        self.grid = snapshot.grid;
        self.revision = snapshot.revision;
        self.pending.clear();
    }
}
