//! Per-grid-id ownership of sessions.
//!
//! Each grid id owns exactly one [`GridSession`] behind its own mutex, so
//! `receive` is serialized per grid (one submission in flight at a time)
//! while distinct grids proceed concurrently. There is no process-wide lock
//! around the sessions themselves — the registry map is only locked long
//! enough to look a session up or create it.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use gridkit::{Grid, Identity, Operation};

use crate::log::{LogEntry, ReceiveError};
use crate::session::GridSession;

/// Looks up the exclusively-owned session for a grid id, creating it on
/// first use.
///
/// # Example
///
/// ```
/// use gridkit::Operation;
/// use gridkit_sync::SessionRegistry;
///
/// let registry = SessionRegistry::<&str>::new();
/// let entry = registry
///     .submit("sheet-1", 0, Operation::delete_row("r1"))
///     .unwrap();
/// assert_eq!(entry.revision, 1);
/// ```
#[derive(Debug)]
pub struct SessionRegistry<Id> {
    sessions: Mutex<HashMap<String, Arc<Mutex<GridSession<Id>>>>>,
}

impl<Id> Default for SessionRegistry<Id> {
    fn default() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

fn relock<'a, T>(
    result: Result<MutexGuard<'a, T>, PoisonError<MutexGuard<'a, T>>>,
) -> MutexGuard<'a, T> {
    // A panic mid-critical-section leaves the log and snapshot consistent
    // with each other only up to the last completed receive, which is the
    // same guarantee a clean unlock gives.
    result.unwrap_or_else(PoisonError::into_inner)
}

impl<Id: Identity> SessionRegistry<Id> {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// The session for `grid_id`, created over an empty grid if absent.
    #[must_use]
    pub fn session(&self, grid_id: &str) -> Arc<Mutex<GridSession<Id>>> {
        self.session_or(grid_id, Grid::new)
    }

    /// The session for `grid_id`, created over `init()` if absent.
    ///
    /// `init` runs only when the session does not exist yet; an existing
    /// session is returned as-is.
    pub fn session_or(
        &self,
        grid_id: &str,
        init: impl FnOnce() -> Grid<Id>,
    ) -> Arc<Mutex<GridSession<Id>>> {
        let mut sessions = relock(self.sessions.lock());
        Arc::clone(
            sessions
                .entry(grid_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(GridSession::new(init())))),
        )
    }

    /// Submit an operation to one grid, holding only that grid's lock.
    ///
    /// # Errors
    ///
    /// Propagates [`ReceiveError`] from the session's receive pipeline.
    pub fn submit(
        &self,
        grid_id: &str,
        base_revision: u64,
        operation: Operation<Id>,
    ) -> Result<LogEntry<Id>, ReceiveError> {
        let session = self.session(grid_id);
        let mut session = relock(session.lock());
        session.receive(base_revision, operation)
    }

    /// Ids of all grids served so far.
    #[must_use]
    pub fn grid_ids(&self) -> Vec<String> {
        relock(self.sessions.lock()).keys().cloned().collect()
    }
}
