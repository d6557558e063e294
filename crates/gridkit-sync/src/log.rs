//! The revision-numbered synchronization log.
//!
//! One [`SyncLog`] per grid is the server-side authority: a strictly
//! ordered, gap-free history of accepted operations. A client submits an
//! operation together with the revision it was based on; the log transforms
//! the submission over everything accepted since that revision, assigns the
//! next revision, and appends.

use core::fmt;

use gridkit::{transform, Identity, Operation, ValidationError};

/// One accepted operation at its assigned revision. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LogEntry<Id> {
    /// Revision assigned by the log: `1` for the first accepted operation.
    pub revision: u64,
    /// The operation as accepted (already transformed against history).
    pub operation: Operation<Id>,
}

/// Why a submission was rejected. The log is never partially modified:
/// either the full receive pipeline succeeds or nothing changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiveError {
    /// The submitted base revision was never issued by this log. The client
    /// must resync (via `history` or a snapshot) and resubmit.
    StaleRevision {
        /// Revision the client claimed to be based on.
        base_revision: u64,
        /// The log's current revision.
        current_revision: u64,
    },
    /// The operation failed validation and never touched the log.
    Invalid(ValidationError),
}

impl fmt::Display for ReceiveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StaleRevision {
                base_revision,
                current_revision,
            } => write!(
                f,
                "base revision {base_revision} not in history (current revision {current_revision})"
            ),
            Self::Invalid(err) => write!(f, "invalid operation: {err}"),
        }
    }
}

impl std::error::Error for ReceiveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::StaleRevision { .. } => None,
            Self::Invalid(err) => Some(err),
        }
    }
}

impl From<ValidationError> for ReceiveError {
    fn from(err: ValidationError) -> Self {
        Self::Invalid(err)
    }
}

/// Append-only, revision-numbered operation history for one grid.
///
/// Revisions are assigned only here, start at `1`, and have no gaps.
/// `receive` must be serialized per grid (see `SessionRegistry`); the log
/// itself is a plain single-owner value.
///
/// # Example
///
/// ```
/// use gridkit::Operation;
/// use gridkit_sync::SyncLog;
///
/// let mut log = SyncLog::new();
/// let entry = log.receive(0, Operation::update_cell("r1", "c1", "v")).unwrap();
/// assert_eq!(entry.revision, 1);
/// assert_eq!(log.current_revision(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct SyncLog<Id> {
    entries: Vec<LogEntry<Id>>,
}

impl<Id> Default for SyncLog<Id> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<Id: Identity> SyncLog<Id> {
    /// An empty log at revision `0`.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The revision of the most recently accepted operation (`0` when empty).
    #[must_use]
    pub fn current_revision(&self) -> u64 {
        self.entries.len() as u64
    }

    /// Reconcile and append a submitted operation.
    ///
    /// The operation is validated, then folded through [`transform`] against
    /// every entry accepted after `base_revision`, in ascending revision
    /// order. Each step keeps the transformed *incoming* side; history is
    /// immutable and is never rewritten. The final form is appended at
    /// `current_revision() + 1` and returned for broadcast.
    ///
    /// # Errors
    ///
    /// [`ReceiveError::StaleRevision`] if `base_revision` exceeds the
    /// current revision (the client referenced a revision this log never
    /// issued), or [`ReceiveError::Invalid`] for a malformed operation. On
    /// error the log is unchanged.
    pub fn receive(
        &mut self,
        base_revision: u64,
        operation: Operation<Id>,
    ) -> Result<LogEntry<Id>, ReceiveError> {
        let current = self.current_revision();
        if base_revision > current {
            return Err(ReceiveError::StaleRevision {
                base_revision,
                current_revision: current,
            });
        }
        operation.validate()?;

        let mut incoming = operation;
        for entry in &self.entries[base_revision as usize..] {
            let (transformed, _) = transform(incoming, entry.operation.clone());
            incoming = transformed;
        }

        let entry = LogEntry {
            revision: current + 1,
            operation: incoming,
        };
        self.entries.push(entry.clone());
        Ok(entry)
    }

    /// Entries with revision strictly greater than `from_revision`, in
    /// ascending order.
    ///
    /// Lazy and restartable: call again to re-read the same suffix. Used to
    /// bring a reconnecting client up to date without replaying transform
    /// logic externally.
    pub fn history(&self, from_revision: u64) -> impl Iterator<Item = &LogEntry<Id>> {
        let skip = usize::try_from(from_revision).unwrap_or(usize::MAX);
        self.entries.iter().skip(skip.min(self.entries.len()))
    }

    /// All entries, ascending.
    #[must_use]
    pub fn entries(&self) -> &[LogEntry<Id>] {
        &self.entries
    }
}
