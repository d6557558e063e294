//! Validation errors for malformed operations.

use core::fmt;

/// Names one of the five change-sets of an operation, for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSet {
    /// `update_cells`
    UpdateCells,
    /// `delete_rows`
    DeleteRows,
    /// `insert_rows`
    InsertRows,
    /// `delete_cols`
    DeleteCols,
    /// `insert_cols`
    InsertCols,
}

impl fmt::Display for ChangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::UpdateCells => "update_cells",
            Self::DeleteRows => "delete_rows",
            Self::InsertRows => "insert_rows",
            Self::DeleteCols => "delete_cols",
            Self::InsertCols => "insert_cols",
        };
        f.write_str(name)
    }
}

/// A malformed operation, rejected before it reaches any log.
///
/// Validation checks the *internal* consistency of a single operation; it
/// does not (and cannot) verify global identity uniqueness across inserts,
/// which remains a caller precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The same identity appears twice within one change-set: a row or column
    /// deleted twice, a cell updated twice, or an insert repeated.
    DuplicateIdentity(ChangeSet),
    /// An identity is both deleted and inserted/updated by the same
    /// operation. Delete dominates; a normalized operation never carries
    /// both sides.
    DeleteConflict(ChangeSet),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateIdentity(set) => {
                write!(f, "duplicate identity within {set}")
            }
            Self::DeleteConflict(set) => {
                write!(f, "identity in {set} is also deleted by the same operation")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ValidationError {}
