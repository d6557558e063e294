//! The operation model: one atomic batch of grid edits.
//!
//! An [`Operation`] carries up to five change-sets. An absent change-set is
//! equivalent to an empty one, and an operation with every change-set empty
//! is the identity operation. [`Operation::fill`] produces a fully-populated
//! [`FilledOperation`] so the algebra never branches on absence;
//! [`FilledOperation::strip`] returns to the canonical wire/storage form with
//! empty change-sets dropped.

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{ChangeSet, ValidationError};
use crate::identity::{contains_id, Identity};

/// Set one cell's content: `(row_id, col_id) := value`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct UpdateCell<Id> {
    /// Column the cell belongs to.
    pub col_id: Id,
    /// Row the cell belongs to.
    pub row_id: Id,
    /// The cell's new content.
    pub value: String,
}

/// One initial cell value inside an [`InsertRow`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RowCell<Id> {
    /// Column this value falls under.
    pub col_id: Id,
    /// Initial content.
    pub value: String,
}

/// A full new row with its initial cell values.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct InsertRow<Id> {
    /// Freshly created identity of the row. Must never reuse a retired id.
    pub id: Id,
    /// Initial cell values, keyed by column identity.
    pub data: Vec<RowCell<Id>>,
}

/// A new column at a display position.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct InsertCol<Id> {
    /// Freshly created identity of the column.
    pub id: Id,
    /// Insertion position; clamped to the column count on apply.
    pub index: usize,
    /// Display name.
    pub col_name: String,
    /// Column value type tag (free-form, e.g. `"text"`).
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub col_type: String,
}

/// One atomic edit intention: a batch of optional change-sets.
///
/// Absent change-set ≡ empty change-set. The all-empty operation is the
/// identity: applying it changes nothing, composing with it is a no-op.
///
/// # Example
///
/// ```
/// use gridkit::Operation;
///
/// let op = Operation::update_cell("r1", "c1", "hello");
/// assert!(!op.is_identity());
/// assert!(Operation::<&str>::default().is_identity());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Operation<Id> {
    /// Cell content changes.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub update_cells: Option<Vec<UpdateCell<Id>>>,
    /// Rows to delete, by identity.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub delete_rows: Option<Vec<Id>>,
    /// Rows to insert.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub insert_rows: Option<Vec<InsertRow<Id>>>,
    /// Columns to delete, by identity.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub delete_cols: Option<Vec<Id>>,
    /// Columns to insert.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub insert_cols: Option<Vec<InsertCol<Id>>>,
}

fn as_slice<T>(set: &Option<Vec<T>>) -> &[T] {
    set.as_deref().unwrap_or(&[])
}

// Not derived: deriving would demand `Id: Default` even though no identity
// value is ever constructed.
impl<Id> Default for Operation<Id> {
    fn default() -> Self {
        Self {
            update_cells: None,
            delete_rows: None,
            insert_rows: None,
            delete_cols: None,
            insert_cols: None,
        }
    }
}

impl<Id: Identity> Operation<Id> {
    /// A single-cell update.
    pub fn update_cell(row_id: Id, col_id: Id, value: impl Into<String>) -> Self {
        Self {
            update_cells: Some(alloc::vec![UpdateCell {
                col_id,
                row_id,
                value: value.into(),
            }]),
            ..Self::default()
        }
    }

    /// A single-row deletion.
    pub fn delete_row(id: Id) -> Self {
        Self {
            delete_rows: Some(alloc::vec![id]),
            ..Self::default()
        }
    }

    /// A single-column deletion.
    pub fn delete_col(id: Id) -> Self {
        Self {
            delete_cols: Some(alloc::vec![id]),
            ..Self::default()
        }
    }

    /// A single-row insertion.
    pub fn insert_row(row: InsertRow<Id>) -> Self {
        Self {
            insert_rows: Some(alloc::vec![row]),
            ..Self::default()
        }
    }

    /// A single-column insertion.
    pub fn insert_col(col: InsertCol<Id>) -> Self {
        Self {
            insert_cols: Some(alloc::vec![col]),
            ..Self::default()
        }
    }

    /// Whether every change-set is absent or empty (the identity operation).
    #[must_use]
    pub fn is_identity(&self) -> bool {
        as_slice(&self.update_cells).is_empty()
            && as_slice(&self.delete_rows).is_empty()
            && as_slice(&self.insert_rows).is_empty()
            && as_slice(&self.delete_cols).is_empty()
            && as_slice(&self.insert_cols).is_empty()
    }

    /// Populate every absent change-set with an empty one.
    ///
    /// Pure and lossless: `op.fill().strip()` drops only empty change-sets,
    /// so for an operation with no empty-but-present arrays the round trip
    /// returns the operation unchanged.
    #[must_use]
    pub fn fill(self) -> FilledOperation<Id> {
        FilledOperation {
            update_cells: self.update_cells.unwrap_or_default(),
            delete_rows: self.delete_rows.unwrap_or_default(),
            insert_rows: self.insert_rows.unwrap_or_default(),
            delete_cols: self.delete_cols.unwrap_or_default(),
            insert_cols: self.insert_cols.unwrap_or_default(),
        }
    }

    /// Drop any present-but-empty change-set, producing the canonical form.
    #[must_use]
    pub fn strip(self) -> Self {
        self.fill().strip()
    }

    /// Cell updates, absent ≡ empty.
    #[must_use]
    pub fn update_cells(&self) -> &[UpdateCell<Id>] {
        as_slice(&self.update_cells)
    }

    /// Row deletions, absent ≡ empty.
    #[must_use]
    pub fn delete_rows(&self) -> &[Id] {
        as_slice(&self.delete_rows)
    }

    /// Row insertions, absent ≡ empty.
    #[must_use]
    pub fn insert_rows(&self) -> &[InsertRow<Id>] {
        as_slice(&self.insert_rows)
    }

    /// Column deletions, absent ≡ empty.
    #[must_use]
    pub fn delete_cols(&self) -> &[Id] {
        as_slice(&self.delete_cols)
    }

    /// Column insertions, absent ≡ empty.
    #[must_use]
    pub fn insert_cols(&self) -> &[InsertCol<Id>] {
        as_slice(&self.insert_cols)
    }

    /// Check the internal consistency of this operation.
    ///
    /// Rejects duplicate identities within one change-set and identities that
    /// are both deleted and inserted/updated by the same operation. Global
    /// identity uniqueness across inserts is a caller precondition and is not
    /// re-verified here.
    ///
    /// # Errors
    ///
    /// [`ValidationError::DuplicateIdentity`] or
    /// [`ValidationError::DeleteConflict`], naming the offending change-set.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let updates = self.update_cells();
        let delete_rows = self.delete_rows();
        let insert_rows = self.insert_rows();
        let delete_cols = self.delete_cols();
        let insert_cols = self.insert_cols();

        if has_duplicate(updates, |a, b| {
            a.row_id.id_eq(&b.row_id) && a.col_id.id_eq(&b.col_id)
        }) {
            return Err(ValidationError::DuplicateIdentity(ChangeSet::UpdateCells));
        }
        if has_duplicate(delete_rows, Identity::id_eq) {
            return Err(ValidationError::DuplicateIdentity(ChangeSet::DeleteRows));
        }
        if has_duplicate(insert_rows, |a, b| a.id.id_eq(&b.id)) {
            return Err(ValidationError::DuplicateIdentity(ChangeSet::InsertRows));
        }
        if has_duplicate(delete_cols, Identity::id_eq) {
            return Err(ValidationError::DuplicateIdentity(ChangeSet::DeleteCols));
        }
        if has_duplicate(insert_cols, |a, b| a.id.id_eq(&b.id)) {
            return Err(ValidationError::DuplicateIdentity(ChangeSet::InsertCols));
        }

        if insert_rows
            .iter()
            .any(|row| contains_id(delete_rows, &row.id))
        {
            return Err(ValidationError::DeleteConflict(ChangeSet::InsertRows));
        }
        if insert_cols
            .iter()
            .any(|col| contains_id(delete_cols, &col.id))
        {
            return Err(ValidationError::DeleteConflict(ChangeSet::InsertCols));
        }
        if updates
            .iter()
            .any(|cell| contains_id(delete_rows, &cell.row_id) || contains_id(delete_cols, &cell.col_id))
        {
            return Err(ValidationError::DeleteConflict(ChangeSet::UpdateCells));
        }

        Ok(())
    }
}

fn has_duplicate<T>(items: &[T], eq: impl Fn(&T, &T) -> bool) -> bool {
    items
        .iter()
        .enumerate()
        .any(|(i, item)| items[..i].iter().any(|earlier| eq(earlier, item)))
}

/// An [`Operation`] with every change-set populated.
///
/// The working form of the algebra: `compose` and `transform` operate on
/// filled operations so they never branch on absence, then [`strip`] back to
/// the canonical form before returning.
///
/// [`strip`]: FilledOperation::strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilledOperation<Id> {
    /// Cell content changes.
    pub update_cells: Vec<UpdateCell<Id>>,
    /// Rows to delete.
    pub delete_rows: Vec<Id>,
    /// Rows to insert.
    pub insert_rows: Vec<InsertRow<Id>>,
    /// Columns to delete.
    pub delete_cols: Vec<Id>,
    /// Columns to insert.
    pub insert_cols: Vec<InsertCol<Id>>,
}

impl<Id> Default for FilledOperation<Id> {
    fn default() -> Self {
        Self {
            update_cells: Vec::new(),
            delete_rows: Vec::new(),
            insert_rows: Vec::new(),
            delete_cols: Vec::new(),
            insert_cols: Vec::new(),
        }
    }
}

impl<Id: Identity> FilledOperation<Id> {
    /// Drop empty change-sets, producing the canonical [`Operation`].
    #[must_use]
    pub fn strip(self) -> Operation<Id> {
        fn keep<T>(set: Vec<T>) -> Option<Vec<T>> {
            if set.is_empty() {
                None
            } else {
                Some(set)
            }
        }

        Operation {
            update_cells: keep(self.update_cells),
            delete_rows: keep(self.delete_rows),
            insert_rows: keep(self.insert_rows),
            delete_cols: keep(self.delete_cols),
            insert_cols: keep(self.insert_cols),
        }
    }
}
