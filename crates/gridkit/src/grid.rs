//! The reference grid snapshot and `apply`.
//!
//! [`Grid`] is the state the algebra's laws quantify over: the server keeps
//! one per grid id as the authoritative snapshot, clients keep one as their
//! optimistic local view. Rows store sparse `(column, value)` cells; display
//! order is the vector order.

use alloc::string::String;
use alloc::vec::Vec;

use crate::identity::{contains_id, Identity};
use crate::operation::{Operation, RowCell};

/// A column of the grid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Column<Id> {
    /// Column identity.
    pub id: Id,
    /// Display name.
    pub name: String,
    /// Column value type tag.
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub col_type: String,
}

/// A row of the grid: an identity plus its populated cells.
///
/// Cells are sparse; a column with no entry renders as empty.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Row<Id> {
    /// Row identity.
    pub id: Id,
    /// Populated cells, keyed by column identity.
    pub cells: Vec<RowCell<Id>>,
}

/// An in-memory grid snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Grid<Id> {
    /// Columns in display order.
    pub columns: Vec<Column<Id>>,
    /// Rows in display order.
    pub rows: Vec<Row<Id>>,
}

impl<Id> Default for Grid<Id> {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}

impl<Id: Identity> Grid<Id> {
    /// An empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// A grid with the given columns and rows.
    #[must_use]
    pub fn with(columns: Vec<Column<Id>>, rows: Vec<Row<Id>>) -> Self {
        Self { columns, rows }
    }

    /// Number of rows.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Look up a cell's content. `None` if the row is missing or the cell is
    /// unpopulated.
    #[must_use]
    pub fn cell(&self, row_id: &Id, col_id: &Id) -> Option<&str> {
        self.rows
            .iter()
            .find(|row| row.id.id_eq(row_id))?
            .cells
            .iter()
            .find(|cell| cell.col_id.id_eq(col_id))
            .map(|cell| cell.value.as_str())
    }

    /// Whether a row with this identity exists.
    #[must_use]
    pub fn has_row(&self, row_id: &Id) -> bool {
        self.rows.iter().any(|row| row.id.id_eq(row_id))
    }

    /// Whether a column with this identity exists.
    #[must_use]
    pub fn has_column(&self, col_id: &Id) -> bool {
        self.columns.iter().any(|col| col.id.id_eq(col_id))
    }

    /// Apply one operation to the snapshot, in place.
    ///
    /// Change-sets apply in a fixed order: row deletes, column deletes
    /// (which also scrub the column's cells from every remaining row),
    /// column inserts (at their `index`, clamped to the column count), row
    /// inserts (appended), then cell updates. An update whose row is gone,
    /// or whose column does not exist, is a no-op rather than an error:
    /// concurrent editing makes such updates routine and they carry no
    /// intent worth preserving. The same rule covers an inserted row's
    /// initial data, which keeps only cells under columns that exist once
    /// the operation's own column inserts are in.
    pub fn apply(&mut self, operation: &Operation<Id>) {
        let delete_rows = operation.delete_rows();
        if !delete_rows.is_empty() {
            self.rows.retain(|row| !contains_id(delete_rows, &row.id));
        }

        let delete_cols = operation.delete_cols();
        if !delete_cols.is_empty() {
            self.columns
                .retain(|col| !contains_id(delete_cols, &col.id));
            for row in &mut self.rows {
                row.cells
                    .retain(|cell| !contains_id(delete_cols, &cell.col_id));
            }
        }

        for col in operation.insert_cols() {
            let index = col.index.min(self.columns.len());
            self.columns.insert(
                index,
                Column {
                    id: col.id.clone(),
                    name: col.col_name.clone(),
                    col_type: col.col_type.clone(),
                },
            );
        }

        for row in operation.insert_rows() {
            let cells = row
                .data
                .iter()
                .filter(|cell| self.has_column(&cell.col_id))
                .cloned()
                .collect();
            self.rows.push(Row {
                id: row.id.clone(),
                cells,
            });
        }

        for update in operation.update_cells() {
            if !self.has_column(&update.col_id) {
                continue;
            }
            let Some(row) = self.rows.iter_mut().find(|row| row.id.id_eq(&update.row_id))
            else {
                continue;
            };
            match row
                .cells
                .iter_mut()
                .find(|cell| cell.col_id.id_eq(&update.col_id))
            {
                Some(cell) => cell.value = update.value.clone(),
                None => row.cells.push(RowCell {
                    col_id: update.col_id.clone(),
                    value: update.value.clone(),
                }),
            }
        }
    }

    /// The rows of one display page, 1-based.
    ///
    /// `page` counts from 1 and `size` must be positive; out-of-range pages
    /// (and a zero `page` or `size`) yield an empty slice. The final page is
    /// clamped to the remaining rows.
    #[must_use]
    pub fn rows_by_page(&self, page: usize, size: usize) -> &[Row<Id>] {
        if page == 0 || size == 0 {
            return &[];
        }
        let start = (page - 1).saturating_mul(size);
        if start >= self.rows.len() {
            return &[];
        }
        let end = (start + size).min(self.rows.len());
        &self.rows[start..end]
    }
}
