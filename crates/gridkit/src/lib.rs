//! # gridkit
//!
//! Operational transformation (OT) for collaboratively edited tabular grids.
//!
//! Multiple clients edit a shared grid of cells, rows, and columns; each edit
//! is an [`Operation`] — an atomic batch of cell updates, row/column inserts,
//! and row/column deletes. Two pure functions make concurrent editing
//! converge:
//!
//! - [`compose`] merges two *sequential* operations into one:
//!   `apply(apply(S, a), b) == apply(S, compose(a, b))`.
//! - [`transform`] rewrites two *concurrent* operations so that applying them
//!   in either order reaches the same state:
//!   `apply(apply(S, a), b') == apply(apply(S, b), a')`.
//!
//! Conflicts resolve deterministically: a delete always dominates a
//! concurrent update of the same row or column, and a direct same-cell
//! conflict keeps the local side's value. Nothing is lost except through an
//! explicit delete.
//!
//! Row and column identities are opaque tokens compared through the
//! pluggable [`Identity`] trait — equality may be structural, and identities
//! are never reused.
//!
//! The revision log, per-grid sessions, and the optimistic client reconciler
//! live in the companion `gridkit-sync` crate.
//!
//! ## `no_std` Support
//!
//! This crate supports `no_std` environments with the `alloc` crate.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! gridkit = { version = "0.1", default-features = false }
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use gridkit::prelude::*;
//!
//! // Two edits applied one after the other collapse into one operation,
//! // the later value winning the cell.
//! let draft = Operation::update_cell("r1", "c1", "draft");
//! let fixed = Operation::update_cell("r1", "c1", "final");
//! let combined = compose(draft, fixed);
//! assert_eq!(combined.update_cells()[0].value, "final");
//!
//! // Two concurrent edits are transformed so both replicas converge.
//! // A delete dominates an update of the same row.
//! let local = Operation::<&str>::delete_row("r1");
//! let remote = Operation::update_cell("r1", "c1", "too late");
//! let (_, remote_p) = transform(local, remote);
//! assert!(remote_p.is_identity());
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

mod compose;
mod error;
mod grid;
mod identity;
mod operation;
mod transform;

pub mod prelude;

pub use compose::compose;
pub use error::{ChangeSet, ValidationError};
pub use grid::{Column, Grid, Row};
pub use identity::Identity;
pub use operation::{FilledOperation, InsertCol, InsertRow, Operation, RowCell, UpdateCell};
pub use transform::transform;
