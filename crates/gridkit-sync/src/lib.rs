//! # gridkit-sync
//!
//! Revision-tracked synchronization on top of the `gridkit` OT algebra.
//!
//! The server side keeps one [`GridSession`] per grid — snapshot, append-only
//! [`SyncLog`], and broadcast subscribers — behind a per-grid lock handed out
//! by [`SessionRegistry`]. The client side is [`ClientReconciler`]: it applies
//! local edits optimistically, queues them as pending, and transforms remote
//! entries through that queue so every replica converges on the state the log
//! serializes.
//!
//! ```
//! use gridkit::{Grid, Operation};
//! use gridkit_sync::{ClientReconciler, GridSession};
//!
//! let mut server = GridSession::new(Grid::<&str>::new());
//! let mut client = ClientReconciler::new(Grid::<&str>::new(), 0);
//!
//! // The client edits optimistically and submits against its base revision.
//! let (base, op) = client.edit(Operation::delete_row("r1")).unwrap();
//! let accepted = server.receive(base, op).unwrap();
//!
//! // The server's broadcast of its own edit is the acknowledgment.
//! client.acknowledge(&accepted);
//! assert_eq!(client.revision(), 1);
//! ```

#![warn(missing_docs)]

mod client;
mod log;
mod registry;
mod session;

pub use client::ClientReconciler;
pub use log::{LogEntry, ReceiveError, SyncLog};
pub use registry::SessionRegistry;
pub use session::{GridSession, Page, SnapshotState};
