//! Convenient re-exports for common usage.
//!
//! ```
//! use gridkit::prelude::*;
//! ```

pub use crate::compose;
pub use crate::transform;
pub use crate::Column;
pub use crate::Grid;
pub use crate::Identity;
pub use crate::Row;
pub use crate::InsertCol;
pub use crate::InsertRow;
pub use crate::Operation;
pub use crate::RowCell;
pub use crate::UpdateCell;
