//! Pluggable identity for rows and columns.
//!
//! Rows and columns are addressed by opaque identity tokens. Equality between
//! tokens is supplied by the implementor, never assumed to be primitive
//! equality: identities may be structural (e.g. a replica tag plus a serial),
//! and two structurally different tokens can still denote the same row.
//!
//! Identities are created by row/column insertion and retired by deletion.
//! They are never reused, so "the old row at this id" and "a new row reusing
//! this id" can never be confused.

use alloc::string::String;

/// An opaque, comparable row or column identity.
///
/// Implementors define [`Identity::id_eq`], the only notion of equality the
/// algebra uses. The token is never ordered, hashed, or compared with `==`
/// by the library itself.
///
/// # Example
///
/// ```
/// use gridkit::Identity;
///
/// // A structural identity: equality ignores the display hint.
/// #[derive(Clone)]
/// struct RowId {
///     replica: u64,
///     serial: u64,
///     hint: String,
/// }
///
/// impl Identity for RowId {
///     fn id_eq(&self, other: &Self) -> bool {
///         self.replica == other.replica && self.serial == other.serial
///     }
/// }
///
/// let a = RowId { replica: 1, serial: 7, hint: "first".into() };
/// let b = RowId { replica: 1, serial: 7, hint: "renamed".into() };
/// assert!(a.id_eq(&b));
/// ```
pub trait Identity: Clone {
    /// Whether `self` and `other` denote the same row or column.
    fn id_eq(&self, other: &Self) -> bool;
}

impl Identity for String {
    fn id_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl Identity for &str {
    fn id_eq(&self, other: &Self) -> bool {
        self == other
    }
}

impl Identity for u64 {
    fn id_eq(&self, other: &Self) -> bool {
        self == other
    }
}

/// Whether `ids` contains an identity equal to `id` under [`Identity::id_eq`].
///
/// Linear scan by design: the equality predicate is all we may assume about
/// the token, so no hashing or ordering shortcut is available.
pub(crate) fn contains_id<Id: Identity>(ids: &[Id], id: &Id) -> bool {
    ids.iter().any(|candidate| candidate.id_eq(id))
}
