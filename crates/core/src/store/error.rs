//! Errors reported by storage adapters.

use thiserror::Error;

/// Failure of a call to the storage collaborator.
///
/// Adapters map their native errors into these variants so the domain can
/// decide what a failure means without knowing the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The store could not be reached or the call did not complete.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// A uniqueness or check constraint rejected the write.
    #[error("constraint violated: {0}")]
    Conflict(String),

    /// The store executed the call and reported an error.
    #[error("query failed: {0}")]
    Query(String),
}

impl StoreError {
    /// Returns true if the write was rejected by a constraint.
    #[must_use]
    pub const fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}
