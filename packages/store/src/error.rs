use thiserror::Error;

/// Errors surfaced by a [`crate::TaskStore`] or [`crate::UserStore`] backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend could not be reached or rejected the query.
    #[error("storage backend error: {0}")]
    Backend(String),
    /// A uniqueness constraint was violated (e.g. duplicate email).
    #[error("{0}")]
    Conflict(String),
    /// A stored record could not be mapped back into the domain model.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}
