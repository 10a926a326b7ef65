//! Domain-level error types.

use thiserror::Error;

/// Errors raised by a storage backend.
///
/// Update and delete of a missing post are not errors; see
/// [`PostRepository`](crate::ports::PostRepository).
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Backend connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),
}
