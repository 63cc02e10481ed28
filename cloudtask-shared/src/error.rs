/// Domain error types shared across the CloudTask crates
///
/// Two layers of errors live here:
///
/// - [`StoreError`]: failures raised by a [`crate::store::Store`] backend.
///   Absence of a record is NOT an error at this layer; lookups return
///   `Ok(None)` and callers decide what absence means.
/// - [`AccessError`]: the outcome taxonomy of the access service. This is
///   what the transport layer maps to HTTP status codes.
///
/// Cache failures have their own type ([`crate::cache::CacheError`]) and are
/// absorbed inside the access service rather than surfaced here.

use thiserror::Error;

/// Errors raised by a storage backend
#[derive(Debug, Error)]
pub enum StoreError {
    /// A referenced row does not exist (foreign-key violation)
    #[error("invalid reference to {reference}")]
    ForeignKey {
        /// The entity the dangling reference points at (e.g. "project")
        reference: &'static str,
    },

    /// A uniqueness constraint was violated
    #[error("{entity} already exists")]
    Conflict {
        /// The entity that collided (e.g. "user")
        entity: &'static str,
    },

    /// Any other backend failure (connection loss, malformed query, ...)
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Outcomes of access-service operations that are not plain success
///
/// `NotFound` and `Forbidden` are terminal: they are surfaced to the caller
/// verbatim, never retried and never masked by one another. A denied actor
/// must be able to tell "this exists but is not yours" apart from "this does
/// not exist" on single-record operations.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The referenced entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// The actor is authenticated but not authorized for the record
    #[error("not enough permissions")]
    Forbidden,

    /// The storage backend failed
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AccessError {
    /// True for outcomes caused by the caller rather than the system
    pub fn is_terminal(&self) -> bool {
        matches!(self, AccessError::NotFound(_) | AccessError::Forbidden)
    }
}
