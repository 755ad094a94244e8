//! Domain ports implemented by driven adapters.
//!
//! Ports expose strongly typed errors so adapters map their failures into
//! predictable variants instead of returning a catch-all error type.

use async_trait::async_trait;
use thiserror::Error;

use super::{IdRange, User, UserQuery};

/// Errors surfaced by the persistence adapter for user records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserPersistenceError {
    /// Database connectivity, pool checkout, or transaction failure.
    #[error("user persistence connection failed: {message}")]
    Connection {
        /// Driver-agnostic description of the connectivity failure.
        message: String,
    },
    /// Statement construction or execution failure.
    #[error("user persistence query failed: {message}")]
    Query {
        /// Driver-agnostic description of the query failure.
        message: String,
    },
}

impl UserPersistenceError {
    /// Helper for connection-level failures.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Helper for query-level failures.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }
}

/// Data-access operations the request handlers invoke.
///
/// The repository owns the translation of [`UserQuery`] range/offset/limit/
/// order fields into storage-level filtering. An active range always
/// supersedes a specific id; the query parser guarantees the equality id is
/// cleared beforehand.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a record. An unset id lets storage assign one; a nonzero id is
    /// persisted as supplied. Returns the stored record.
    async fn create(&self, user: &User) -> Result<User, UserPersistenceError>;

    /// Update records in scope, setting only the non-empty fields of `user`.
    ///
    /// Scope resolution: active `range`, else nonzero `user.id`, else
    /// non-empty attribute equality. An entirely unscoped update is refused
    /// with a [`UserPersistenceError::Query`].
    async fn update(&self, user: &User, range: Option<IdRange>)
    -> Result<(), UserPersistenceError>;

    /// Delete records in scope. Scope resolution matches [`Self::update`].
    async fn delete(&self, user: &User, range: Option<IdRange>)
    -> Result<(), UserPersistenceError>;

    /// Fetch records matching the query, honouring range, equality filters,
    /// offset, limit, and ascending-by-id ordering when requested.
    async fn find(&self, query: &UserQuery) -> Result<Vec<User>, UserPersistenceError>;
}
