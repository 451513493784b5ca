//! Port abstraction for identity persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{Identity, IdentityId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by identity registry adapters.
    pub enum IdentityPersistenceError {
        /// Registry connection could not be established.
        Connection { message: String } => "identity registry connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "identity registry query failed: {message}",
        /// Another identity already holds the username.
        UniqueViolation { username: String } => "username already registered: {username}",
    }
}

/// Port for storing and resolving account identities.
///
/// Adapters must enforce username uniqueness atomically with `insert` and
/// remove every record owned by an identity when it is deleted.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityRegistry: Send + Sync {
    /// Fetch an identity by id.
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityPersistenceError>;

    /// Fetch an identity by exact username.
    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Identity>, IdentityPersistenceError>;

    /// Persist a new identity.
    async fn insert(&self, identity: &Identity) -> Result<(), IdentityPersistenceError>;

    /// Remove an identity and everything it owns.
    async fn delete(&self, id: &IdentityId) -> Result<(), IdentityPersistenceError>;

    /// Every registered identity.
    async fn list(&self) -> Result<Vec<Identity>, IdentityPersistenceError>;
}
