//! Port for persisting records owned by an identity.

use async_trait::async_trait;

use crate::domain::{IdentityId, OwnedResource, ResourceId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by owned-record store adapters.
    pub enum ResourceStoreError {
        /// Store connection could not be established.
        Connection { message: String } => "record store connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "record store query failed: {message}",
        /// The owner or a parent record the row points at does not exist.
        MissingReference { kind: String } => "referenced {kind} does not exist",
        /// The row would duplicate a relationship that allows only one.
        Conflict { message: String } => "record store conflict: {message}",
    }
}

/// Storage for one family of owned records.
///
/// Every read is scoped by owner; adapters never return a record whose owner
/// differs from the one requested.
#[cfg_attr(test, mockall::automock(type Resource = crate::domain::PersonInformation;))]
#[async_trait]
pub trait OwnedResourceStore: Send + Sync + 'static {
    /// Record family held by this store.
    type Resource: OwnedResource;

    /// Fetch a record by id, only if `owner` owns it.
    async fn find_by_id_for_owner(
        &self,
        id: &ResourceId,
        owner: &IdentityId,
    ) -> Result<Option<Self::Resource>, ResourceStoreError>;

    /// Every record owned by `owner`.
    async fn list_for_owner(
        &self,
        owner: &IdentityId,
    ) -> Result<Vec<Self::Resource>, ResourceStoreError>;

    /// Persist a new record.
    ///
    /// Adapters reject a row whose owner or parent no longer exists with
    /// [`ResourceStoreError::MissingReference`], checked atomically with the
    /// write.
    async fn insert(&self, resource: &Self::Resource) -> Result<(), ResourceStoreError>;

    /// Overwrite an existing record, under the same reference checks as
    /// `insert`.
    async fn update(&self, resource: &Self::Resource) -> Result<(), ResourceStoreError>;

    /// Remove a record owned by `owner`.
    async fn delete(&self, id: &ResourceId, owner: &IdentityId) -> Result<(), ResourceStoreError>;
}
