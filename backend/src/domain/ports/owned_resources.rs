//! Driving ports for ownership-guarded record use-cases.

use async_trait::async_trait;

use crate::domain::{Error, IdentityId, OwnedResource, ResourceId};

/// Reads scoped to the calling identity.
#[async_trait]
pub trait OwnedResourceQuery<R: OwnedResource>: Send + Sync {
    /// Records owned by `caller`.
    async fn list(&self, caller: &IdentityId) -> Result<Vec<R>, Error>;

    /// One record owned by `caller`; anything else is `Forbidden`.
    async fn get(&self, id: &ResourceId, caller: &IdentityId) -> Result<R, Error>;
}

/// Writes scoped to the calling identity.
#[async_trait]
pub trait OwnedResourceCommand<R: OwnedResource>: Send + Sync {
    /// Create a record owned by `caller`.
    async fn create(&self, draft: R::Draft, caller: &IdentityId) -> Result<R, Error>;

    /// Replace a record's fields after checking `caller` owns it.
    async fn update(&self, id: &ResourceId, draft: R::Draft, caller: &IdentityId)
    -> Result<R, Error>;

    /// Delete a record after checking `caller` owns it.
    async fn delete(&self, id: &ResourceId, caller: &IdentityId) -> Result<(), Error>;
}
