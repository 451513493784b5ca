//! Ownership enforcement for user-owned records.
//!
//! Every record family implements [`OwnedResource`] and is served through
//! [`OwnedResourceService`], which resolves records by `(id, caller)` and
//! re-checks the stored owner before any read or write. A record that is
//! missing and a record owned by someone else are indistinguishable to the
//! caller: both surface as `Forbidden`.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use super::Error;
use super::identity::IdentityId;
use super::ports::{
    OwnedResourceCommand, OwnedResourceQuery, OwnedResourceStore, ResourceStoreError,
};

/// Identifier of an owned record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct ResourceId(Uuid);

impl ResourceId {
    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResourceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// A record that belongs to exactly one identity.
///
/// ## Invariants
/// - `owner_id` is fixed by [`OwnedResource::from_draft`] and never changed by
///   [`OwnedResource::apply`].
pub trait OwnedResource: Clone + Send + Sync + 'static {
    /// Client-supplied field values; never carries an owner.
    type Draft: Send + Sync + 'static;

    /// Human-readable family name used in messages and logs.
    const KIND: &'static str;

    /// Record identifier.
    fn id(&self) -> ResourceId;

    /// Owning identity.
    fn owner_id(&self) -> IdentityId;

    /// Build a new record owned by `owner`.
    fn from_draft(id: ResourceId, owner: IdentityId, draft: Self::Draft) -> Self;

    /// Replace the mutable fields, keeping id and owner.
    fn apply(self, draft: Self::Draft) -> Self;
}

/// Admit `found` only when it exists and belongs to `caller`.
///
/// # Examples
/// ```
/// use persona::domain::{ErrorCode, IdentityId, ResourceId, require_owned};
/// use persona::domain::PersonInformation;
///
/// let caller = IdentityId::random();
/// let denied = require_owned::<PersonInformation>(None, &ResourceId::random(), &caller);
/// assert_eq!(denied.unwrap_err().code(), ErrorCode::Forbidden);
/// ```
pub fn require_owned<R: OwnedResource>(
    found: Option<R>,
    id: &ResourceId,
    caller: &IdentityId,
) -> Result<R, Error> {
    match found {
        Some(resource) if resource.owner_id() == *caller => Ok(resource),
        _ => {
            let kind = R::KIND;
            warn!(kind, resource_id = %id, caller = %caller, "ownership check denied access");
            Err(Error::forbidden(format!(
                "you do not have permission to access this {}",
                R::KIND
            )))
        }
    }
}

pub(crate) fn map_store_error(error: ResourceStoreError) -> Error {
    match error {
        // A vanished owner or parent reads the same as a foreign one.
        ResourceStoreError::MissingReference { kind } => {
            warn!(kind = %kind, "write refused: referenced record missing");
            Error::forbidden(format!("you do not have permission to access this {kind}"))
        }
        ResourceStoreError::Conflict { message } => Error::conflict(message),
        other => Error::persistence(other.to_string()),
    }
}

/// Ownership-guarded operations over one record family.
pub struct OwnedResourceService<S> {
    store: Arc<S>,
}

impl<S> Clone for OwnedResourceService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: OwnedResourceStore> OwnedResourceService<S> {
    /// Serve records from `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    async fn resolve(&self, id: &ResourceId, caller: &IdentityId) -> Result<S::Resource, Error> {
        let found = self
            .store
            .find_by_id_for_owner(id, caller)
            .await
            .map_err(map_store_error)?;
        require_owned(found, id, caller)
    }
}

#[async_trait]
impl<S: OwnedResourceStore> OwnedResourceQuery<S::Resource> for OwnedResourceService<S> {
    async fn list(&self, caller: &IdentityId) -> Result<Vec<S::Resource>, Error> {
        let records = self
            .store
            .list_for_owner(caller)
            .await
            .map_err(map_store_error)?;
        Ok(records
            .into_iter()
            .filter(|record| record.owner_id() == *caller)
            .collect())
    }

    async fn get(&self, id: &ResourceId, caller: &IdentityId) -> Result<S::Resource, Error> {
        self.resolve(id, caller).await
    }
}

#[async_trait]
impl<S: OwnedResourceStore> OwnedResourceCommand<S::Resource> for OwnedResourceService<S> {
    async fn create(
        &self,
        draft: <S::Resource as OwnedResource>::Draft,
        caller: &IdentityId,
    ) -> Result<S::Resource, Error> {
        let record =
            <S::Resource as OwnedResource>::from_draft(ResourceId::random(), *caller, draft);
        self.store.insert(&record).await.map_err(map_store_error)?;
        let kind = <S::Resource as OwnedResource>::KIND;
        info!(kind, resource_id = %record.id(), owner = %caller, "record created");
        Ok(record)
    }

    async fn update(
        &self,
        id: &ResourceId,
        draft: <S::Resource as OwnedResource>::Draft,
        caller: &IdentityId,
    ) -> Result<S::Resource, Error> {
        let updated = self.resolve(id, caller).await?.apply(draft);
        self.store.update(&updated).await.map_err(map_store_error)?;
        let kind = <S::Resource as OwnedResource>::KIND;
        info!(kind, resource_id = %id, owner = %caller, "record updated");
        Ok(updated)
    }

    async fn delete(&self, id: &ResourceId, caller: &IdentityId) -> Result<(), Error> {
        self.resolve(id, caller).await?;
        self.store.delete(id, caller).await.map_err(map_store_error)?;
        let kind = <S::Resource as OwnedResource>::KIND;
        info!(kind, resource_id = %id, owner = %caller, "record deleted");
        Ok(())
    }
}
