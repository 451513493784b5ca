//! In-memory `OwnedResourceStore` adapter shared by every record family.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::ports::{OwnedResourceStore, ResourceStoreError};
use crate::domain::{IdentityId, ResourceId};

use super::Tables;
use super::tables::MemoryTable;

/// Owner-scoped store for one record family.
pub struct InMemoryResourceStore<R> {
    tables: Arc<RwLock<Tables>>,
    family: PhantomData<fn() -> R>,
}

impl<R> Clone for InMemoryResourceStore<R> {
    fn clone(&self) -> Self {
        Self {
            tables: Arc::clone(&self.tables),
            family: PhantomData,
        }
    }
}

impl<R> InMemoryResourceStore<R> {
    pub(super) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self {
            tables,
            family: PhantomData,
        }
    }
}

#[async_trait]
impl<R: MemoryTable> OwnedResourceStore for InMemoryResourceStore<R> {
    type Resource = R;

    async fn find_by_id_for_owner(
        &self,
        id: &ResourceId,
        owner: &IdentityId,
    ) -> Result<Option<R>, ResourceStoreError> {
        let tables = self.tables.read().await;
        Ok(R::rows(&tables)
            .get(id)
            .filter(|record| record.owner_id() == *owner)
            .cloned())
    }

    async fn list_for_owner(&self, owner: &IdentityId) -> Result<Vec<R>, ResourceStoreError> {
        let tables = self.tables.read().await;
        let mut records: Vec<R> = R::rows(&tables)
            .values()
            .filter(|record| record.owner_id() == *owner)
            .cloned()
            .collect();
        records.sort_by_key(|record| record.id());
        Ok(records)
    }

    async fn insert(&self, resource: &R) -> Result<(), ResourceStoreError> {
        let mut tables = self.tables.write().await;
        R::check_references(&tables, resource)?;
        let rows = R::rows_mut(&mut tables);
        if rows.contains_key(&resource.id()) {
            return Err(ResourceStoreError::query(format!(
                "{} {} already exists",
                R::KIND,
                resource.id()
            )));
        }
        rows.insert(resource.id(), resource.clone());
        Ok(())
    }

    async fn update(&self, resource: &R) -> Result<(), ResourceStoreError> {
        let mut tables = self.tables.write().await;
        R::check_references(&tables, resource)?;
        match R::rows_mut(&mut tables).get_mut(&resource.id()) {
            Some(stored) if stored.owner_id() == resource.owner_id() => {
                *stored = resource.clone();
                Ok(())
            }
            _ => Err(ResourceStoreError::query(format!(
                "{} {} not found",
                R::KIND,
                resource.id()
            ))),
        }
    }

    async fn delete(&self, id: &ResourceId, owner: &IdentityId) -> Result<(), ResourceStoreError> {
        let mut tables = self.tables.write().await;
        let rows = R::rows_mut(&mut tables);
        if !rows.get(id).is_some_and(|record| record.owner_id() == *owner) {
            return Ok(());
        }
        if let Some(removed) = rows.remove(id) {
            R::remove_dependents(&mut tables, &removed);
        }
        Ok(())
    }
}
