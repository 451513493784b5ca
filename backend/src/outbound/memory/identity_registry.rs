//! In-memory `IdentityRegistry` adapter.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{IdentityPersistenceError, IdentityRegistry};
use crate::domain::{Identity, IdentityId};

use super::Tables;

/// Identity registry over the shared in-memory tables.
///
/// Username uniqueness is checked and the row inserted under one write lock,
/// so concurrent registrations of the same name admit exactly one.
#[derive(Clone)]
pub struct InMemoryIdentityRegistry {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryIdentityRegistry {
    pub(super) fn new(tables: Arc<RwLock<Tables>>) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl IdentityRegistry for InMemoryIdentityRegistry {
    async fn find_by_id(&self, id: &IdentityId) -> Result<Option<Identity>, IdentityPersistenceError> {
        Ok(self.tables.read().await.identities.get(id).cloned())
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Identity>, IdentityPersistenceError> {
        let tables = self.tables.read().await;
        Ok(tables
            .identities
            .values()
            .find(|identity| identity.username().as_str() == username)
            .cloned())
    }

    async fn insert(&self, identity: &Identity) -> Result<(), IdentityPersistenceError> {
        let mut tables = self.tables.write().await;
        let taken = tables
            .identities
            .values()
            .any(|existing| existing.username() == identity.username());
        if taken {
            return Err(IdentityPersistenceError::unique_violation(
                identity.username().as_str(),
            ));
        }
        if tables.identities.contains_key(&identity.id()) {
            return Err(IdentityPersistenceError::query("identity id already exists"));
        }
        tables.identities.insert(identity.id(), identity.clone());
        Ok(())
    }

    async fn delete(&self, id: &IdentityId) -> Result<(), IdentityPersistenceError> {
        let mut tables = self.tables.write().await;
        if tables.identities.remove(id).is_some() {
            let removed = tables.remove_owned_by(id);
            debug!(identity_id = %id, removed, "cascaded identity delete");
        }
        Ok(())
    }

    async fn list(&self) -> Result<Vec<Identity>, IdentityPersistenceError> {
        let tables = self.tables.read().await;
        let mut identities: Vec<Identity> = tables.identities.values().cloned().collect();
        identities.sort_by(|a, b| a.username().as_str().cmp(b.username().as_str()));
        Ok(identities)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::OwnedResourceStore;
    use crate::domain::{
        CredentialHasher, OwnedResource, PersonInformation, ResourceId, Role, Username,
    };
    use crate::outbound::memory::MemoryDatabase;
    use crate::test_support::person_information_draft;
    use futures::future::join_all;
    use rstest::rstest;

    fn identity(username: &str) -> Identity {
        Identity::new(
            IdentityId::random(),
            Username::new(username).expect("username"),
            CredentialHasher.hash("AbCdef12!!34").expect("hash"),
            Role::User,
        )
    }

    #[rstest]
    #[tokio::test]
    async fn inserted_identity_is_found_by_id_and_username() {
        let registry = MemoryDatabase::new().identity_registry();
        let alice = identity("alice1234");
        registry.insert(&alice).await.expect("insert");

        assert_eq!(
            registry.find_by_id(&alice.id()).await.expect("lookup"),
            Some(alice.clone())
        );
        assert_eq!(
            registry.find_by_username("alice1234").await.expect("lookup"),
            Some(alice)
        );
        assert_eq!(registry.find_by_username("ALICE1234").await.expect("lookup"), None);
    }

    #[rstest]
    #[tokio::test]
    async fn second_insert_of_username_is_a_unique_violation() {
        let registry = MemoryDatabase::new().identity_registry();
        registry.insert(&identity("alice1234")).await.expect("first");

        let err = registry
            .insert(&identity("alice1234"))
            .await
            .expect_err("duplicate");
        assert_eq!(err, IdentityPersistenceError::unique_violation("alice1234"));
        assert_eq!(registry.list().await.expect("list").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn concurrent_inserts_of_one_username_admit_exactly_one() {
        let registry = MemoryDatabase::new().identity_registry();
        let attempts = (0..16).map(|_| {
            let registry = registry.clone();
            async move { registry.insert(&identity("racer12345")).await }
        });

        let results = join_all(attempts).await;
        assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
        assert_eq!(registry.list().await.expect("list").len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn deleting_identity_cascades_to_owned_records() {
        let db = MemoryDatabase::new();
        let registry = db.identity_registry();
        let people = db.person_information_store();
        let alice = identity("alice1234");
        let bob = identity("bobby1234");
        registry.insert(&alice).await.expect("alice");
        registry.insert(&bob).await.expect("bob");

        let alices = PersonInformation::from_draft(
            ResourceId::random(),
            alice.id(),
            person_information_draft("Alice"),
        );
        let bobs =
            PersonInformation::from_draft(ResourceId::random(), bob.id(), person_information_draft("Bob"));
        people.insert(&alices).await.expect("insert");
        people.insert(&bobs).await.expect("insert");

        registry.delete(&alice.id()).await.expect("delete");

        assert_eq!(registry.find_by_id(&alice.id()).await.expect("lookup"), None);
        assert!(people.list_for_owner(&alice.id()).await.expect("list").is_empty());
        assert_eq!(people.list_for_owner(&bob.id()).await.expect("list"), vec![bobs]);
    }
}
