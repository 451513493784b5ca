//! In-process persistence adapters.
//!
//! All stores created from one [`MemoryDatabase`] share a single set of
//! tables behind one `RwLock`. Cross-table work happens under one write
//! guard: username uniqueness, cascading deletes and the owner and parent
//! checks made when a record is written.

mod identity_registry;
mod resource_store;

use std::sync::Arc;

use tokio::sync::RwLock;

use crate::domain::{PersonInformation, ProfilePhoto};

pub use identity_registry::InMemoryIdentityRegistry;
pub use resource_store::InMemoryResourceStore;

mod tables {
    use std::collections::HashMap;

    use crate::domain::ports::ResourceStoreError;
    use crate::domain::{
        Identity, IdentityId, OwnedResource, PersonInformation, ProfilePhoto, ResourceId,
    };

    /// Rows of every record family.
    #[derive(Default)]
    pub struct Tables {
        pub(super) identities: HashMap<IdentityId, Identity>,
        pub(super) person_information: HashMap<ResourceId, PersonInformation>,
        pub(super) profile_photos: HashMap<ResourceId, ProfilePhoto>,
    }

    impl Tables {
        /// Drop every owned record belonging to `owner`.
        pub(super) fn remove_owned_by(&mut self, owner: &IdentityId) -> usize {
            let before = self.person_information.len() + self.profile_photos.len();
            self.person_information
                .retain(|_, record| record.owner_id() != *owner);
            self.profile_photos
                .retain(|_, record| record.owner_id() != *owner);
            before - (self.person_information.len() + self.profile_photos.len())
        }

        fn require_owner<R: OwnedResource>(&self, row: &R) -> Result<(), ResourceStoreError> {
            if self.identities.contains_key(&row.owner_id()) {
                Ok(())
            } else {
                Err(ResourceStoreError::missing_reference("account"))
            }
        }
    }

    /// Record family with a table in [`Tables`].
    pub trait MemoryTable: OwnedResource {
        fn rows(tables: &Tables) -> &HashMap<ResourceId, Self>;

        fn rows_mut(tables: &mut Tables) -> &mut HashMap<ResourceId, Self>;

        /// Reject `row` unless everything it points at is present.
        ///
        /// Runs under the same write guard as the insert or update.
        fn check_references(tables: &Tables, row: &Self) -> Result<(), ResourceStoreError> {
            tables.require_owner(row)
        }

        /// Remove rows that reference a deleted record of this family.
        fn remove_dependents(_tables: &mut Tables, _removed: &Self) {}
    }

    impl MemoryTable for PersonInformation {
        fn rows(tables: &Tables) -> &HashMap<ResourceId, Self> {
            &tables.person_information
        }

        fn rows_mut(tables: &mut Tables) -> &mut HashMap<ResourceId, Self> {
            &mut tables.person_information
        }

        fn remove_dependents(tables: &mut Tables, removed: &Self) {
            let parent = removed.id();
            tables
                .profile_photos
                .retain(|_, photo| photo.person_information_id() != parent);
        }
    }

    impl MemoryTable for ProfilePhoto {
        fn rows(tables: &Tables) -> &HashMap<ResourceId, Self> {
            &tables.profile_photos
        }

        fn rows_mut(tables: &mut Tables) -> &mut HashMap<ResourceId, Self> {
            &mut tables.profile_photos
        }

        /// The owner must exist, the parent must exist under the same owner,
        /// and the parent must not already carry another photo.
        fn check_references(tables: &Tables, row: &Self) -> Result<(), ResourceStoreError> {
            tables.require_owner(row)?;
            let parent_id = row.person_information_id();
            let parent_owned = tables
                .person_information
                .get(&parent_id)
                .is_some_and(|parent| parent.owner_id() == row.owner_id());
            if !parent_owned {
                return Err(ResourceStoreError::missing_reference(
                    PersonInformation::KIND,
                ));
            }
            let taken = tables
                .profile_photos
                .values()
                .any(|photo| photo.person_information_id() == parent_id && photo.id() != row.id());
            if taken {
                return Err(ResourceStoreError::conflict(format!(
                    "{} {parent_id} already has a profile photo",
                    PersonInformation::KIND
                )));
            }
            Ok(())
        }
    }
}

use tables::Tables;

/// Shared handle to the in-process tables.
///
/// # Examples
/// ```
/// use persona::outbound::memory::MemoryDatabase;
///
/// let db = MemoryDatabase::new();
/// let _registry = db.identity_registry();
/// let _people = db.person_information_store();
/// let _photos = db.profile_photo_store();
/// ```
#[derive(Clone, Default)]
pub struct MemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryDatabase {
    /// Create an empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identity registry backed by these tables.
    pub fn identity_registry(&self) -> InMemoryIdentityRegistry {
        InMemoryIdentityRegistry::new(Arc::clone(&self.tables))
    }

    /// Personal information store backed by these tables.
    pub fn person_information_store(&self) -> InMemoryResourceStore<PersonInformation> {
        InMemoryResourceStore::new(Arc::clone(&self.tables))
    }

    /// Profile photo store backed by these tables.
    pub fn profile_photo_store(&self) -> InMemoryResourceStore<ProfilePhoto> {
        InMemoryResourceStore::new(Arc::clone(&self.tables))
    }
}
