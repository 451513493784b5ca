//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use crate::domain::{
    AuthenticationService, IdentityId, OwnedResourceService, ProfilePhotoService, Role, Username,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::memory::MemoryDatabase;
use crate::test_support::{MutableClock, token_issuer};

/// `Authorization` header value carrying a token signed with the test settings.
pub fn bearer(clock: &Arc<MutableClock>, username: &Username, id: IdentityId, role: Role) -> String {
    let token = token_issuer(clock.clone())
        .issue(username, id, role)
        .expect("test token settings are complete");
    format!("Bearer {token}")
}

/// HTTP state wired to a fresh in-memory database.
pub fn test_state(clock: Arc<MutableClock>) -> HttpState {
    memory_state(&MemoryDatabase::new(), clock)
}

/// HTTP state wired to `db`, so tests can inspect what handlers persisted.
pub fn memory_state(db: &MemoryDatabase, clock: Arc<MutableClock>) -> HttpState {
    let tokens = token_issuer(clock);
    let accounts = Arc::new(AuthenticationService::new(
        Arc::new(db.identity_registry()),
        tokens.clone(),
    ));
    let people_store = Arc::new(db.person_information_store());
    let people = Arc::new(OwnedResourceService::new(people_store.clone()));
    let photos = Arc::new(ProfilePhotoService::new(
        Arc::new(db.profile_photo_store()),
        people_store,
    ));
    HttpState::new(
        tokens,
        HttpStatePorts {
            authentication: accounts.clone(),
            identities: accounts,
            person_information: people.clone(),
            person_information_query: people,
            profile_photos: photos.clone(),
            profile_photos_query: photos,
        },
    )
}
