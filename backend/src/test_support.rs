//! Shared test doubles for unit tests (in `src/`) and integration tests (in
//! `tests/`). Compiled for tests or with the `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;

use crate::domain::credentials::{DIGEST_LEN, SALT_LEN};
use crate::domain::ports::IdentityRegistry;
use crate::domain::token::{TokenIssuer, TokenSettings};
use crate::domain::{
    Birthday, Email, Gender, Identity, IdentityId, PasswordDigest, PersonInformationDraft,
    PersonInformationValidationError, PersonName, PersonalCode, PhoneNumber, PlaceOfResidence,
    Role, Username,
};
use crate::outbound::memory::MemoryDatabase;

/// Signing key long enough for HS512 in tests.
pub const TEST_SIGNING_KEY: &str = "test-signing-key-0123456789-abcdefghij";
/// Issuer used by [`token_settings`].
pub const TEST_ISSUER: &str = "persona-test";
/// Audience used by [`token_settings`].
pub const TEST_AUDIENCE: &str = "persona-test-clients";
/// Token lifetime used by [`token_settings`].
pub const TEST_TTL_SECONDS: i64 = 900;

/// Clock whose time only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Default for MutableClock {
    fn default() -> Self {
        Self::new(fixture_timestamp())
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Fixed instant the test clocks start from.
pub fn fixture_timestamp() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53) {
        chrono::LocalResult::Single(value) => value,
        _ => panic!("fixture timestamp is unambiguous"),
    }
}

/// Complete, valid token settings.
pub fn token_settings() -> TokenSettings {
    TokenSettings::default()
        .with_signing_key(TEST_SIGNING_KEY)
        .with_issuer(TEST_ISSUER)
        .with_audience(TEST_AUDIENCE)
        .with_expiration_seconds(TEST_TTL_SECONDS.to_string())
}

/// Token issuer over [`token_settings`] driven by `clock`.
pub fn token_issuer(clock: Arc<MutableClock>) -> TokenIssuer {
    TokenIssuer::new(token_settings(), clock)
}

/// Valid personal information with the given first name.
///
/// # Panics
/// Panics when `first_name` is not a valid name.
pub fn person_information_draft(first_name: &str) -> PersonInformationDraft {
    fn valid<T>(result: Result<T, PersonInformationValidationError>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => panic!("fixture field rejected: {err}"),
        }
    }

    PersonInformationDraft {
        first_name: valid(PersonName::new(first_name, "firstName")),
        last_name: valid(PersonName::new("Smith", "lastName")),
        gender: Gender::Female,
        birthday: valid(Birthday::new("01-01-1990")),
        personal_code: valid(PersonalCode::new("49001011234")),
        phone_number: valid(PhoneNumber::new("+37060000000")),
        email: valid(Email::new("alice@example.com")),
        place_of_residence: valid(PlaceOfResidence::new("Vilnius", "Main", 1, Some(2))),
    }
}

/// Store an ordinary identity in `db` and return its id.
///
/// Records may only be written for identities that exist, so fixtures that
/// create records start here. The stored digest matches no password.
///
/// # Panics
/// Panics when the registry rejects the identity.
pub async fn enrol_identity(db: &MemoryDatabase) -> IdentityId {
    let id = IdentityId::random();
    let name = id.as_uuid().simple().to_string();
    let identity = match (
        Username::new(&name[..16]),
        PasswordDigest::from_parts(vec![1; DIGEST_LEN], vec![2; SALT_LEN]),
    ) {
        (Ok(username), Ok(digest)) => Identity::new(id, username, digest, Role::User),
        _ => panic!("fixture identity is valid"),
    };
    if let Err(err) = db.identity_registry().insert(&identity).await {
        panic!("fixture identity rejected: {err}");
    }
    id
}
