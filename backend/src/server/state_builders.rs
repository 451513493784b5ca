//! Builders wiring domain services over the configured persistence adapters.

use std::sync::Arc;

use mockable::{Clock, DefaultClock, DefaultEnv};
use persona::domain::token::token_settings_from_env;
use persona::domain::{
    AuthenticationService, Error, OwnedResourceService, ProfilePhotoService,
    RegistrationCredentials, TokenIssuer,
};
use persona::inbound::http::state::{HttpState, HttpStatePorts};
use persona::outbound::memory::InMemoryIdentityRegistry;
use tracing::{info, warn};

use super::ServerConfig;

/// Token issuer over the `JWT_*` environment and the system clock.
///
/// Settings are validated on first use so a missing key fails logins rather
/// than startup.
pub fn build_token_issuer() -> TokenIssuer {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    TokenIssuer::new(token_settings_from_env(&DefaultEnv::new()), clock)
}

fn build_accounts(config: &ServerConfig) -> Arc<AuthenticationService<InMemoryIdentityRegistry>> {
    Arc::new(AuthenticationService::new(
        Arc::new(config.database.identity_registry()),
        config.tokens.clone(),
    ))
}

/// Assemble the HTTP state from the database and token issuer in `config`.
pub fn build_http_state(config: &ServerConfig) -> HttpState {
    let accounts = build_accounts(config);
    let people_store = Arc::new(config.database.person_information_store());
    let people = Arc::new(OwnedResourceService::new(Arc::clone(&people_store)));
    let photos = Arc::new(ProfilePhotoService::new(
        Arc::new(config.database.profile_photo_store()),
        people_store,
    ));

    HttpState::new(
        config.tokens.clone(),
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

/// Create the startup administrator.
///
/// Failures are logged and otherwise ignored so a bad bootstrap account never
/// keeps the server from starting.
pub async fn provision_admin(config: &ServerConfig, user_name: &str, password: &str) {
    let outcome = async {
        let credentials = RegistrationCredentials::try_from_parts(user_name, password, password)
            .map_err(|err| Error::invalid_input(err.to_string()))?;
        build_accounts(config).provision_admin(&credentials).await
    }
    .await;

    match outcome {
        Ok(id) => info!(identity_id = %id, "administrator provisioned"),
        Err(error) => warn!(code = ?error.code(), error = %error.message(), "administrator not provisioned"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use env_lock::lock_env;
    use persona::domain::ports::IdentityRegistry;
    use persona::domain::token::{AUDIENCE_ENV, EXPIRATION_ENV, ISSUER_ENV, SIGNING_KEY_ENV};
    use persona::domain::{IdentityId, Role, Username};
    use persona::test_support::{
        MutableClock, TEST_AUDIENCE, TEST_ISSUER, TEST_SIGNING_KEY, token_settings,
    };
    use rstest::rstest;
    use std::net::SocketAddr;

    fn config() -> ServerConfig {
        let tokens = TokenIssuer::new(token_settings(), Arc::new(MutableClock::default()));
        ServerConfig::new(tokens, SocketAddr::from(([127, 0, 0, 1], 0)))
    }

    #[rstest]
    #[tokio::test]
    async fn provisioned_admin_is_stored_with_elevated_role() {
        let config = config();
        provision_admin(&config, "operator01", "AbCdef12!!34").await;

        let stored = config
            .database()
            .identity_registry()
            .find_by_username("operator01")
            .await
            .expect("lookup")
            .expect("admin stored");
        assert_eq!(stored.role(), Role::Admin);
    }

    #[rstest]
    #[tokio::test]
    async fn weak_admin_password_is_skipped() {
        let config = config();
        provision_admin(&config, "operator01", "weak").await;

        let registry = config.database().identity_registry();
        assert!(registry.list().await.expect("list").is_empty());
    }

    #[rstest]
    fn token_issuer_reads_the_process_environment() {
        let _guard = lock_env([
            (SIGNING_KEY_ENV, Some(TEST_SIGNING_KEY.to_owned())),
            (ISSUER_ENV, Some(TEST_ISSUER.to_owned())),
            (AUDIENCE_ENV, Some(TEST_AUDIENCE.to_owned())),
            (EXPIRATION_ENV, Some("900".to_owned())),
        ]);

        let issuer = build_token_issuer();
        let identity_id = IdentityId::random();
        let username = Username::new("alice1234").expect("username");
        let token = issuer
            .issue(&username, identity_id, Role::User)
            .expect("issue");
        let caller = issuer.validate(&token).expect("validate");
        assert_eq!(caller.identity_id, identity_id);
    }

    #[rstest]
    fn token_issuer_without_signing_key_fails_on_use() {
        let _guard = lock_env([
            (SIGNING_KEY_ENV, None::<String>),
            (ISSUER_ENV, Some(TEST_ISSUER.to_owned())),
            (AUDIENCE_ENV, Some(TEST_AUDIENCE.to_owned())),
            (EXPIRATION_ENV, Some("900".to_owned())),
        ]);

        let username = Username::new("alice1234").expect("username");
        let err = build_token_issuer()
            .issue(&username, IdentityId::random(), Role::User)
            .expect_err("missing key");
        assert!(err.is_configuration());
    }
}
