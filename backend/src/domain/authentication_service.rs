//! Account domain service.
//!
//! Implements the registration, login and administration driving ports on top
//! of an [`IdentityRegistry`], the [`CredentialHasher`] and the
//! [`TokenIssuer`].

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    AuthenticationCommand, IdentityAdministration, IdentityPersistenceError, IdentityRegistry,
};
use crate::domain::{
    CredentialHasher, Error, Identity, IdentityId, IdentitySummary, LoginCredentials,
    RegistrationCredentials, Role, TokenIssuer,
};

/// Message shared by every failed login so callers cannot probe usernames.
const INVALID_CREDENTIALS: &str = "invalid username or password";

fn map_registry_error(error: IdentityPersistenceError) -> Error {
    match error {
        IdentityPersistenceError::UniqueViolation { .. } => {
            Error::duplicate_identity("username is already taken")
        }
        IdentityPersistenceError::Connection { message } => {
            Error::persistence(format!("identity registry unavailable: {message}"))
        }
        IdentityPersistenceError::Query { message } => {
            Error::persistence(format!("identity registry error: {message}"))
        }
    }
}

/// Registration, login and identity administration.
pub struct AuthenticationService<R> {
    registry: Arc<R>,
    hasher: CredentialHasher,
    tokens: TokenIssuer,
}

impl<R> Clone for AuthenticationService<R> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            hasher: self.hasher,
            tokens: self.tokens.clone(),
        }
    }
}

impl<R: IdentityRegistry> AuthenticationService<R> {
    /// Compose the service from its collaborators.
    pub fn new(registry: Arc<R>, tokens: TokenIssuer) -> Self {
        Self {
            registry,
            hasher: CredentialHasher,
            tokens,
        }
    }

    /// Create an identity with the elevated role.
    ///
    /// Registration over HTTP only ever yields ordinary identities; the server
    /// bootstrap uses this to provision the first administrator.
    pub async fn provision_admin(
        &self,
        credentials: &RegistrationCredentials,
    ) -> Result<IdentityId, Error> {
        self.enroll(credentials, Role::Admin).await
    }

    async fn enroll(
        &self,
        credentials: &RegistrationCredentials,
        role: Role,
    ) -> Result<IdentityId, Error> {
        let username = credentials.username();
        let existing = self
            .registry
            .find_by_username(username.as_str())
            .await
            .map_err(map_registry_error)?;
        if existing.is_some() {
            warn!(username = %username, "registration rejected: username taken");
            return Err(Error::duplicate_identity("username is already taken"));
        }

        let digest = self.hasher.hash(credentials.password())?;
        let identity = Identity::new(IdentityId::random(), username.clone(), digest, role);
        self.registry
            .insert(&identity)
            .await
            .map_err(map_registry_error)?;

        info!(identity_id = %identity.id(), username = %username, role = %role, "identity registered");
        Ok(identity.id())
    }

    async fn require_identity(&self, id: &IdentityId) -> Result<Identity, Error> {
        self.registry
            .find_by_id(id)
            .await
            .map_err(map_registry_error)?
            .ok_or_else(|| Error::not_found(format!("identity {id} not found")))
    }
}

#[async_trait]
impl<R: IdentityRegistry> AuthenticationCommand for AuthenticationService<R> {
    async fn register(&self, credentials: &RegistrationCredentials) -> Result<IdentityId, Error> {
        self.enroll(credentials, Role::User).await
    }

    async fn login(&self, credentials: &LoginCredentials) -> Result<String, Error> {
        let Some(identity) = self
            .registry
            .find_by_username(credentials.username())
            .await
            .map_err(map_registry_error)?
        else {
            self.hasher.verify_decoy(credentials.password())?;
            warn!(username = credentials.username(), "login failed: unknown username");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        };

        let digest = identity.digest();
        if !self
            .hasher
            .verify(credentials.password(), digest.hash(), digest.salt())?
        {
            warn!(identity_id = %identity.id(), "login failed: password mismatch");
            return Err(Error::invalid_credentials(INVALID_CREDENTIALS));
        }

        let token = self
            .tokens
            .issue(identity.username(), identity.id(), identity.role())?;
        info!(identity_id = %identity.id(), role = %identity.role(), "login succeeded");
        Ok(token)
    }
}

#[async_trait]
impl<R: IdentityRegistry> IdentityAdministration for AuthenticationService<R> {
    async fn list_identities(&self) -> Result<Vec<IdentitySummary>, Error> {
        let identities = self.registry.list().await.map_err(map_registry_error)?;
        Ok(identities.iter().map(IdentitySummary::from).collect())
    }

    async fn get_identity(&self, id: &IdentityId) -> Result<IdentitySummary, Error> {
        let identity = self.require_identity(id).await?;
        Ok(IdentitySummary::from(&identity))
    }

    async fn delete_identity(&self, id: &IdentityId) -> Result<(), Error> {
        let identity = self.require_identity(id).await?;
        self.registry
            .delete(&identity.id())
            .await
            .map_err(map_registry_error)?;
        info!(identity_id = %id, "identity deleted with owned records");
        Ok(())
    }
}

#[cfg(test)]
#[path = "authentication_service_tests.rs"]
mod tests;
