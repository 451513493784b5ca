//! Driving ports for account registration, login and administration.
//!
//! Inbound adapters call these traits without knowing the backing
//! infrastructure, which keeps HTTP handler tests deterministic: they can
//! substitute a mock instead of wiring persistence.

use async_trait::async_trait;

use crate::domain::{
    Error, IdentityId, IdentitySummary, LoginCredentials, RegistrationCredentials,
};

/// Self-service account use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthenticationCommand: Send + Sync {
    /// Create an identity with the ordinary role.
    async fn register(&self, credentials: &RegistrationCredentials) -> Result<IdentityId, Error>;

    /// Check credentials and return a signed bearer token.
    async fn login(&self, credentials: &LoginCredentials) -> Result<String, Error>;
}

/// Identity management reserved for the elevated role.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityAdministration: Send + Sync {
    /// Summaries of every identity.
    async fn list_identities(&self) -> Result<Vec<IdentitySummary>, Error>;

    /// Summary of one identity.
    async fn get_identity(&self, id: &IdentityId) -> Result<IdentitySummary, Error>;

    /// Remove an identity and everything it owns.
    async fn delete_identity(&self, id: &IdentityId) -> Result<(), Error>;
}
