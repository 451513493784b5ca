//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod authentication;
mod identity_registry;
mod owned_resource_store;
mod owned_resources;

#[cfg(test)]
pub use authentication::{MockAuthenticationCommand, MockIdentityAdministration};
pub use authentication::{AuthenticationCommand, IdentityAdministration};
#[cfg(test)]
pub use identity_registry::MockIdentityRegistry;
pub use identity_registry::{IdentityPersistenceError, IdentityRegistry};
#[cfg(test)]
pub use owned_resource_store::MockOwnedResourceStore;
pub use owned_resource_store::{OwnedResourceStore, ResourceStoreError};
pub use owned_resources::{OwnedResourceCommand, OwnedResourceQuery};
