//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AuthenticationCommand, IdentityAdministration, OwnedResourceCommand, OwnedResourceQuery,
};
use crate::domain::{PersonInformation, ProfilePhoto, TokenIssuer};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub authentication: Arc<dyn AuthenticationCommand>,
    pub identities: Arc<dyn IdentityAdministration>,
    pub person_information: Arc<dyn OwnedResourceCommand<PersonInformation>>,
    pub person_information_query: Arc<dyn OwnedResourceQuery<PersonInformation>>,
    pub profile_photos: Arc<dyn OwnedResourceCommand<ProfilePhoto>>,
    pub profile_photos_query: Arc<dyn OwnedResourceQuery<ProfilePhoto>>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub tokens: TokenIssuer,
    pub authentication: Arc<dyn AuthenticationCommand>,
    pub identities: Arc<dyn IdentityAdministration>,
    pub person_information: Arc<dyn OwnedResourceCommand<PersonInformation>>,
    pub person_information_query: Arc<dyn OwnedResourceQuery<PersonInformation>>,
    pub profile_photos: Arc<dyn OwnedResourceCommand<ProfilePhoto>>,
    pub profile_photos_query: Arc<dyn OwnedResourceQuery<ProfilePhoto>>,
}

impl HttpState {
    /// Construct state from the token issuer used by the bearer extractor and
    /// the ports bundle.
    pub fn new(tokens: TokenIssuer, ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            authentication,
            identities,
            person_information,
            person_information_query,
            profile_photos,
            profile_photos_query,
        } = ports;
        Self {
            tokens,
            authentication,
            identities,
            person_information,
            person_information_query,
            profile_photos,
            profile_photos_query,
        }
    }
}
