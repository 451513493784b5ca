//! Domain primitives, services and ports.
//!
//! Purpose: define strongly typed entities for identities and the records
//! they own, the credential and token primitives, and the services that
//! enforce authentication and ownership. Nothing here depends on actix-web;
//! adapters live under `inbound` and `outbound`.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Identity, Username, Role: account aggregate and its value objects.
//! - CredentialHasher, TokenIssuer: password digests and bearer tokens.
//! - AuthenticationService: registration, login and account administration.
//! - OwnedResourceService, require_owned: the ownership guard.
//! - PersonInformation, ProfilePhoto: owned record families.

pub mod auth;
pub mod authentication_service;
pub mod credentials;
pub mod error;
pub mod identity;
pub mod ownership;
pub mod person_information;
pub mod ports;
pub mod profile_photo;
pub mod token;

pub use self::auth::{CredentialValidationError, LoginCredentials, RegistrationCredentials};
pub use self::authentication_service::AuthenticationService;
pub use self::credentials::{CredentialError, CredentialHasher};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::identity::{
    Identity, IdentityId, IdentitySummary, IdentityValidationError, PasswordDigest, Role,
    Username,
};
pub use self::ownership::{OwnedResource, OwnedResourceService, ResourceId, require_owned};
pub use self::person_information::{
    Birthday, Email, Gender, PersonInformation, PersonInformationDraft,
    PersonInformationValidationError, PersonName, PersonalCode, PhoneNumber, PlaceOfResidence,
};
pub use self::profile_photo::{
    PhotoFileName, PhotoValidationError, ProfilePhoto, ProfilePhotoDraft, ProfilePhotoService,
};
pub use self::token::{AuthenticatedCaller, TokenError, TokenIssuer, TokenSettings};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use persona::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
