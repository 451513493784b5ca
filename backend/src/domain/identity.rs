//! Account identity model.
//!
//! An [`Identity`] is created once at registration and never mutated. Its
//! [`PasswordDigest`] keeps the HMAC output and the salt that keyed it
//! together so neither can be stored or replaced alone.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Minimum username length in characters.
pub const USERNAME_MIN: usize = 8;
/// Maximum username length in characters.
pub const USERNAME_MAX: usize = 20;

/// Validation errors raised while building identity values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityValidationError {
    #[error("identity id must be a valid UUID")]
    InvalidId,
    #[error("username must be between {min} and {max} characters")]
    UsernameLength { min: usize, max: usize },
    #[error("username may only contain ASCII letters and digits")]
    UsernameCharacters,
    #[error("role must be `User` or `Admin`")]
    UnknownRole,
    #[error("password digest and salt must not be empty")]
    EmptyDigest,
}

/// Stable identity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = String, format = Uuid)]
pub struct IdentityId(Uuid);

impl IdentityId {
    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for IdentityId {
    type Err = IdentityValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| IdentityValidationError::InvalidId)
    }
}

/// Account username: 8–20 ASCII letters or digits.
///
/// # Examples
/// ```
/// use persona::domain::Username;
///
/// assert!(Username::new("alice1234").is_ok());
/// assert!(Username::new("alice").is_err());
/// assert!(Username::new("alice_1234").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Validate and construct a username.
    pub fn new(value: impl Into<String>) -> Result<Self, IdentityValidationError> {
        let value = value.into();
        let length = value.chars().count();
        if !(USERNAME_MIN..=USERNAME_MAX).contains(&length) {
            return Err(IdentityValidationError::UsernameLength {
                min: USERNAME_MIN,
                max: USERNAME_MAX,
            });
        }
        if !value.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(IdentityValidationError::UsernameCharacters);
        }
        Ok(Self(value))
    }

    /// Borrow the username.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = IdentityValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Authorization role carried by an identity and its tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Role {
    /// Ordinary account; manages its own records.
    User,
    /// Elevated account; administers identities.
    Admin,
}

impl Role {
    /// Claim value written into tokens.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = IdentityValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" => Ok(Self::User),
            "Admin" => Ok(Self::Admin),
            _ => Err(IdentityValidationError::UnknownRole),
        }
    }
}

/// HMAC-SHA-512 output plus the salt used as its key.
///
/// `Debug` never prints the bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    hash: Vec<u8>,
    salt: Vec<u8>,
}

impl PasswordDigest {
    /// Reassemble a digest loaded from storage.
    pub fn from_parts(hash: Vec<u8>, salt: Vec<u8>) -> Result<Self, IdentityValidationError> {
        if hash.is_empty() || salt.is_empty() {
            return Err(IdentityValidationError::EmptyDigest);
        }
        Ok(Self { hash, salt })
    }

    /// Stored digest bytes.
    pub fn hash(&self) -> &[u8] {
        &self.hash
    }

    /// Salt bytes that keyed the digest.
    pub fn salt(&self) -> &[u8] {
        &self.salt
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordDigest")
            .field("hash", &format_args!("<{} bytes>", self.hash.len()))
            .field("salt", &format_args!("<{} bytes>", self.salt.len()))
            .finish()
    }
}

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: IdentityId,
    username: Username,
    digest: PasswordDigest,
    role: Role,
}

impl Identity {
    /// Assemble an identity from validated parts.
    pub fn new(id: IdentityId, username: Username, digest: PasswordDigest, role: Role) -> Self {
        Self {
            id,
            username,
            digest,
            role,
        }
    }

    /// Identifier.
    pub fn id(&self) -> IdentityId {
        self.id
    }

    /// Username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Stored credential digest.
    pub fn digest(&self) -> &PasswordDigest {
        &self.digest
    }

    /// Role.
    pub fn role(&self) -> Role {
        self.role
    }
}

/// Identity view safe to hand to administrators; never carries credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IdentitySummary {
    pub id: IdentityId,
    #[schema(value_type = String, example = "alice1234")]
    pub user_name: Username,
    pub role: Role,
}

impl From<&Identity> for IdentitySummary {
    fn from(value: &Identity) -> Self {
        Self {
            id: value.id,
            user_name: value.username.clone(),
            role: value.role,
        }
    }
}
