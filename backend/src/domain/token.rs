//! Bearer session tokens.
//!
//! Tokens are HS512-signed JWTs carrying the username (`name`), identity id
//! (`sub`) and role (`role`) alongside `iss`, `aud`, `iat` and `exp`. Nothing
//! is stored server-side; a token is valid exactly while its signature,
//! issuer, audience and expiry check out.
//!
//! Signing settings are read once into [`TokenSettings`] and kept raw. They
//! are checked on every call so a misconfigured deployment fails individual
//! requests with a configuration error instead of refusing to start.

use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use mockable::{Clock, Env};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use zeroize::Zeroizing;

use super::Error;
use super::identity::{IdentityId, Role, Username};

/// Environment variable holding the symmetric signing key.
pub const SIGNING_KEY_ENV: &str = "JWT_SIGNING_KEY";
/// Environment variable holding the token issuer.
pub const ISSUER_ENV: &str = "JWT_ISSUER";
/// Environment variable holding the token audience.
pub const AUDIENCE_ENV: &str = "JWT_AUDIENCE";
/// Environment variable holding the token lifetime in seconds.
pub const EXPIRATION_ENV: &str = "JWT_EXPIRATION_SECONDS";
/// Minimum signing key length in bytes.
pub const SIGNING_KEY_MIN_LEN: usize = 32;

const ALGORITHM: Algorithm = Algorithm::HS512;

/// Failures raised while issuing or validating tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("missing token setting: {name}")]
    MissingSetting { name: &'static str },
    #[error("signing key too short: need >= {min_len} bytes, got {length}")]
    KeyTooShort { length: usize, min_len: usize },
    #[error("{name} must be a positive number of seconds")]
    InvalidLifetime { name: &'static str },
    #[error("token could not be signed")]
    Signing,
    #[error("token is invalid")]
    Rejected,
    #[error("token has expired")]
    Expired,
}

impl TokenError {
    /// Whether the failure stems from configuration rather than the token.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MissingSetting { .. }
                | Self::KeyTooShort { .. }
                | Self::InvalidLifetime { .. }
                | Self::Signing
        )
    }
}

impl From<TokenError> for Error {
    fn from(value: TokenError) -> Self {
        if value.is_configuration() {
            Error::configuration(value.to_string())
        } else {
            Error::unauthorized(value.to_string())
        }
    }
}

/// Raw token signing settings.
///
/// # Examples
/// ```
/// use persona::domain::token::{TokenSettings, token_settings_from_env};
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|name| match name {
///     "JWT_SIGNING_KEY" => Some("0123456789abcdef0123456789abcdef".to_owned()),
///     "JWT_ISSUER" => Some("persona".to_owned()),
///     "JWT_AUDIENCE" => Some("persona-clients".to_owned()),
///     "JWT_EXPIRATION_SECONDS" => Some("900".to_owned()),
///     _ => None,
/// });
///
/// let settings = token_settings_from_env(&env);
/// assert_eq!(settings.issuer(), Some("persona"));
/// ```
#[derive(Clone, Default)]
pub struct TokenSettings {
    signing_key: Option<Zeroizing<String>>,
    issuer: Option<String>,
    audience: Option<String>,
    expiration_seconds: Option<String>,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenSettings")
            .field("signing_key", &self.signing_key.as_ref().map(|_| "<redacted>"))
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiration_seconds", &self.expiration_seconds)
            .finish()
    }
}

impl TokenSettings {
    /// Set the signing key.
    #[must_use]
    pub fn with_signing_key(mut self, key: impl Into<String>) -> Self {
        self.signing_key = Some(Zeroizing::new(key.into()));
        self
    }

    /// Set the issuer.
    #[must_use]
    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Set the audience.
    #[must_use]
    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    /// Set the token lifetime, as the decimal seconds string read from config.
    #[must_use]
    pub fn with_expiration_seconds(mut self, seconds: impl Into<String>) -> Self {
        self.expiration_seconds = Some(seconds.into());
        self
    }

    /// Configured issuer, if any.
    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref()
    }

    /// Configured audience, if any.
    pub fn audience(&self) -> Option<&str> {
        self.audience.as_deref()
    }

    fn resolve(&self) -> Result<ResolvedSettings<'_>, TokenError> {
        let key = required(self.signing_key.as_ref().map(|key| key.as_str()), SIGNING_KEY_ENV)?;
        if key.len() < SIGNING_KEY_MIN_LEN {
            return Err(TokenError::KeyTooShort {
                length: key.len(),
                min_len: SIGNING_KEY_MIN_LEN,
            });
        }
        let issuer = required(self.issuer.as_deref(), ISSUER_ENV)?;
        let audience = required(self.audience.as_deref(), AUDIENCE_ENV)?;
        let raw_ttl = required(self.expiration_seconds.as_deref(), EXPIRATION_ENV)?;
        let ttl = raw_ttl
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|seconds| *seconds > 0)
            .ok_or(TokenError::InvalidLifetime {
                name: EXPIRATION_ENV,
            })?;
        Ok(ResolvedSettings {
            key: key.as_bytes(),
            issuer,
            audience,
            ttl: Duration::seconds(i64::from(ttl)),
        })
    }
}

fn required<'a>(value: Option<&'a str>, name: &'static str) -> Result<&'a str, TokenError> {
    value
        .filter(|raw| !raw.trim().is_empty())
        .ok_or(TokenError::MissingSetting { name })
}

struct ResolvedSettings<'a> {
    key: &'a [u8],
    issuer: &'a str,
    audience: &'a str,
    ttl: Duration,
}

/// Read token settings from the environment without validating them.
pub fn token_settings_from_env<E: Env>(env: &E) -> TokenSettings {
    TokenSettings {
        signing_key: env.string(SIGNING_KEY_ENV).map(Zeroizing::new),
        issuer: env.string(ISSUER_ENV),
        audience: env.string(AUDIENCE_ENV),
        expiration_seconds: env.string(EXPIRATION_ENV),
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    name: String,
    sub: String,
    role: String,
    iss: String,
    aud: String,
    iat: i64,
    exp: i64,
}

/// Identity recovered from a validated bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCaller {
    pub identity_id: IdentityId,
    pub username: String,
    pub role: Role,
}

impl AuthenticatedCaller {
    /// Fail with `Forbidden` unless the caller holds `role`.
    pub fn require_role(&self, role: Role) -> Result<(), Error> {
        if self.role == role {
            Ok(())
        } else {
            Err(Error::forbidden(format!("{role} role required")))
        }
    }
}

/// Issues and validates bearer tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    settings: TokenSettings,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Create an issuer over raw settings and a clock.
    pub fn new(settings: TokenSettings, clock: Arc<dyn Clock>) -> Self {
        Self { settings, clock }
    }

    /// Sign a token for the given identity.
    pub fn issue(
        &self,
        username: &Username,
        identity_id: IdentityId,
        role: Role,
    ) -> Result<String, TokenError> {
        let settings = self.settings.resolve().inspect_err(log_configuration_error)?;
        let issued_at = self.clock.utc();
        let claims = Claims {
            name: username.as_str().to_owned(),
            sub: identity_id.to_string(),
            role: role.as_str().to_owned(),
            iss: settings.issuer.to_owned(),
            aud: settings.audience.to_owned(),
            iat: issued_at.timestamp(),
            exp: (issued_at + settings.ttl).timestamp(),
        };
        encode(
            &Header::new(ALGORITHM),
            &claims,
            &EncodingKey::from_secret(settings.key),
        )
        .map_err(|err| {
            error!(error = %err, "token signing failed");
            TokenError::Signing
        })
    }

    /// Check a token and recover the caller it was issued to.
    pub fn validate(&self, token: &str) -> Result<AuthenticatedCaller, TokenError> {
        let settings = self.settings.resolve().inspect_err(log_configuration_error)?;
        let mut validation = Validation::new(ALGORITHM);
        validation.set_issuer(&[settings.issuer]);
        validation.set_audience(&[settings.audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        // Expiry is checked against the injected clock with zero leeway.
        validation.validate_exp = false;
        validation.leeway = 0;

        let claims = decode::<Claims>(token, &DecodingKey::from_secret(settings.key), &validation)
            .map_err(|err| {
                debug!(error = %err, "token rejected");
                TokenError::Rejected
            })?
            .claims;

        if claims.exp <= self.clock.utc().timestamp() {
            return Err(TokenError::Expired);
        }
        let identity_id = claims.sub.parse().map_err(|_| TokenError::Rejected)?;
        let role = claims.role.parse().map_err(|_| TokenError::Rejected)?;
        Ok(AuthenticatedCaller {
            identity_id,
            username: claims.name,
            role,
        })
    }
}

fn log_configuration_error(err: &TokenError) {
    error!(error = %err, "token settings unusable");
}
