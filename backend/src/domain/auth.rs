//! Login and registration inputs.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate raw strings before a handler talks to a service.

use zeroize::Zeroizing;

use super::identity::{IdentityValidationError, Username};

/// Minimum password length in characters.
pub const PASSWORD_MIN: usize = 12;
/// Maximum password length in characters.
pub const PASSWORD_MAX: usize = 100;
/// Special characters a password may contain.
pub const PASSWORD_SPECIALS: &str = "@$!%*?&";
/// Characters required from each class (lowercase, uppercase, digit, special).
pub const PASSWORD_CLASS_MIN: usize = 2;

/// Validation failures for login and registration payloads.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialValidationError {
    #[error("username must not be empty")]
    EmptyUsername,
    #[error("password must not be empty")]
    EmptyPassword,
    #[error(transparent)]
    Username(#[from] IdentityValidationError),
    #[error("password must be between {min} and {max} characters")]
    PasswordLength { min: usize, max: usize },
    #[error("password may only contain letters, digits and @$!%*?&")]
    PasswordCharacters,
    #[error(
        "password must contain at least two lowercase letters, two uppercase letters, two digits and two of @$!%*?&"
    )]
    PasswordComposition,
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("password must differ from the username")]
    PasswordMatchesUsername,
}

impl CredentialValidationError {
    /// Request field the failure refers to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::Username(_) => "userName",
            Self::PasswordMismatch => "password2",
            Self::EmptyPassword => "password",
            Self::PasswordLength { .. }
            | Self::PasswordCharacters
            | Self::PasswordComposition
            | Self::PasswordMatchesUsername => "password1",
        }
    }

    /// Machine-readable reason.
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyUsername | Self::EmptyPassword => "empty",
            Self::Username(IdentityValidationError::UsernameLength { .. })
            | Self::PasswordLength { .. } => "length",
            Self::Username(_) | Self::PasswordCharacters => "characters",
            Self::PasswordComposition => "composition",
            Self::PasswordMismatch => "mismatch",
            Self::PasswordMatchesUsername => "matches_username",
        }
    }
}

/// Validated login credentials.
///
/// ## Invariants
/// - `username` is trimmed and must not be empty after trimming.
/// - `password` must be non-empty but keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use persona::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" alice1234 ", "AbCdef12!!34").unwrap();
/// assert_eq!(creds.username(), "alice1234");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw username/password inputs.
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, CredentialValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(CredentialValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Username used for the lookup.
    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    /// Password provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Validated registration request.
///
/// # Examples
/// ```
/// use persona::domain::RegistrationCredentials;
///
/// let ok = RegistrationCredentials::try_from_parts("alice1234", "AbCdef12!!34", "AbCdef12!!34");
/// assert!(ok.is_ok());
/// let weak = RegistrationCredentials::try_from_parts("alice1234", "abcdefghijkl", "abcdefghijkl");
/// assert!(weak.is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl RegistrationCredentials {
    /// Validate a username and the password typed twice.
    pub fn try_from_parts(
        username: &str,
        password1: &str,
        password2: &str,
    ) -> Result<Self, CredentialValidationError> {
        if username.trim().is_empty() {
            return Err(CredentialValidationError::EmptyUsername);
        }
        let username = Username::new(username)?;
        check_password_policy(password1)?;
        if password1 != password2 {
            return Err(CredentialValidationError::PasswordMismatch);
        }
        if password1 == username.as_str() {
            return Err(CredentialValidationError::PasswordMatchesUsername);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password1.to_owned()),
        })
    }

    /// Requested username.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Chosen password.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[derive(Default)]
struct ClassCounts {
    lower: usize,
    upper: usize,
    digit: usize,
    special: usize,
}

fn check_password_policy(password: &str) -> Result<(), CredentialValidationError> {
    let length = password.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&length) {
        return Err(CredentialValidationError::PasswordLength {
            min: PASSWORD_MIN,
            max: PASSWORD_MAX,
        });
    }

    let mut counts = ClassCounts::default();
    for c in password.chars() {
        match c {
            'a'..='z' => counts.lower += 1,
            'A'..='Z' => counts.upper += 1,
            '0'..='9' => counts.digit += 1,
            c if PASSWORD_SPECIALS.contains(c) => counts.special += 1,
            _ => return Err(CredentialValidationError::PasswordCharacters),
        }
    }
    let classes = [counts.lower, counts.upper, counts.digit, counts.special];
    if classes.iter().any(|count| *count < PASSWORD_CLASS_MIN) {
        return Err(CredentialValidationError::PasswordComposition);
    }
    Ok(())
}
