//! Password hashing and verification.
//!
//! Digests are HMAC-SHA-512 over the UTF-8 password bytes, keyed by a fresh
//! 128-byte random salt. The salt is the HMAC key; it is never mixed into the
//! message.

use hmac::{Hmac, Mac};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha512;
use subtle::ConstantTimeEq;

use super::Error;
use super::identity::PasswordDigest;

type HmacSha512 = Hmac<Sha512>;

/// Salt length in bytes; matches the SHA-512 block size.
pub const SALT_LEN: usize = 128;
/// Digest length in bytes.
pub const DIGEST_LEN: usize = 64;

// No password's HMAC under this key is all zeroes.
const DECOY_SALT: [u8; SALT_LEN] = [0x5c; SALT_LEN];
const DECOY_HASH: [u8; DIGEST_LEN] = [0; DIGEST_LEN];

/// Failures raised by [`CredentialHasher`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CredentialError {
    #[error("stored password hash and salt must not be empty")]
    EmptyStoredDigest,
    #[error("password digest key could not be constructed")]
    KeyConstruction,
}

impl From<CredentialError> for Error {
    fn from(value: CredentialError) -> Self {
        Error::invalid_input(value.to_string())
    }
}

/// Salted password hasher.
///
/// Stateless and safe to share between concurrent requests.
///
/// # Examples
/// ```
/// use persona::domain::CredentialHasher;
///
/// let hasher = CredentialHasher;
/// let digest = hasher.hash("Abcdef12!!34").expect("hash");
/// assert!(hasher.verify("Abcdef12!!34", digest.hash(), digest.salt()).expect("verify"));
/// assert!(!hasher.verify("Abcdef12!!35", digest.hash(), digest.salt()).expect("verify"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CredentialHasher;

impl CredentialHasher {
    /// Hash `plaintext` under a newly generated salt.
    pub fn hash(&self, plaintext: &str) -> Result<PasswordDigest, CredentialError> {
        let mut salt = vec![0_u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);
        let hash = digest(plaintext, &salt)?;
        PasswordDigest::from_parts(hash, salt).map_err(|_| CredentialError::KeyConstruction)
    }

    /// Check `plaintext` against a stored digest and salt.
    ///
    /// Returns `Ok(false)` on mismatch. The comparison runs in constant time
    /// with respect to the digest contents.
    pub fn verify(
        &self,
        plaintext: &str,
        stored_hash: &[u8],
        stored_salt: &[u8],
    ) -> Result<bool, CredentialError> {
        if stored_hash.is_empty() || stored_salt.is_empty() {
            return Err(CredentialError::EmptyStoredDigest);
        }
        let computed = digest(plaintext, stored_salt)?;
        Ok(computed.as_slice().ct_eq(stored_hash).into())
    }

    /// Run a full verification against a fixed digest and report a mismatch.
    ///
    /// Logins for unknown usernames call this so they cost the same HMAC as
    /// a wrong password.
    pub fn verify_decoy(&self, plaintext: &str) -> Result<bool, CredentialError> {
        self.verify(plaintext, &DECOY_HASH, &DECOY_SALT).map(|_| false)
    }
}

fn digest(plaintext: &str, key: &[u8]) -> Result<Vec<u8>, CredentialError> {
    let mut mac =
        HmacSha512::new_from_slice(key).map_err(|_| CredentialError::KeyConstruction)?;
    mac.update(plaintext.as_bytes());
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    const PASSWORD: &str = "Abcdef12!!34";

    #[fixture]
    fn hasher() -> CredentialHasher {
        CredentialHasher
    }

    #[rstest]
    fn digest_has_expected_shape(hasher: CredentialHasher) {
        let digest = hasher.hash(PASSWORD).expect("hash");
        assert_eq!(digest.hash().len(), DIGEST_LEN);
        assert_eq!(digest.salt().len(), SALT_LEN);
    }

    #[rstest]
    fn matching_password_verifies(hasher: CredentialHasher) {
        let digest = hasher.hash(PASSWORD).expect("hash");
        assert_eq!(hasher.verify(PASSWORD, digest.hash(), digest.salt()), Ok(true));
    }

    #[rstest]
    #[case("Abcdef12!!35")]
    #[case("abcdef12!!34")]
    #[case("")]
    fn other_passwords_do_not_verify(hasher: CredentialHasher, #[case] attempt: &str) {
        let digest = hasher.hash(PASSWORD).expect("hash");
        assert_eq!(hasher.verify(attempt, digest.hash(), digest.salt()), Ok(false));
    }

    #[rstest]
    fn hashing_twice_uses_fresh_salt(hasher: CredentialHasher) {
        let first = hasher.hash(PASSWORD).expect("hash");
        let second = hasher.hash(PASSWORD).expect("hash");
        assert_ne!(first.salt(), second.salt());
        assert_ne!(first.hash(), second.hash());
    }

    #[rstest]
    #[case(PASSWORD)]
    #[case("")]
    fn decoy_never_verifies(hasher: CredentialHasher, #[case] attempt: &str) {
        assert_eq!(hasher.verify_decoy(attempt), Ok(false));
    }

    #[rstest]
    fn salt_keys_the_mac(hasher: CredentialHasher) {
        let digest = hasher.hash(PASSWORD).expect("hash");
        let mut other_salt = digest.salt().to_vec();
        if let Some(first) = other_salt.first_mut() {
            *first ^= 0xFF;
        }
        assert_eq!(hasher.verify(PASSWORD, digest.hash(), &other_salt), Ok(false));
    }

    #[rstest]
    fn empty_plaintext_is_hashable(hasher: CredentialHasher) {
        let digest = hasher.hash("").expect("hash");
        assert_eq!(hasher.verify("", digest.hash(), digest.salt()), Ok(true));
    }

    #[rstest]
    #[case(&[], &[1_u8; SALT_LEN])]
    #[case(&[1_u8; DIGEST_LEN], &[])]
    fn empty_stored_parts_are_invalid_input(
        hasher: CredentialHasher,
        #[case] hash: &[u8],
        #[case] salt: &[u8],
    ) {
        let err = hasher.verify(PASSWORD, hash, salt).expect_err("must fail");
        assert_eq!(err, CredentialError::EmptyStoredDigest);
        assert_eq!(Error::from(err).code(), crate::domain::ErrorCode::InvalidInput);
    }

    #[rstest]
    fn truncated_stored_hash_does_not_verify(hasher: CredentialHasher) {
        let digest = hasher.hash(PASSWORD).expect("hash");
        let truncated = digest.hash().get(..32).expect("digest longer than 32 bytes");
        assert_eq!(hasher.verify(PASSWORD, truncated, digest.salt()), Ok(false));
    }
}
