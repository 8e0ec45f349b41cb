//! Password hashing and verification using Argon2id

use crate::error::AuthError;
use argon2::{
    password_hash::{
        rand_core::OsRng, PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString,
    },
    Algorithm, Argon2, Params, Version,
};
use std::sync::atomic::{AtomicU64, Ordering};

/// Password hasher with configurable parameters
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    /// Digest verified when there is no stored one, so that path costs a full hash
    dummy_digest: Option<String>,
    verifications: AtomicU64,
}

impl PasswordHasher {
    /// Create hasher with default parameters (OWASP recommended)
    pub fn new() -> Self {
        // m=19MiB, t=2 iterations, p=1 lane
        Self::with_params(Params::default())
    }

    pub fn with_params(params: Params) -> Self {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

        let salt = SaltString::generate(&mut OsRng);
        let dummy_digest = match argon2.hash_password(b"dummy-password-never-matches", &salt) {
            Ok(digest) => Some(digest.to_string()),
            Err(e) => {
                tracing::error!("Failed to precompute dummy password digest: {:?}", e);
                None
            }
        };

        Self {
            argon2,
            dummy_digest,
            verifications: AtomicU64::new(0),
        }
    }

    /// Hash a password into a PHC string with a fresh random salt
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);

        let password_hash = self
            .argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| {
                tracing::error!("Failed to hash password: {:?}", e);
                AuthError::internal("Failed to hash password")
            })?
            .to_string();

        Ok(password_hash)
    }

    /// Verify a password against a stored digest.
    ///
    /// A digest that cannot be parsed simply fails verification.
    pub fn verify(&self, password: &str, hash: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::debug!("Failed to parse password hash: {:?}", e);
                return false;
            }
        };

        self.verifications.fetch_add(1, Ordering::Relaxed);
        self.argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Login check: a missing digest or a mismatch are both `PasswordMismatch`.
    ///
    /// Without a stored digest the password is still run against a dummy
    /// digest, so an unknown account takes as long as a wrong password.
    pub fn verify_credentials(&self, password: &str, hash: Option<&str>) -> Result<(), AuthError> {
        match hash {
            Some(hash) if self.verify(password, hash) => Ok(()),
            Some(_) => Err(AuthError::PasswordMismatch),
            None => {
                if let Some(dummy) = &self.dummy_digest {
                    self.verify(password, dummy);
                }
                Err(AuthError::PasswordMismatch)
            }
        }
    }

    /// Number of Argon2 verifications performed by this hasher
    pub fn verification_count(&self) -> u64 {
        self.verifications.load(Ordering::Relaxed)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "TestPassword123!";

        let hash = hasher.hash(password).unwrap();
        assert!(hasher.verify(password, &hash));
    }

    #[test]
    fn test_verify_fails_with_wrong_password() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("TestPassword123!").unwrap();

        assert!(!hasher.verify("WrongPassword", &hash));
    }

    #[test]
    fn test_malformed_digest_is_false() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify("TestPassword123!", "not-a-phc-string"));
        assert!(!hasher.verify("TestPassword123!", ""));
    }

    #[test]
    fn test_verify_credentials() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("TestPassword123!").unwrap();

        assert!(hasher.verify_credentials("TestPassword123!", Some(&hash)).is_ok());
        assert!(matches!(
            hasher.verify_credentials("nope", Some(&hash)),
            Err(AuthError::PasswordMismatch)
        ));
        assert!(matches!(
            hasher.verify_credentials("TestPassword123!", None),
            Err(AuthError::PasswordMismatch)
        ));
    }

    #[test]
    fn test_missing_digest_still_runs_argon2() {
        let hasher = PasswordHasher::new();
        assert!(hasher.dummy_digest.is_some());

        let before = hasher.verification_count();
        assert!(hasher.verify_credentials("TestPassword123!", None).is_err());
        assert_eq!(hasher.verification_count(), before + 1);
    }
}
