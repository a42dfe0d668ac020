use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Well-formed Argon2id hash of default cost that no password produces.
/// Compared against when a login is unknown so that the miss path takes as
/// long as a real wrong-password comparison.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$AAAAAAAAAAAAAAAAAAAAAA$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Password hashing implementation (Argon2id with per-password random salt).
#[derive(Debug, Clone, Default)]
pub struct PasswordHasher;

impl PasswordHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password for storage.
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and
    /// hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// # Errors
    /// * `VerificationFailed` - The stored hash is not a valid PHC string
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("invalid password hash: {}", e))
        })?;

        let argon2 = Argon2::default();

        Ok(argon2
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Verify a password against a stored hash when one exists, or against a
    /// fixed dummy hash when it doesn't.
    ///
    /// An observer timing the credential check cannot tell "unknown login"
    /// from "known login, wrong password": both paths run a full Argon2
    /// comparison of the same cost. The dummy path always reports a
    /// mismatch.
    pub fn verify_or_dummy(
        &self,
        password: &str,
        stored_hash: Option<&str>,
    ) -> Result<bool, PasswordError> {
        match stored_hash {
            Some(hash) => self.verify(password, hash),
            None => {
                self.verify(password, DUMMY_HASH)?;
                Ok(false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hasher = PasswordHasher::new();
        let password = "my_secure_password";

        let hash = hasher.hash(password).expect("Failed to hash password");

        assert!(hasher
            .verify(password, &hash)
            .expect("Failed to verify password"));
        assert!(!hasher
            .verify("wrong_password", &hash)
            .expect("Failed to verify password"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let hasher = PasswordHasher::new();
        let a = hasher.hash("password").unwrap();
        let b = hasher.hash("password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = PasswordHasher::new();
        let result = hasher.verify("password", "invalid_hash");
        assert!(result.is_err());
    }

    #[test]
    fn test_verify_or_dummy_with_stored_hash() {
        let hasher = PasswordHasher::new();
        let hash = hasher.hash("password").unwrap();

        assert!(hasher.verify_or_dummy("password", Some(&hash)).unwrap());
        assert!(!hasher.verify_or_dummy("nope", Some(&hash)).unwrap());
    }

    #[test]
    fn test_verify_or_dummy_without_stored_hash_is_always_false() {
        let hasher = PasswordHasher::new();
        assert!(!hasher.verify_or_dummy("anything", None).unwrap());
        assert!(!hasher.verify_or_dummy("", None).unwrap());
    }

    #[test]
    fn test_dummy_hash_is_well_formed() {
        // The dummy must parse as a real PHC string, otherwise the miss path
        // would error out (and return early) instead of paying for a full
        // comparison.
        assert!(PasswordHash::new(DUMMY_HASH).is_ok());
    }
}
