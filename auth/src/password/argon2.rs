use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as PasswordHashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Upper bound on plaintext length accepted by [`PasswordHasher`].
///
/// Inputs longer than this are rejected before any hashing work is done.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id).
/// Work factors are the `argon2` crate defaults and cannot be changed per call.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with a fresh random salt, so hashing the same input twice
    /// yields two different PHC strings.
    ///
    /// # Errors
    /// * `TooLong` - Password is longer than [`MAX_PASSWORD_BYTES`]
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        Self::check_length(password)?;

        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// A mismatch is `Ok(false)`, never an error.
    ///
    /// # Errors
    /// * `InvalidHash` - Stored hash is not a valid PHC string
    /// * `VerificationFailed` - The primitive failed for another reason
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        if password.len() > MAX_PASSWORD_BYTES {
            return Ok(false);
        }

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(PasswordHashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }

    fn check_length(password: &str) -> Result<(), PasswordError> {
        if password.len() > MAX_PASSWORD_BYTES {
            Err(PasswordError::TooLong {
                max: MAX_PASSWORD_BYTES,
                actual: password.len(),
            })
        } else {
            Ok(())
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
