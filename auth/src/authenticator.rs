use std::str::FromStr;

use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::CredentialSecret;
use crate::jwt::TokenCodec;
use crate::jwt::TokenError;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Authentication coordinator combining password verification and token issuance.
///
/// Holds no per-user state; safe to share behind an `Arc` across requests.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    token_codec: TokenCodec,
    decoy_hash: Option<String>,
}

/// Result of successful authentication.
#[derive(Debug)]
pub struct AuthenticationResult {
    /// Signed session token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Token error: {0}")]
    TokenError(#[from] TokenError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `secret` - Credential secret used to sign session tokens
    pub fn new(secret: CredentialSecret) -> Self {
        let password_hasher = PasswordHasher::new();
        let decoy_hash = password_hasher.hash(DECOY_PASSWORD).ok();

        Self {
            password_hasher,
            token_codec: TokenCodec::new(secret),
            decoy_hash,
        }
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Password too long or hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Run one password verification against a fixed decoy hash.
    ///
    /// Lets a lookup miss cost the same as a wrong password. The outcome is
    /// discarded.
    pub fn verify_decoy(&self, password: &str) {
        if let Some(decoy_hash) = &self.decoy_hash {
            let _ = self.password_hasher.verify(password, decoy_hash);
        }
    }

    /// Verify credentials and issue a session token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `identity` - Identity to place in the token
    /// * `issued_at` - Issuance instant
    /// * `ttl` - Token lifetime
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is unusable
    /// * `TokenError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        identity: impl ToString,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.token_codec.issue(identity, issued_at, ttl)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a session token without password verification.
    pub fn issue_token(
        &self,
        identity: impl ToString,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        self.token_codec.issue(identity, issued_at, ttl)
    }

    /// Validate a session token and return the identity it carries.
    ///
    /// # Errors
    /// * `TokenError` - Token malformed, forged, signed with another algorithm,
    ///   or expired
    pub fn validate_token<I: FromStr>(&self, token: &str) -> Result<I, TokenError> {
        self.token_codec.verify(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn authenticator() -> Authenticator {
        Authenticator::new(CredentialSecret::new("test_secret_key_at_least_32_bytes!").unwrap())
    }

    #[test]
    fn test_authenticate_success() {
        let authenticator = authenticator();

        let password = "my_password";
        let hash = authenticator
            .hash_password(password)
            .expect("Failed to hash password");

        let result = authenticator
            .authenticate(password, &hash, "user123", Utc::now(), Duration::days(7))
            .expect("Authentication failed");

        assert!(!result.access_token.is_empty());

        let identity: String = authenticator
            .validate_token(&result.access_token)
            .expect("Token validation failed");
        assert_eq!(identity, "user123");
    }

    #[test]
    fn test_authenticate_invalid_password() {
        let authenticator = authenticator();

        let hash = authenticator
            .hash_password("my_password")
            .expect("Failed to hash password");

        let result = authenticator.authenticate(
            "wrong_password",
            &hash,
            "user123",
            Utc::now(),
            Duration::days(7),
        );
        assert!(matches!(
            result,
            Err(AuthenticationError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_authenticate_with_corrupt_hash() {
        let result = authenticator().authenticate(
            "my_password",
            "not-a-phc-string",
            "user123",
            Utc::now(),
            Duration::days(7),
        );
        assert!(matches!(
            result,
            Err(AuthenticationError::PasswordError(PasswordError::InvalidHash(_)))
        ));
    }

    #[test]
    fn test_decoy_hash_is_a_usable_hash() {
        let authenticator = authenticator();
        let decoy_hash = authenticator.decoy_hash.as_deref().unwrap();

        assert!(decoy_hash.starts_with("$argon2id$"));
        assert_eq!(
            authenticator.password_hasher.verify("my_password", decoy_hash),
            Ok(false)
        );

        authenticator.verify_decoy("my_password");
    }

    #[test]
    fn test_validate_expired_token() {
        let authenticator = authenticator();
        let token = authenticator
            .issue_token("user123", Utc::now() - Duration::hours(2), Duration::hours(1))
            .unwrap();

        let result = authenticator.validate_token::<String>(&token);
        assert_eq!(result, Err(TokenError::Expired));
    }

    #[test]
    fn test_validate_invalid_token() {
        let result = authenticator().validate_token::<String>("invalid.token.here");
        assert!(result.is_err());
    }
}
