//! Authentication utilities library
//!
//! Provides the credential and session primitives for the social service:
//! - Password hashing (Argon2id, bounded input length)
//! - Stateless session tokens (HS256 JWT with identity and expiry)
//! - Authentication coordination
//!
//! Nothing here knows about users, storage or HTTP. The service adapts these
//! primitives behind its own ports.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{CredentialSecret, TokenCodec};
//! use chrono::{Duration, Utc};
//!
//! let secret = CredentialSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let codec = TokenCodec::new(secret);
//! let token = codec.issue("user123", Utc::now(), Duration::days(7)).unwrap();
//! let identity: String = codec.verify(&token).unwrap();
//! assert_eq!(identity, "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, CredentialSecret};
//! use chrono::{Duration, Utc};
//!
//! let secret = CredentialSecret::new("secret_key_at_least_32_bytes_long!").unwrap();
//! let auth = Authenticator::new(secret);
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue token
//! let result = auth
//!     .authenticate("password123", &hash, "user123", Utc::now(), Duration::days(7))
//!     .unwrap();
//!
//! // Validate token
//! let identity: String = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(identity, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::CredentialSecret;
pub use jwt::SecretError;
pub use jwt::SessionClaims;
pub use jwt::TokenCodec;
pub use jwt::TokenError;
pub use jwt::DEFAULT_SESSION_TTL_HOURS;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::MAX_PASSWORD_BYTES;
