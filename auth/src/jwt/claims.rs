use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::TokenError;

/// Payload of a session token.
///
/// Carries only the authenticated identity and its validity window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionClaims {
    /// Subject (user identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl SessionClaims {
    /// Create claims for `identity`, valid from `issued_at` for `ttl`.
    ///
    /// # Errors
    /// * `Encoding` - `issued_at + ttl` is outside the representable range
    pub fn new(
        identity: impl ToString,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, TokenError> {
        let expires_at = issued_at.checked_add_signed(ttl).ok_or_else(|| {
            TokenError::Encoding(format!("session lifetime {} is out of range", ttl))
        })?;

        Ok(Self {
            sub: identity.to_string(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
        })
    }

    /// A token is expired from its `exp` instant onward. No leeway is applied.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
