use std::fmt;

use super::errors::SecretError;

/// Symmetric key used to sign and verify session tokens.
///
/// Built once from configuration and handed to [`TokenCodec::new`](super::TokenCodec::new),
/// which consumes it. The bytes are never printed.
#[derive(Clone)]
pub struct CredentialSecret(Vec<u8>);

impl CredentialSecret {
    /// # Errors
    /// * `Empty` - The secret has no bytes
    pub fn new(secret: impl Into<Vec<u8>>) -> Result<Self, SecretError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(SecretError::Empty);
        }
        Ok(Self(secret))
    }

    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for CredentialSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialSecret(<redacted>)")
    }
}
