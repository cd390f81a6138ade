use thiserror::Error;

/// Error type for session token operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    Encoding(String),

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token declares an unexpected signing algorithm: {0}")]
    Algorithm(String),

    #[error("Token signature is invalid")]
    Signature,

    #[error("Token is expired")]
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::Signature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                TokenError::Algorithm(err.to_string())
            }
            _ => TokenError::Malformed(err.to_string()),
        }
    }
}

/// Error for credential secret construction.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SecretError {
    #[error("Credential secret must not be empty")]
    Empty,
}
