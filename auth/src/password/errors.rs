use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password exceeds the maximum of {max} bytes (got {actual})")]
    TooLong { max: usize, actual: usize },

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Stored password hash is malformed: {0}")]
    InvalidHash(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
