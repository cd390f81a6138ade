pub mod claims;
pub mod codec;
pub mod errors;
pub mod secret;

pub use claims::SessionClaims;
pub use codec::TokenCodec;
pub use codec::DEFAULT_SESSION_TTL_HOURS;
pub use errors::SecretError;
pub use errors::TokenError;
pub use secret::CredentialSecret;
