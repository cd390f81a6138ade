use std::str::FromStr;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;
use serde::Deserialize;

use super::claims::SessionClaims;
use super::errors::TokenError;
use super::secret::CredentialSecret;

/// Session lifetime applied when configuration does not override it (7 days).
pub const DEFAULT_SESSION_TTL_HOURS: i64 = 24 * 7;

const ALGORITHM: Algorithm = Algorithm::HS256;
const ALGORITHM_NAME: &str = "HS256";

/// Signs and verifies session tokens.
///
/// Tokens are compact three-part JWTs signed with HS256. Any other declared
/// algorithm, including `none`, is refused before the signature is looked at.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

#[derive(Deserialize)]
struct DeclaredHeader {
    alg: String,
}

impl TokenCodec {
    /// Create a codec bound to `secret`.
    ///
    /// The secret is consumed; only the derived keys are kept.
    pub fn new(secret: CredentialSecret) -> Self {
        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked by `verify_at` against an explicit clock.
        validation.validate_exp = false;
        validation.validate_aud = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();

        Self {
            encoding_key: EncodingKey::from_secret(secret.expose()),
            decoding_key: DecodingKey::from_secret(secret.expose()),
            validation,
        }
    }

    /// Issue a token for `identity`, valid from `issued_at` until `issued_at + ttl`.
    ///
    /// # Errors
    /// * `Encoding` - Token encoding failed, or the expiry overflows
    pub fn issue(
        &self,
        identity: impl ToString,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<String, TokenError> {
        let claims = SessionClaims::new(identity, issued_at, ttl)?;

        encode(&Header::new(ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    /// Verify `token` against the wall clock and return its identity claim.
    pub fn verify<I: FromStr>(&self, token: &str) -> Result<I, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify `token` as of `now` and return its identity claim.
    ///
    /// # Errors
    /// * `Malformed` - Not a three-part token, undecodable payload, or an identity
    ///   claim that does not parse as `I`
    /// * `Algorithm` - Header declares anything other than HS256
    /// * `Signature` - Signature does not match header and payload
    /// * `Expired` - `now` is at or past the `exp` claim
    pub fn verify_at<I: FromStr>(&self, token: &str, now: DateTime<Utc>) -> Result<I, TokenError> {
        Self::check_declared_algorithm(token)?;

        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)?.claims;

        if claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        claims
            .sub
            .parse::<I>()
            .map_err(|_| TokenError::Malformed("identity claim is not valid".to_string()))
    }

    fn check_declared_algorithm(token: &str) -> Result<(), TokenError> {
        let mut segments = token.split('.');
        let header = match (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) {
            (Some(header), Some(_), Some(_), None) => header,
            _ => {
                return Err(TokenError::Malformed(
                    "expected three dot-separated segments".to_string(),
                ))
            }
        };

        let raw = URL_SAFE_NO_PAD
            .decode(header)
            .map_err(|e| TokenError::Malformed(format!("header is not base64url: {}", e)))?;
        let declared: DeclaredHeader = serde_json::from_slice(&raw)
            .map_err(|e| TokenError::Malformed(format!("header is not valid JSON: {}", e)))?;

        if declared.alg != ALGORITHM_NAME {
            return Err(TokenError::Algorithm(declared.alg));
        }

        Ok(())
    }
}
