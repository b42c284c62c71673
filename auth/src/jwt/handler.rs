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
use serde::Serialize;

use super::claims::Claims;
use super::errors::JwtError;

/// A freshly signed access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// JWT token handler for issuing and verifying access tokens.
///
/// Uses HS256 (HMAC with SHA-256). The signing secret and token lifetime
/// are fixed at construction and never change afterwards.
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    ttl: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (at least 32 bytes for HS256)
    /// * `ttl` - Lifetime of issued tokens
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm: Algorithm::HS256,
            ttl,
        }
    }

    /// Issue a signed token for `subject`, expiring `ttl` from now.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn issue(&self, subject: impl ToString) -> Result<IssuedToken, JwtError> {
        let claims = Claims::for_subject(subject, self.ttl);
        let token = self.encode(&claims)?;
        let expires_at = claims
            .expires_at()
            .ok_or_else(|| JwtError::EncodingFailed("expiration out of range".to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify signature and expiry, returning the token's claims.
    ///
    /// # Errors
    /// * `InvalidSignature` - Signature does not match the secret
    /// * `Expired` - Token is past its `exp`
    /// * `Malformed` - Token cannot be parsed or lacks `sub`/`exp`
    pub fn verify(&self, token: &str) -> Result<Claims, JwtError> {
        self.decode(token)
    }

    /// Encode arbitrary claims into a JWT token.
    ///
    /// # Errors
    /// * `EncodingFailed` - Token encoding failed
    pub fn encode<T: Serialize>(&self, claims: &T) -> Result<String, JwtError> {
        let header = Header::new(self.algorithm);

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))
    }

    /// Decode and validate a JWT token into arbitrary claims.
    ///
    /// `sub` and `exp` are required and expiry is checked without leeway.
    pub fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Result<T, JwtError> {
        let mut validation = Validation::new(self.algorithm);
        validation.set_required_spec_claims(&["sub", "exp"]);
        validation.leeway = 0;

        let token_data = decode::<T>(token, &self.decoding_key, &validation)?;

        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"my_secret_key_at_least_32_bytes_long!";

    fn handler() -> JwtHandler {
        JwtHandler::new(SECRET, Duration::hours(24))
    }

    #[test]
    fn test_issue_and_verify() {
        let handler = handler();

        let issued = handler.issue(7).expect("Failed to issue token");
        assert!(!issued.token.is_empty());

        let claims = handler.verify(&issued.token).expect("Failed to verify token");
        assert_eq!(claims.sub, "7");
        assert_eq!(claims.exp - claims.iat, 24 * 60 * 60);
        assert_eq!(Some(issued.expires_at), claims.expires_at());
    }

    #[test]
    fn test_verify_garbage_is_malformed() {
        let result = handler().verify("invalid.token.here");
        assert!(matches!(result, Err(JwtError::Malformed(_))));

        let result = handler().verify("not-a-jwt");
        assert!(matches!(result, Err(JwtError::Malformed(_))));
    }

    #[test]
    fn test_verify_with_wrong_secret() {
        let other = JwtHandler::new(b"secret2_at_least_32_bytes_long_key!", Duration::hours(1));
        let issued = other.issue("user123").expect("Failed to issue token");

        let result = handler().verify(&issued.token);
        assert_eq!(result, Err(JwtError::InvalidSignature));
    }

    #[test]
    fn test_verify_expired() {
        let handler = handler();
        let claims = Claims::new(
            "user123",
            Utc::now() - Duration::hours(2),
            Duration::hours(1),
        );
        let token = handler.encode(&claims).expect("Failed to encode token");

        assert_eq!(handler.verify(&token), Err(JwtError::Expired));
    }

    #[test]
    fn test_verify_missing_subject() {
        #[derive(Serialize)]
        struct NoSubject {
            exp: i64,
        }

        let handler = handler();
        let token = handler
            .encode(&NoSubject {
                exp: (Utc::now() + Duration::hours(1)).timestamp(),
            })
            .expect("Failed to encode token");

        assert!(matches!(handler.verify(&token), Err(JwtError::Malformed(_))));
    }
}
