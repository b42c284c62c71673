use thiserror::Error;

/// Errors raised while logging in or checking an access token.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown email and wrong password are deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    ExpiredToken,

    #[error("Malformed token")]
    MalformedToken,

    #[error("Authentication failed: {0}")]
    Internal(String),
}

impl From<auth::JwtError> for AuthError {
    fn from(err: auth::JwtError) -> Self {
        match err {
            auth::JwtError::InvalidSignature => AuthError::InvalidToken,
            auth::JwtError::Expired => AuthError::ExpiredToken,
            auth::JwtError::Malformed(_) => AuthError::MalformedToken,
            auth::JwtError::EncodingFailed(e) => AuthError::Internal(e),
        }
    }
}

impl From<auth::AuthenticationError> for AuthError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => AuthError::InvalidCredentials,
            auth::AuthenticationError::JwtError(e) => AuthError::Internal(e.to_string()),
        }
    }
}
