use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AccessToken;
use crate::domain::user::models::UserId;

/// Port for credential checks and token verification.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Exchange an email and password for an access token.
    ///
    /// Performs a single read against the user store and no writes.
    ///
    /// # Errors
    /// * `InvalidCredentials` - No such email, or the password does not match
    /// * `Internal` - Store or token encoding failure
    async fn authenticate(&self, email: &str, password: &str) -> Result<AccessToken, AuthError>;

    /// Verify a bearer token and return the user it was issued to.
    ///
    /// # Errors
    /// * `InvalidToken` - Signature mismatch
    /// * `ExpiredToken` - Past expiry
    /// * `MalformedToken` - Unparseable token or subject
    fn verify_token(&self, token: &str) -> Result<UserId, AuthError>;
}
