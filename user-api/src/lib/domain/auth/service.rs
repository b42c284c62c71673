use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::AccessToken;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::user::models::UserId;
use crate::user::ports::UserRepository;

/// Login and token verification over the user store.
pub struct AuthService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> AuthService<UR>
where
    UR: UserRepository,
{
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }
}

#[async_trait]
impl<UR> AuthServicePort for AuthService<UR>
where
    UR: UserRepository,
{
    async fn authenticate(&self, email: &str, password: &str) -> Result<AccessToken, AuthError> {
        let user = self
            .repository
            .find_by_email(email)
            .await
            .map_err(|e| AuthError::Internal(e.to_string()))?;

        // Argon2 is CPU bound; keep it off the async workers.
        let authenticator = Arc::clone(&self.authenticator);
        let password = password.to_string();
        let credential = user
            .as_ref()
            .map(|user| (user.password_hash.clone(), user.id));

        let issued = tokio::task::spawn_blocking(move || match credential {
            Some((hash, id)) => authenticator.authenticate(&password, Some(hash.as_str()), id),
            None => authenticator.authenticate(&password, None, ""),
        })
        .await
        .map_err(|e| AuthError::Internal(e.to_string()))?
        .map_err(|e| {
            tracing::warn!(error = %e, "Login rejected");
            AuthError::from(e)
        })?;

        let user = user.ok_or(AuthError::InvalidCredentials)?;
        tracing::info!(user_id = %user.id, "Access token issued");

        Ok(AccessToken {
            user_id: user.id,
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    fn verify_token(&self, token: &str) -> Result<UserId, AuthError> {
        let claims = self.authenticator.validate_token(token)?;

        UserId::from_string(&claims.sub).map_err(|_| AuthError::MalformedToken)
    }
}
