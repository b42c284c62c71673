use chrono::DateTime;
use chrono::Utc;

use crate::domain::user::models::UserId;

/// Signed bearer token handed out after a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub user_id: UserId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}
