use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::user::models::NewUser;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Process-local user store.
///
/// All reads and writes happen under one lock, so the email uniqueness
/// check and the insert are atomic.
#[derive(Default)]
pub struct InMemoryUserRepository {
    state: Mutex<State>,
}

#[derive(Default)]
struct State {
    last_id: i64,
    users: BTreeMap<UserId, User>,
}

impl State {
    fn email_taken(&self, email: &str, except: Option<UserId>) -> bool {
        self.users
            .values()
            .any(|user| user.email.as_str() == email && Some(user.id) != except)
    }
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, UserError> {
        self.state
            .lock()
            .map_err(|_| UserError::DatabaseError("user store lock poisoned".to_string()))
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, UserError> {
        let mut state = self.lock()?;

        if state.email_taken(user.email.as_str(), None) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        state.last_id += 1;
        let now = Utc::now();
        let created = User {
            id: UserId(state.last_id),
            name: user.name,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(created.id, created.clone());

        Ok(created)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        Ok(self.lock()?.users.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, UserError> {
        Ok(self
            .lock()?
            .users
            .values()
            .find(|user| user.email.as_str() == email)
            .cloned())
    }

    async fn list(&self, offset: u64, limit: u32) -> Result<Vec<User>, UserError> {
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(limit).unwrap_or(usize::MAX);

        Ok(self
            .lock()?
            .users
            .values()
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn count_all(&self) -> Result<u64, UserError> {
        Ok(self.lock()?.users.len() as u64)
    }

    async fn update(&self, mut user: User) -> Result<User, UserError> {
        let mut state = self.lock()?;

        if !state.users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id.to_string()));
        }
        if state.email_taken(user.email.as_str(), Some(user.id)) {
            return Err(UserError::EmailAlreadyExists(
                user.email.as_str().to_string(),
            ));
        }

        user.updated_at = Utc::now();
        state.users.insert(user.id, user.clone());

        Ok(user)
    }
}
