//! In-memory user store.

use async_trait::async_trait;
use chrono::Utc;
use tracing::{Span, debug};

use super::SharedState;
use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::store::user_store::page_offset;
use crate::domain::store::{StoreError, UserStore};

/// User records kept in process memory.
pub struct MemoryUserStore {
    state: SharedState,
    span: Span,
}

impl MemoryUserStore {
    pub(crate) fn new(state: SharedState, span: Span) -> Self {
        Self { state, span }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        new_user.validate()?;
        let mut state = self.state.write().await;
        state.ensure_schema("creating user")?;

        if state.users.values().any(|u| u.email == new_user.email) {
            return Err(StoreError::conflict("user", new_user.email));
        }

        state.last_user_id += 1;
        let now = Utc::now();
        let user = User {
            id: state.last_user_id,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        debug!(parent: &self.span, id = user.id, "User created");

        Ok(user)
    }

    async fn fetch_by_id(&self, id: i64) -> Result<User, StoreError> {
        let state = self.state.read().await;
        state.ensure_schema("fetching user")?;

        state
            .users
            .get(&id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("user", id.to_string()))
    }

    async fn fetch_by_email(&self, email: &str) -> Result<User, StoreError> {
        let state = self.state.read().await;
        state.ensure_schema("fetching user")?;

        state
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| StoreError::not_found("user", email))
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<User>, StoreError> {
        let state = self.state.read().await;
        state.ensure_schema("listing users")?;

        let offset = page_offset(page, page_size)?;
        let skip = usize::try_from(offset).unwrap_or(usize::MAX);
        let take = usize::try_from(page_size).unwrap_or(usize::MAX);

        Ok(state.users.values().skip(skip).take(take).cloned().collect())
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<User, StoreError> {
        patch.validate()?;
        let mut state = self.state.write().await;
        state.ensure_schema("updating user")?;

        if !state.users.contains_key(&id) {
            return Err(StoreError::not_found("user", id.to_string()));
        }

        if let Some(email) = &patch.email
            && state.users.values().any(|u| u.id != id && &u.email == email)
        {
            return Err(StoreError::conflict("user", email.clone()));
        }

        let user = state
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("user", id.to_string()))?;
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(hash) = patch.password_hash {
            user.password_hash = hash;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }
}
