//! PostgreSQL implementation of the user store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{NewUser, User, UserPatch};
use crate::domain::store::user_store::page_offset;
use crate::domain::store::{StoreError, UserStore};
use crate::infrastructure::persistence::connection::PgHandle;
use crate::infrastructure::persistence::db_error::map_sqlx_error;

const USER_COLUMNS: &str = "id, email, password_hash, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL store for user records.
///
/// Shares the facade's pool; see [`super::PgStore::users`].
pub struct PgUserStore {
    handle: PgHandle,
}

impl PgUserStore {
    pub(crate) fn new(handle: PgHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        const OP: &str = "creating user";
        new_user.validate()?;

        let sql = format!(
            "INSERT INTO users (email, password_hash) VALUES ($1, $2) RETURNING {USER_COLUMNS}"
        );
        let query = sqlx::query_as::<_, UserRow>(&sql)
            .bind(&new_user.email)
            .bind(&new_user.password_hash)
            .fetch_one(self.handle.pool());

        let row = self
            .handle
            .run(OP, query)
            .await?
            .map_err(|e| map_sqlx_error(OP, "user", &new_user.email, e))?;

        Ok(row.into())
    }

    async fn fetch_by_id(&self, id: i64) -> Result<User, StoreError> {
        const OP: &str = "fetching user";

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let query = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_one(self.handle.pool());

        let row = self
            .handle
            .run(OP, query)
            .await?
            .map_err(|e| map_sqlx_error(OP, "user", &id.to_string(), e))?;

        Ok(row.into())
    }

    async fn fetch_by_email(&self, email: &str) -> Result<User, StoreError> {
        const OP: &str = "fetching user";

        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let query = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_one(self.handle.pool());

        let row = self
            .handle
            .run(OP, query)
            .await?
            .map_err(|e| map_sqlx_error(OP, "user", email, e))?;

        Ok(row.into())
    }

    async fn list(&self, page: i64, page_size: i64) -> Result<Vec<User>, StoreError> {
        const OP: &str = "listing users";
        let offset = page_offset(page, page_size)?;

        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id LIMIT $1 OFFSET $2");
        let query = sqlx::query_as::<_, UserRow>(&sql)
            .bind(page_size)
            .bind(offset)
            .fetch_all(self.handle.pool());

        let rows = self
            .handle
            .run(OP, query)
            .await?
            .map_err(|e| map_sqlx_error(OP, "user", "*", e))?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn update(&self, id: i64, patch: UserPatch) -> Result<User, StoreError> {
        const OP: &str = "updating user";
        patch.validate()?;

        let sql = format!(
            r#"
            UPDATE users SET
                email         = COALESCE($2::TEXT, email),
                password_hash = COALESCE($3::TEXT, password_hash),
                updated_at    = NOW()
            WHERE id = $1
            RETURNING {USER_COLUMNS}
            "#
        );
        let query = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(patch.email.as_deref())
            .bind(patch.password_hash.as_deref())
            .fetch_optional(self.handle.pool());

        let key = patch.email.clone().unwrap_or_else(|| id.to_string());
        let row = self
            .handle
            .run(OP, query)
            .await?
            .map_err(|e| map_sqlx_error(OP, "user", &key, e))?
            .ok_or_else(|| StoreError::not_found("user", id.to_string()))?;

        Ok(row.into())
    }
}
