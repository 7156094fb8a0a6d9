//! PostgreSQL implementation of the URL store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::{NewShortUrl, ShortUrl, UrlPatch};
use crate::domain::store::{StoreError, UrlStore};
use crate::infrastructure::persistence::connection::PgHandle;
use crate::infrastructure::persistence::db_error::{is_foreign_key_violation, map_sqlx_error};

const URL_COLUMNS: &str = "id, alias, target, owner_id, created_at, expires_at, clicks";

#[derive(sqlx::FromRow)]
struct UrlRow {
    id: i64,
    alias: String,
    target: String,
    owner_id: i64,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    clicks: i64,
}

impl From<UrlRow> for ShortUrl {
    fn from(row: UrlRow) -> Self {
        Self {
            id: row.id,
            alias: row.alias,
            target: row.target,
            owner_id: row.owner_id,
            created_at: row.created_at,
            expires_at: row.expires_at,
            clicks: row.clicks,
        }
    }
}

/// PostgreSQL store for alias-to-target mappings.
///
/// Each method issues exactly one statement. The owner relation is enforced
/// by the `urls.owner_id` foreign key.
pub struct PgUrlStore {
    handle: PgHandle,
}

impl PgUrlStore {
    pub(crate) fn new(handle: PgHandle) -> Self {
        Self { handle }
    }
}

#[async_trait]
impl UrlStore for PgUrlStore {
    async fn create(&self, new_url: NewShortUrl) -> Result<ShortUrl, StoreError> {
        const OP: &str = "creating url";
        new_url.validate()?;

        let sql = format!(
            r#"
            INSERT INTO urls (alias, target, owner_id, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING {URL_COLUMNS}
            "#
        );
        let query = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(&new_url.alias)
            .bind(&new_url.target)
            .bind(new_url.owner_id)
            .bind(new_url.expires_at)
            .fetch_one(self.handle.pool());

        let row = self.handle.run(OP, query).await?.map_err(|e| {
            if is_foreign_key_violation(&e) {
                StoreError::not_found("user", new_url.owner_id.to_string())
            } else {
                map_sqlx_error(OP, "url", &new_url.alias, e)
            }
        })?;

        Ok(row.into())
    }

    async fn fetch_by_alias(&self, alias: &str) -> Result<ShortUrl, StoreError> {
        const OP: &str = "fetching url";

        let sql = format!("SELECT {URL_COLUMNS} FROM urls WHERE alias = $1");
        let query = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(alias)
            .fetch_one(self.handle.pool());

        let row = self
            .handle
            .run(OP, query)
            .await?
            .map_err(|e| map_sqlx_error(OP, "url", alias, e))?;

        Ok(row.into())
    }

    async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<ShortUrl>, StoreError> {
        const OP: &str = "listing urls";

        let sql = format!(
            "SELECT {URL_COLUMNS} FROM urls WHERE owner_id = $1 ORDER BY created_at DESC, id DESC"
        );
        let query = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(owner_id)
            .fetch_all(self.handle.pool());

        let rows = self
            .handle
            .run(OP, query)
            .await?
            .map_err(|e| map_sqlx_error(OP, "url", &owner_id.to_string(), e))?;

        Ok(rows.into_iter().map(ShortUrl::from).collect())
    }

    async fn update(&self, alias: &str, patch: UrlPatch) -> Result<ShortUrl, StoreError> {
        const OP: &str = "updating url";
        patch.validate()?;

        let update_expiry = patch.expires_at.is_some();
        let new_expiry = patch.expires_at.flatten();

        let sql = format!(
            r#"
            UPDATE urls SET
                target     = COALESCE($2::TEXT, target),
                expires_at = CASE WHEN $3 THEN $4::TIMESTAMPTZ ELSE expires_at END
            WHERE alias = $1
            RETURNING {URL_COLUMNS}
            "#
        );
        let query = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(alias)
            .bind(patch.target.as_deref())
            .bind(update_expiry)
            .bind(new_expiry)
            .fetch_optional(self.handle.pool());

        let row = self
            .handle
            .run(OP, query)
            .await?
            .map_err(|e| map_sqlx_error(OP, "url", alias, e))?
            .ok_or_else(|| StoreError::not_found("url", alias))?;

        Ok(row.into())
    }

    async fn delete(&self, alias: &str) -> Result<(), StoreError> {
        const OP: &str = "deleting url";

        let query = sqlx::query("DELETE FROM urls WHERE alias = $1")
            .bind(alias)
            .execute(self.handle.pool());

        let result = self
            .handle
            .run(OP, query)
            .await?
            .map_err(|e| map_sqlx_error(OP, "url", alias, e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("url", alias));
        }

        Ok(())
    }

    async fn update_owned(
        &self,
        owner_id: i64,
        alias: &str,
        patch: UrlPatch,
    ) -> Result<ShortUrl, StoreError> {
        const OP: &str = "updating url";
        patch.validate()?;

        let update_expiry = patch.expires_at.is_some();
        let new_expiry = patch.expires_at.flatten();

        let sql = format!(
            r#"
            UPDATE urls SET
                target     = COALESCE($3::TEXT, target),
                expires_at = CASE WHEN $4 THEN $5::TIMESTAMPTZ ELSE expires_at END
            WHERE alias = $1 AND owner_id = $2
            RETURNING {URL_COLUMNS}
            "#
        );
        let query = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(alias)
            .bind(owner_id)
            .bind(patch.target.as_deref())
            .bind(update_expiry)
            .bind(new_expiry)
            .fetch_optional(self.handle.pool());

        let row = self
            .handle
            .run(OP, query)
            .await?
            .map_err(|e| map_sqlx_error(OP, "url", alias, e))?
            .ok_or_else(|| StoreError::not_found("url", alias))?;

        Ok(row.into())
    }

    async fn delete_owned(&self, owner_id: i64, alias: &str) -> Result<(), StoreError> {
        const OP: &str = "deleting url";

        let query = sqlx::query("DELETE FROM urls WHERE alias = $1 AND owner_id = $2")
            .bind(alias)
            .bind(owner_id)
            .execute(self.handle.pool());

        let result = self
            .handle
            .run(OP, query)
            .await?
            .map_err(|e| map_sqlx_error(OP, "url", alias, e))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("url", alias));
        }

        Ok(())
    }

    async fn record_visit(&self, alias: &str) -> Result<ShortUrl, StoreError> {
        const OP: &str = "recording visit";

        let sql = format!(
            r#"
            UPDATE urls SET
                clicks = clicks + CASE
                    WHEN expires_at IS NULL OR expires_at > NOW() THEN 1
                    ELSE 0
                END
            WHERE alias = $1
            RETURNING {URL_COLUMNS}
            "#
        );
        let query = sqlx::query_as::<_, UrlRow>(&sql)
            .bind(alias)
            .fetch_optional(self.handle.pool());

        let row = self
            .handle
            .run(OP, query)
            .await?
            .map_err(|e| map_sqlx_error(OP, "url", alias, e))?
            .ok_or_else(|| StoreError::not_found("url", alias))?;

        Ok(row.into())
    }
}
