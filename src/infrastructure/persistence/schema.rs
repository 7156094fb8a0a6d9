//! Ordered, versioned schema statements and the migrator that applies them.
//!
//! Every `up` statement is guarded with `IF NOT EXISTS` and every `down`
//! statement with `IF EXISTS`, so the whole list can be replayed against a
//! backend in any state. New schema changes are appended with the next
//! version; existing entries are never edited.

use sqlx::PgPool;
use tracing::{Span, debug, info};

use crate::domain::store::{SchemaPhase, StoreError};

/// One schema step with its inverse.
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: u32,
    pub description: &'static str,
    pub up: &'static str,
    pub down: &'static str,
}

/// The schema, in application order.
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "create users",
        up: r#"
            CREATE TABLE IF NOT EXISTS users (
                id            BIGSERIAL PRIMARY KEY,
                email         TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                created_at    TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at    TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
        "#,
        down: "DROP TABLE IF EXISTS users",
    },
    Migration {
        version: 2,
        description: "create urls",
        up: r#"
            CREATE TABLE IF NOT EXISTS urls (
                id         BIGSERIAL PRIMARY KEY,
                alias      TEXT NOT NULL UNIQUE,
                target     TEXT NOT NULL,
                owner_id   BIGINT NOT NULL REFERENCES users (id) ON DELETE CASCADE,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                expires_at TIMESTAMPTZ,
                clicks     BIGINT NOT NULL DEFAULT 0
            )
        "#,
        down: "DROP TABLE IF EXISTS urls",
    },
    Migration {
        version: 3,
        description: "index urls by owner",
        up: "CREATE INDEX IF NOT EXISTS urls_owner_id_idx ON urls (owner_id, created_at DESC)",
        down: "DROP INDEX IF EXISTS urls_owner_id_idx",
    },
];

/// Version of the newest schema step.
pub fn latest_version() -> u32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Applies every `up` statement in ascending version order.
///
/// Stops at the first failure; statements already applied stay applied.
///
/// # Errors
///
/// Returns [`StoreError::SchemaMigration`] naming the failed version.
pub async fn migrate(pool: &PgPool, span: &Span) -> Result<(), StoreError> {
    for migration in MIGRATIONS {
        apply(pool, migration.version, migration.up, SchemaPhase::Migrate).await?;
        debug!(parent: span, version = migration.version, description = migration.description, "Schema step applied");
    }
    info!(parent: span, version = latest_version(), "Schema migrated");
    Ok(())
}

/// Applies every `down` statement in descending version order.
///
/// # Errors
///
/// Returns [`StoreError::SchemaMigration`] naming the failed version.
pub async fn drop(pool: &PgPool, span: &Span) -> Result<(), StoreError> {
    for migration in MIGRATIONS.iter().rev() {
        apply(pool, migration.version, migration.down, SchemaPhase::Drop).await?;
        debug!(parent: span, version = migration.version, description = migration.description, "Schema step reverted");
    }
    info!(parent: span, "Schema dropped");
    Ok(())
}

async fn apply(
    pool: &PgPool,
    version: u32,
    statement: &'static str,
    phase: SchemaPhase,
) -> Result<(), StoreError> {
    sqlx::query(statement)
        .execute(pool)
        .await
        .map_err(|e| StoreError::SchemaMigration {
            phase,
            version,
            source: e.into(),
        })?;
    Ok(())
}
