//! Translation of driver errors into [`StoreError`].

use crate::domain::store::StoreError;

/// Maps a [`sqlx::Error`] raised by `operation` on `entity` identified by `key`.
///
/// - unique violations become [`StoreError::Conflict`]
/// - `RowNotFound` becomes [`StoreError::NotFound`]
/// - pool acquire timeouts become [`StoreError::Timeout`]
/// - everything else is [`StoreError::Backend`]
pub(crate) fn map_sqlx_error(
    operation: &'static str,
    entity: &'static str,
    key: &str,
    e: sqlx::Error,
) -> StoreError {
    match &e {
        sqlx::Error::RowNotFound => return StoreError::not_found(entity, key),
        sqlx::Error::PoolTimedOut => return StoreError::Timeout { operation },
        _ => {}
    }

    if is_unique_violation(&e) {
        return StoreError::conflict(entity, key);
    }

    StoreError::backend(operation, e)
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_unique_violation())
}

pub(crate) fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db_err| db_err.is_foreign_key_violation())
}
