//! Password hashing with Argon2id.

use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use serde_json::json;

use crate::error::AppError;

const SALT_BYTES: usize = 16;

pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 128;

/// Well-formed Argon2id hash with default cost that matches no password.
///
/// Verifying against it costs the same as a real check, so a login for an
/// unknown email takes as long as one with a wrong password.
pub const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$ZnVwaXNoYS1kdW1teS0xNg$AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Rejects passwords outside the accepted length range.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if the length is out of range.
pub fn check_password_policy(password: &str) -> Result<(), AppError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len) {
        return Err(AppError::bad_request(
            format!("Password must be {MIN_PASSWORD_LEN}-{MAX_PASSWORD_LEN} characters"),
            json!({ "provided_length": len }),
        ));
    }
    Ok(())
}

/// Hashes a password into a PHC string (`$argon2id$...`).
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the random source or the hasher fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt_bytes = [0u8; SALT_BYTES];
    getrandom::fill(&mut salt_bytes).map_err(|e| {
        AppError::internal("Failed to hash password", json!({ "reason": e.to_string() }))
    })?;

    let salt = SaltString::encode_b64(&salt_bytes).map_err(hashing_failed)?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(hashing_failed)?;

    Ok(hash.to_string())
}

/// Checks a password against a stored PHC string.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the stored hash cannot be parsed.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored_hash).map_err(hashing_failed)?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// [`hash_password`] on the blocking thread pool.
///
/// # Errors
///
/// Same as [`hash_password`], plus [`AppError::Internal`] if the worker dies.
pub async fn hash_password_blocking(password: &str) -> Result<String, AppError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(worker_failed)?
}

/// [`verify_password`] on the blocking thread pool.
///
/// # Errors
///
/// Same as [`verify_password`], plus [`AppError::Internal`] if the worker dies.
pub async fn verify_password_blocking(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    let password = password.to_owned();
    let stored_hash = stored_hash.to_owned();
    tokio::task::spawn_blocking(move || verify_password(&password, &stored_hash))
        .await
        .map_err(worker_failed)?
}

fn worker_failed(e: tokio::task::JoinError) -> AppError {
    tracing::error!(error = %e, "Password worker failed");
    AppError::internal("Failed to hash password", json!({}))
}

fn hashing_failed(e: argon2::password_hash::Error) -> AppError {
    tracing::error!(error = %e, "Password hashing failed");
    AppError::internal("Failed to hash password", json!({}))
}
