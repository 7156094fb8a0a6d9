//! User entity representing an account that owns short URLs.

use chrono::{DateTime, Utc};
use validator::ValidateEmail;

use crate::domain::store::StoreError;

/// A registered user.
///
/// `email` is the login identity and is unique across all users.
/// `password_hash` is opaque credential material produced by the auth layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input data for creating a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
}

impl NewUser {
    /// Checks the fields a store must reject before touching the backend.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a malformed email or an empty hash.
    pub fn validate(&self) -> Result<(), StoreError> {
        validate_email(&self.email)?;
        validate_hash(&self.password_hash)
    }
}

/// Partial update for an existing user.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl UserPatch {
    /// Validates the fields present in the patch.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a malformed email or an empty hash.
    pub fn validate(&self) -> Result<(), StoreError> {
        if let Some(email) = &self.email {
            validate_email(email)?;
        }
        if let Some(hash) = &self.password_hash {
            validate_hash(hash)?;
        }
        Ok(())
    }
}

/// Canonical form of a login email: trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

fn validate_email(email: &str) -> Result<(), StoreError> {
    if !email.validate_email() {
        return Err(StoreError::Validation(format!("invalid email address: {email}")));
    }
    Ok(())
}

fn validate_hash(hash: &str) -> Result<(), StoreError> {
    if hash.is_empty() {
        return Err(StoreError::Validation(
            "password hash must not be empty".to_string(),
        ));
    }
    Ok(())
}
