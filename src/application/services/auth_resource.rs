//! Registration, login and bearer-token authentication.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use hmac::{Hmac, Mac};
use serde_json::json;
use sha2::Sha256;
use tracing::{Span, debug, info, warn};

use crate::domain::entities::{NewUser, User, UserPatch, normalize_email};
use crate::domain::store::{Store, StoreError};
use crate::error::AppError;
use crate::utils::password::{
    DUMMY_PASSWORD_HASH, check_password_policy, hash_password_blocking, verify_password_blocking,
};

type HmacSha256 = Hmac<Sha256>;

/// Settings the auth resource needs from process configuration.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for token signatures.
    pub signing_secret: String,
    /// Lifetime of issued tokens.
    pub token_ttl: TimeDelta,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("signing_secret", &"***")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// A freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: User,
}

/// Authentication operations exposed to the HTTP layer.
///
/// Tokens are stateless: `<user_id>.<expires_unix>.<signature>`, where the
/// signature is the hex HMAC-SHA256 of `<user_id>.<expires_unix>` under the
/// signing secret. Nothing about a token is stored.
pub struct AuthResource {
    store: Arc<dyn Store>,
    config: AuthConfig,
    span: Span,
}

impl AuthResource {
    pub fn new(store: Arc<dyn Store>, config: AuthConfig, span: Span) -> Self {
        Self {
            store,
            config,
            span,
        }
    }

    /// Creates an account.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for a malformed email or a password
    /// outside the length policy, and [`AppError::Conflict`] if the email is
    /// already registered.
    pub async fn register(&self, email: &str, password: &str) -> Result<User, AppError> {
        check_password_policy(password)?;
        let email = normalize_email(email);
        let password_hash = hash_password_blocking(password).await?;

        let user = self
            .store
            .users()
            .create(NewUser {
                email: email.clone(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict { .. } => AppError::conflict(
                    "Email is already registered",
                    json!({ "email": email }),
                ),
                other => other.into(),
            })?;

        info!(parent: &self.span, user_id = user.id, "User registered");
        Ok(user)
    }

    /// Checks credentials and issues a token.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for an unknown email or a wrong
    /// password; the two cases are indistinguishable to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<IssuedToken, AppError> {
        let user = match self.store.users().fetch_by_email(&normalize_email(email)).await {
            Ok(user) => user,
            Err(StoreError::NotFound { .. }) => {
                verify_password_blocking(password, DUMMY_PASSWORD_HASH).await?;
                return Err(invalid_credentials());
            }
            Err(e) => return Err(e.into()),
        };

        if !verify_password_blocking(password, &user.password_hash).await? {
            warn!(parent: &self.span, user_id = user.id, "Login with wrong password");
            return Err(invalid_credentials());
        }

        let expires_at = Utc::now()
            .checked_add_signed(self.config.token_ttl)
            .ok_or_else(|| {
                AppError::internal(
                    "Failed to issue token",
                    json!({ "reason": "Token lifetime out of range" }),
                )
            })?;
        let token = self.issue_token(user.id, expires_at)?;
        info!(parent: &self.span, user_id = user.id, "Token issued");

        Ok(IssuedToken {
            token,
            expires_at,
            user,
        })
    }

    /// Resolves a bearer token to its user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if the token is malformed, has a bad
    /// signature, has expired, or names a user that no longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<User, AppError> {
        let user_id = self.verify_token(token, Utc::now())?;

        match self.store.users().fetch_by_id(user_id).await {
            Ok(user) => Ok(user),
            Err(StoreError::NotFound { .. }) => {
                debug!(parent: &self.span, user_id, "Token for unknown user");
                Err(invalid_token("Unknown user"))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces a user's password after checking the current one.
    ///
    /// Tokens issued before the change stay valid until they expire.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] if `current` is wrong and
    /// [`AppError::Validation`] if `new` breaks the length policy.
    pub async fn change_password(
        &self,
        user_id: i64,
        current: &str,
        new: &str,
    ) -> Result<User, AppError> {
        let user = self.store.users().fetch_by_id(user_id).await?;

        if !verify_password_blocking(current, &user.password_hash).await? {
            return Err(invalid_credentials());
        }
        check_password_policy(new)?;
        let password_hash = hash_password_blocking(new).await?;

        let updated = self
            .store
            .users()
            .update(
                user_id,
                UserPatch {
                    email: None,
                    password_hash: Some(password_hash),
                },
            )
            .await?;

        info!(parent: &self.span, user_id, "Password changed");
        Ok(updated)
    }

    fn issue_token(&self, user_id: i64, expires_at: DateTime<Utc>) -> Result<String, AppError> {
        let payload = format!("{user_id}.{}", expires_at.timestamp());
        let mac = self.mac(&payload)?;
        Ok(format!("{payload}.{}", hex::encode(mac.finalize().into_bytes())))
    }

    /// Returns the user id carried by a valid token.
    fn verify_token(&self, token: &str, now: DateTime<Utc>) -> Result<i64, AppError> {
        let mut parts = token.splitn(3, '.');
        let (Some(user_id), Some(expires), Some(signature)) =
            (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid_token("Malformed token"));
        };

        let signature = hex::decode(signature).map_err(|_| invalid_token("Malformed token"))?;
        self.mac(&format!("{user_id}.{expires}"))?
            .verify_slice(&signature)
            .map_err(|_| invalid_token("Bad signature"))?;

        let expires: i64 = expires.parse().map_err(|_| invalid_token("Malformed token"))?;
        if now.timestamp() >= expires {
            return Err(invalid_token("Token expired"));
        }

        user_id.parse().map_err(|_| invalid_token("Malformed token"))
    }

    fn mac(&self, payload: &str) -> Result<HmacSha256, AppError> {
        let mut mac = HmacSha256::new_from_slice(self.config.signing_secret.as_bytes())
            .map_err(|e| AppError::internal("Failed to sign token", json!({ "reason": e.to_string() })))?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }
}


fn invalid_credentials() -> AppError {
    AppError::unauthorized(
        "Invalid email or password",
        json!({ "reason": "Invalid credentials" }),
    )
}

fn invalid_token(reason: &str) -> AppError {
    AppError::unauthorized("Unauthorized", json!({ "reason": reason }))
}
