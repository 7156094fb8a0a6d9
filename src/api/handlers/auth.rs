//! Handlers for account endpoints.

use axum::{Extension, Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::api::dto::auth::{
    ChangePasswordRequest, LoginRequest, RegisterRequest, TokenResponse, UserResponse,
};
use crate::domain::entities::User;
use crate::error::AppError;
use crate::state::AppState;

/// Creates an account.
///
/// # Endpoint
///
/// `POST /api/auth/register`
///
/// ```json
/// { "email": "alice@example.com", "password": "correct horse" }
/// ```
///
/// # Errors
///
/// Returns 400 for a malformed email or password and 409 if the email is taken.
pub async fn register_handler(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    payload.validate()?;

    let user = state
        .auth
        .register(&payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchanges credentials for a bearer token.
///
/// # Endpoint
///
/// `POST /api/auth/login`
///
/// # Errors
///
/// Returns 401 for an unknown email or a wrong password.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    payload.validate()?;

    let issued = state.auth.login(&payload.email, &payload.password).await?;

    Ok(Json(issued.into()))
}

/// Returns the authenticated user.
///
/// `GET /api/me`
pub async fn me_handler(Extension(user): Extension<User>) -> Json<UserResponse> {
    Json(user.into())
}

/// Changes the authenticated user's password.
///
/// # Endpoint
///
/// `POST /api/me/password`
///
/// # Errors
///
/// Returns 401 if the current password is wrong.
pub async fn change_password_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<UserResponse>, AppError> {
    payload.validate()?;

    let user = state
        .auth
        .change_password(user.id, &payload.current_password, &payload.new_password)
        .await?;

    Ok(Json(user.into()))
}
