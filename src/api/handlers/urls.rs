//! Handlers for short URL management (create, list, update, delete).

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::urls::{ShortenRequest, UpdateUrlRequest, UrlListResponse, UrlResponse};
use crate::domain::entities::{ShortUrl, UrlPatch, User};
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short URL owned by the caller.
///
/// # Endpoint
///
/// `POST /api/urls`
///
/// # Request Body
///
/// ```json
/// {
///   "url": "https://example.com/some/long/path",
///   "alias": "docs",                       // optional
///   "expires_at": "2030-01-01T00:00:00Z"   // optional
/// }
/// ```
///
/// # Errors
///
/// Returns 400 if validation fails and 409 if the alias is taken.
pub async fn create_url_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<ShortenRequest>,
) -> Result<(StatusCode, Json<UrlResponse>), AppError> {
    payload.validate()?;

    let url = state
        .links
        .shorten(user.id, &payload.url, payload.alias, payload.expires_at)
        .await?;

    Ok((StatusCode::CREATED, Json(to_response(&state, url))))
}

/// Lists the caller's short URLs, newest first.
///
/// `GET /api/urls`
pub async fn list_urls_handler(
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<Json<UrlListResponse>, AppError> {
    let urls = state.links.list(user.id).await?;

    let items: Vec<UrlResponse> = urls
        .into_iter()
        .map(|url| to_response(&state, url))
        .collect();

    Ok(Json(UrlListResponse {
        total: items.len(),
        items,
    }))
}

/// Partially updates one of the caller's short URLs.
///
/// # Endpoint
///
/// `PATCH /api/urls/{alias}`
///
/// # Errors
///
/// Returns 404 if the alias does not exist or belongs to another user.
pub async fn update_url_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<User>,
    Json(payload): Json<UpdateUrlRequest>,
) -> Result<Json<UrlResponse>, AppError> {
    payload.validate()?;

    let patch = UrlPatch {
        target: payload.url,
        expires_at: payload.expires_at,
    };

    let url = state.links.update(user.id, &alias, patch).await?;

    Ok(Json(to_response(&state, url)))
}

/// Deletes one of the caller's short URLs.
///
/// # Endpoint
///
/// `DELETE /api/urls/{alias}`
///
/// # Errors
///
/// Returns 404 if the alias does not exist, was already deleted, or belongs
/// to another user.
pub async fn delete_url_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
    Extension(user): Extension<User>,
) -> Result<StatusCode, AppError> {
    state.links.delete(user.id, &alias).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn to_response(state: &AppState, url: ShortUrl) -> UrlResponse {
    let short_url = state.links.short_url(&url.alias);
    UrlResponse::new(url, short_url)
}
