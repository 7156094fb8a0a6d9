//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::error::AppError;
use crate::state::AppState;

/// Redirects an alias to its target.
///
/// # Endpoint
///
/// `GET /{alias}`
///
/// The visit is counted in the same store call that resolves the alias.
///
/// # Errors
///
/// Returns 404 Not Found for an unknown alias and 410 Gone for an expired one.
pub async fn redirect_handler(
    Path(alias): Path<String>,
    State(state): State<AppState>,
) -> Result<Redirect, AppError> {
    let url = state.links.resolve(&alias).await?;
    Ok(Redirect::temporary(&url.target))
}
