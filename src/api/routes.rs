//! API route configuration, mounted under `/api`.

use crate::api::handlers::{
    change_password_handler, create_url_handler, delete_url_handler, list_urls_handler,
    login_handler, me_handler, register_handler, update_url_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, patch, post},
};

/// Account endpoints that need no token.
///
/// - `POST /auth/register` - create an account
/// - `POST /auth/login`    - exchange credentials for a bearer token
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
}

/// Endpoints that require a bearer token.
///
/// - `GET    /me`            - current user
/// - `POST   /me/password`   - change password
/// - `GET    /urls`          - list own short URLs
/// - `POST   /urls`          - create a short URL
/// - `PATCH  /urls/{alias}`  - update an own short URL
/// - `DELETE /urls/{alias}`  - delete an own short URL
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(me_handler))
        .route("/me/password", post(change_password_handler))
        .route("/urls", get(list_urls_handler).post(create_url_handler))
        .route(
            "/urls/{alias}",
            patch(update_url_handler).delete(delete_url_handler),
        )
}
