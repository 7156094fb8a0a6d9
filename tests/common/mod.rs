#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use chrono::TimeDelta;
use fupisha::application::services::AuthConfig;
use fupisha::domain::entities::NewUser;
use fupisha::domain::store::Store;
use fupisha::infrastructure::memory::MemoryStore;
use fupisha::infrastructure::persistence::PgStore;
use fupisha::routes::router;
use fupisha::state::AppState;
use serde_json::{Value, json};
use sqlx::PgPool;
use tracing::Span;

pub const BASE_URL: &str = "https://fup.sh";
pub const PASSWORD: &str = "correct horse battery";

pub fn auth_config() -> AuthConfig {
    AuthConfig {
        signing_secret: "integration-test-secret-0123456789".to_string(),
        token_ttl: TimeDelta::hours(1),
    }
}

pub async fn pg_store(pool: PgPool) -> PgStore {
    PgStore::from_pool(pool, Duration::from_secs(5), Span::none())
        .await
        .unwrap()
}

pub fn new_user(email: &str) -> NewUser {
    NewUser {
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
    }
}

pub fn create_test_state(store: Arc<dyn Store>) -> AppState {
    AppState::new(store, auth_config(), BASE_URL, Span::none())
}

/// Full router over an empty in-memory store.
pub fn memory_server() -> (TestServer, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let state = create_test_state(store.clone());
    (TestServer::new(router(state)).unwrap(), store)
}

/// Registers and logs in a user, returning the bearer token.
pub async fn register_and_login(server: &TestServer, email: &str) -> String {
    server
        .post("/api/auth/register")
        .json(&json!({ "email": email, "password": PASSWORD }))
        .await
        .assert_status(axum::http::StatusCode::CREATED);

    let response = server
        .post("/api/auth/login")
        .json(&json!({ "email": email, "password": PASSWORD }))
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    body["token"].as_str().unwrap().to_string()
}
