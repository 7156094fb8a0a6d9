mod common;

use std::sync::Arc;

use axum::{Router, routing::get};
use axum_test::TestServer;
use fupisha::api::handlers::health_handler;
use fupisha::domain::store::Store;
use fupisha::infrastructure::memory::MemoryStore;
use serde_json::Value;
use sqlx::PgPool;

#[tokio::test]
async fn test_health_endpoint_success() {
    let state = common::create_test_state(Arc::new(MemoryStore::default()));
    let app = Router::new()
        .route("/health", get(health_handler))
        .with_state(state);

    let server = TestServer::new(app).unwrap();

    let response = server.get("/health").await;

    response.assert_status_ok();

    let json = response.json::<Value>();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["checks"]["store"]["status"], "ok");
    assert!(json.get("version").is_some());
}

#[sqlx::test(migrations = false)]
async fn test_health_endpoint_postgres(pool: PgPool) {
    let store = Arc::new(common::pg_store(pool).await);
    let state = common::create_test_state(store);

    let server = TestServer::new(fupisha::routes::router(state)).unwrap();

    server.get("/health").await.assert_status_ok();
}

#[sqlx::test(migrations = false)]
async fn test_health_endpoint_degraded_when_pool_closed(pool: PgPool) {
    let store = Arc::new(common::pg_store(pool).await);
    let state = common::create_test_state(store.clone());
    store.close().await;

    let server = TestServer::new(fupisha::routes::router(state)).unwrap();

    let response = server.get("/health").await;

    response.assert_status(axum::http::StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>()["checks"]["store"]["status"], "error");
    assert!(store.ping().await.is_err());
}
