mod common;

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::{TimeDelta, Utc};
use fupisha::domain::entities::UrlPatch;
use fupisha::domain::store::Store;
use serde_json::{Value, json};

async fn shorten(server: &TestServer, token: &str, body: Value) -> axum_test::TestResponse {
    server
        .post("/api/urls")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&body)
        .await
}

#[tokio::test]
async fn test_shorten_requires_token() {
    let (server, _store) = common::memory_server();

    server
        .post("/api/urls")
        .json(&json!({ "url": "https://example.com" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_shorten_with_generated_alias() {
    let (server, _store) = common::memory_server();
    let token = common::register_and_login(&server, "alice@example.com").await;

    let response = shorten(
        &server,
        &token,
        json!({ "url": "HTTPS://Example.com/docs#intro" }),
    )
    .await;

    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    let alias = body["alias"].as_str().unwrap();
    assert_eq!(alias.len(), 8);
    assert_eq!(body["target"], "https://example.com/docs");
    assert_eq!(body["short_url"], format!("{}/{alias}", common::BASE_URL));
    assert_eq!(body["clicks"], 0);
}

#[tokio::test]
async fn test_shorten_custom_alias_conflict() {
    let (server, _store) = common::memory_server();
    let alice = common::register_and_login(&server, "alice@example.com").await;
    let bob = common::register_and_login(&server, "bob@example.com").await;

    shorten(&server, &alice, json!({ "url": "https://a.example", "alias": "docs" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = shorten(&server, &bob, json!({ "url": "https://b.example", "alias": "docs" })).await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(response.json::<Value>()["error"]["details"]["alias"], "docs");
}

#[tokio::test]
async fn test_shorten_rejects_bad_input() {
    let (server, _store) = common::memory_server();
    let token = common::register_and_login(&server, "alice@example.com").await;

    for body in [
        json!({ "url": "ftp://example.com/file" }),
        json!({ "url": "https://example.com", "alias": "Bad_Alias" }),
        json!({ "url": "https://example.com", "alias": "health" }),
        json!({ "url": "https://example.com", "expires_at": "2001-01-01T00:00:00Z" }),
        json!({ "url": "" }),
    ] {
        shorten(&server, &token, body.clone())
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_redirect_counts_clicks() {
    let (server, _store) = common::memory_server();
    let token = common::register_and_login(&server, "alice@example.com").await;
    shorten(&server, &token, json!({ "url": "https://example.com/target", "alias": "goto" }))
        .await
        .assert_status(StatusCode::CREATED);

    let response = server.get("/goto").await;

    response.assert_status(StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(response.header("location"), "https://example.com/target");

    server.get("/goto").await;

    let list = server
        .get("/api/urls")
        .add_header("Authorization", format!("Bearer {token}"))
        .await
        .json::<Value>();
    assert_eq!(list["items"][0]["clicks"], 2);
}

#[tokio::test]
async fn test_redirect_unknown_and_expired() {
    let (server, store) = common::memory_server();
    let token = common::register_and_login(&server, "alice@example.com").await;
    shorten(
        &server,
        &token,
        json!({
            "url": "https://example.com",
            "alias": "soon",
            "expires_at": Utc::now() + TimeDelta::hours(1)
        }),
    )
    .await
    .assert_status(StatusCode::CREATED);

    server
        .get("/missing")
        .await
        .assert_status(StatusCode::NOT_FOUND);

    store
        .urls()
        .update(
            "soon",
            UrlPatch {
                target: None,
                expires_at: Some(Some(Utc::now() - TimeDelta::seconds(1))),
            },
        )
        .await
        .unwrap();

    let response = server.get("/soon").await;
    response.assert_status(StatusCode::GONE);
    assert_eq!(response.json::<Value>()["error"]["code"], "gone");
}

#[tokio::test]
async fn test_list_only_own_urls() {
    let (server, _store) = common::memory_server();
    let alice = common::register_and_login(&server, "alice@example.com").await;
    let bob = common::register_and_login(&server, "bob@example.com").await;

    shorten(&server, &alice, json!({ "url": "https://a.example/1" })).await;
    shorten(&server, &alice, json!({ "url": "https://a.example/2" })).await;
    shorten(&server, &bob, json!({ "url": "https://b.example/1" })).await;

    let response = server
        .get("/api/urls")
        .add_header("Authorization", format!("Bearer {alice}"))
        .await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["total"], 2);
    assert_eq!(body["items"][0]["target"], "https://a.example/2");
}

#[tokio::test]
async fn test_update_url() {
    let (server, _store) = common::memory_server();
    let token = common::register_and_login(&server, "alice@example.com").await;
    let expiry = Utc::now() + TimeDelta::days(1);
    shorten(
        &server,
        &token,
        json!({ "url": "https://example.com", "alias": "docs", "expires_at": expiry }),
    )
    .await;

    let response = server
        .patch("/api/urls/docs")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "url": "https://docs.rs" }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["target"], "https://docs.rs/");
    assert!(!body["expires_at"].is_null());

    let cleared = server
        .patch("/api/urls/docs")
        .add_header("Authorization", format!("Bearer {token}"))
        .json(&json!({ "expires_at": null }))
        .await
        .json::<Value>();
    assert!(cleared["expires_at"].is_null());
    assert_eq!(cleared["target"], "https://docs.rs/");
}

#[tokio::test]
async fn test_cannot_touch_other_users_urls() {
    let (server, _store) = common::memory_server();
    let alice = common::register_and_login(&server, "alice@example.com").await;
    let bob = common::register_and_login(&server, "bob@example.com").await;
    shorten(&server, &alice, json!({ "url": "https://example.com", "alias": "mine" })).await;

    server
        .patch("/api/urls/mine")
        .add_header("Authorization", format!("Bearer {bob}"))
        .json(&json!({ "url": "https://evil.example" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .delete("/api/urls/mine")
        .add_header("Authorization", format!("Bearer {bob}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .get("/mine")
        .await
        .assert_status(StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_delete_url_twice() {
    let (server, _store) = common::memory_server();
    let token = common::register_and_login(&server, "alice@example.com").await;
    shorten(&server, &token, json!({ "url": "https://example.com", "alias": "temp" })).await;

    server
        .delete("/api/urls/temp")
        .add_header("Authorization", format!("Bearer {token}"))
        .await
        .assert_status(StatusCode::NO_CONTENT);

    server
        .delete("/api/urls/temp")
        .add_header("Authorization", format!("Bearer {token}"))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    server
        .get("/temp")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}
