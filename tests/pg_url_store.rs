mod common;

use chrono::{TimeDelta, Utc};
use fupisha::domain::entities::{NewShortUrl, UrlPatch};
use fupisha::domain::store::{Store, StoreError};
use fupisha::infrastructure::persistence::PgStore;
use sqlx::PgPool;

fn new_url(alias: &str, owner_id: i64) -> NewShortUrl {
    NewShortUrl {
        alias: alias.to_string(),
        target: "https://example.com/some/long/path".to_string(),
        owner_id,
        expires_at: None,
    }
}

async fn store_with_user(pool: PgPool) -> (PgStore, i64) {
    let store = common::pg_store(pool).await;
    let user = store.users().create(common::new_user("a@b.com")).await.unwrap();
    (store, user.id)
}

#[sqlx::test(migrations = false)]
async fn test_create_and_fetch(pool: PgPool) {
    let (store, owner) = store_with_user(pool).await;

    let created = store.urls().create(new_url("abc", owner)).await.unwrap();
    let fetched = store.urls().fetch_by_alias("abc").await.unwrap();

    assert_eq!(created, fetched);
    assert_eq!(fetched.clicks, 0);
    assert!(fetched.expires_at.is_none());
}

#[sqlx::test(migrations = false)]
async fn test_duplicate_alias_conflicts_until_deleted(pool: PgPool) {
    let (store, owner) = store_with_user(pool).await;
    store.urls().create(new_url("abc", owner)).await.unwrap();

    let duplicate = store.urls().create(new_url("abc", owner)).await;
    assert!(matches!(
        duplicate,
        Err(StoreError::Conflict { entity: "url", .. })
    ));

    store.urls().delete("abc").await.unwrap();
    assert!(store.urls().create(new_url("abc", owner)).await.is_ok());
}

#[sqlx::test(migrations = false)]
async fn test_double_delete_is_not_found(pool: PgPool) {
    let (store, owner) = store_with_user(pool).await;
    store.urls().create(new_url("abc", owner)).await.unwrap();

    store.urls().delete("abc").await.unwrap();
    let second = store.urls().delete("abc").await;

    assert!(matches!(
        second,
        Err(StoreError::NotFound { entity: "url", .. })
    ));
}

#[sqlx::test(migrations = false)]
async fn test_create_for_unknown_owner(pool: PgPool) {
    let store = common::pg_store(pool).await;

    let result = store.urls().create(new_url("abc", 42)).await;

    assert!(matches!(
        result,
        Err(StoreError::NotFound { entity: "user", .. })
    ));
}

#[sqlx::test(migrations = false)]
async fn test_fetch_missing_alias(pool: PgPool) {
    let store = common::pg_store(pool).await;

    assert!(matches!(
        store.urls().fetch_by_alias("nope").await,
        Err(StoreError::NotFound { .. })
    ));
}

#[sqlx::test(migrations = false)]
async fn test_list_by_owner_newest_first(pool: PgPool) {
    let (store, alice) = store_with_user(pool).await;
    let bob = store.users().create(common::new_user("bob@b.com")).await.unwrap().id;

    store.urls().create(new_url("a1", alice)).await.unwrap();
    store.urls().create(new_url("a2", alice)).await.unwrap();
    store.urls().create(new_url("b1", bob)).await.unwrap();

    let urls = store.urls().list_by_owner(alice).await.unwrap();

    assert_eq!(urls.len(), 2);
    assert_eq!(urls[0].alias, "a2");
    assert!(urls.iter().all(|u| u.owner_id == alice));
}

#[sqlx::test(migrations = false)]
async fn test_update_patch_semantics(pool: PgPool) {
    let (store, owner) = store_with_user(pool).await;
    let mut url = new_url("abc", owner);
    url.expires_at = Some(Utc::now() + TimeDelta::days(1));
    let created = store.urls().create(url).await.unwrap();

    let retargeted = store
        .urls()
        .update(
            "abc",
            UrlPatch {
                target: Some("https://rust-lang.org/".to_string()),
                expires_at: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(retargeted.target, "https://rust-lang.org/");
    assert_eq!(retargeted.expires_at, created.expires_at);

    let cleared = store
        .urls()
        .update(
            "abc",
            UrlPatch {
                target: None,
                expires_at: Some(None),
            },
        )
        .await
        .unwrap();
    assert!(cleared.expires_at.is_none());
    assert_eq!(cleared.target, "https://rust-lang.org/");

    let missing = store.urls().update("nope", UrlPatch::default()).await;
    assert!(matches!(missing, Err(StoreError::NotFound { .. })));
}

#[sqlx::test(migrations = false)]
async fn test_record_visit(pool: PgPool) {
    let (store, owner) = store_with_user(pool).await;
    store.urls().create(new_url("live", owner)).await.unwrap();
    let mut expired = new_url("old", owner);
    expired.expires_at = Some(Utc::now() - TimeDelta::seconds(1));
    store.urls().create(expired).await.unwrap();

    store.urls().record_visit("live").await.unwrap();
    let live = store.urls().record_visit("live").await.unwrap();
    let old = store.urls().record_visit("old").await.unwrap();

    assert_eq!(live.clicks, 2);
    assert_eq!(old.clicks, 0);
    assert!(matches!(
        store.urls().record_visit("missing").await,
        Err(StoreError::NotFound { .. })
    ));
}

#[sqlx::test(migrations = false)]
async fn test_deleting_urls_keeps_owner(pool: PgPool) {
    let (store, owner) = store_with_user(pool).await;
    store.urls().create(new_url("abc", owner)).await.unwrap();

    store.urls().delete("abc").await.unwrap();

    assert!(store.users().fetch_by_id(owner).await.is_ok());
    assert!(store.urls().list_by_owner(owner).await.unwrap().is_empty());
}

#[sqlx::test(migrations = false)]
async fn test_owned_writes_ignore_other_owners(pool: PgPool) {
    let (store, alice) = store_with_user(pool).await;
    let bob = store.users().create(common::new_user("bob@b.com")).await.unwrap().id;
    store.urls().create(new_url("docs", bob)).await.unwrap();

    let update = store
        .urls()
        .update_owned(
            alice,
            "docs",
            UrlPatch {
                target: Some("https://evil.example/".to_string()),
                expires_at: None,
            },
        )
        .await;
    let delete = store.urls().delete_owned(alice, "docs").await;

    assert!(matches!(update, Err(StoreError::NotFound { entity: "url", .. })));
    assert!(matches!(delete, Err(StoreError::NotFound { entity: "url", .. })));
    let kept = store.urls().fetch_by_alias("docs").await.unwrap();
    assert_eq!(kept.owner_id, bob);
    assert_eq!(kept.target, "https://example.com/some/long/path");

    let renamed = store
        .urls()
        .update_owned(
            bob,
            "docs",
            UrlPatch {
                target: None,
                expires_at: Some(Some(Utc::now() + TimeDelta::days(1))),
            },
        )
        .await
        .unwrap();
    assert!(renamed.expires_at.is_some());
    store.urls().delete_owned(bob, "docs").await.unwrap();
    assert!(matches!(
        store.urls().delete_owned(bob, "docs").await,
        Err(StoreError::NotFound { .. })
    ));
}
