mod common;

use fupisha::domain::entities::UserPatch;
use fupisha::domain::store::{Store, StoreError};
use sqlx::PgPool;

#[sqlx::test(migrations = false)]
async fn test_create_user(pool: PgPool) {
    let store = common::pg_store(pool).await;

    let user = store.users().create(common::new_user("a@b.com")).await.unwrap();

    assert!(user.id > 0);
    assert_eq!(user.email, "a@b.com");
    assert_eq!(user.created_at, user.updated_at);
}

#[sqlx::test(migrations = false)]
async fn test_create_duplicate_email(pool: PgPool) {
    let store = common::pg_store(pool).await;
    store.users().create(common::new_user("a@b.com")).await.unwrap();

    let result = store.users().create(common::new_user("a@b.com")).await;

    assert!(matches!(
        result,
        Err(StoreError::Conflict { entity: "user", .. })
    ));
}

#[sqlx::test(migrations = false)]
async fn test_create_invalid_email(pool: PgPool) {
    let store = common::pg_store(pool).await;

    let result = store.users().create(common::new_user("not-an-email")).await;

    assert!(matches!(result, Err(StoreError::Validation(_))));
}

#[sqlx::test(migrations = false)]
async fn test_fetch_round_trip(pool: PgPool) {
    let store = common::pg_store(pool).await;
    let created = store.users().create(common::new_user("a@b.com")).await.unwrap();

    let by_id = store.users().fetch_by_id(created.id).await.unwrap();
    let by_email = store.users().fetch_by_email("a@b.com").await.unwrap();

    assert_eq!(by_id, created);
    assert_eq!(by_email, created);
}

#[sqlx::test(migrations = false)]
async fn test_fetch_missing(pool: PgPool) {
    let store = common::pg_store(pool).await;

    assert!(matches!(
        store.users().fetch_by_id(999).await,
        Err(StoreError::NotFound { entity: "user", .. })
    ));
    assert!(matches!(
        store.users().fetch_by_email("nobody@b.com").await,
        Err(StoreError::NotFound { .. })
    ));
}

#[sqlx::test(migrations = false)]
async fn test_list_paginates_by_id(pool: PgPool) {
    let store = common::pg_store(pool).await;
    for i in 0..5 {
        store
            .users()
            .create(common::new_user(&format!("user{i}@b.com")))
            .await
            .unwrap();
    }

    let first = store.users().list(1, 2).await.unwrap();
    let third = store.users().list(3, 2).await.unwrap();

    assert_eq!(first.len(), 2);
    assert_eq!(first[0].email, "user0@b.com");
    assert_eq!(third.len(), 1);
    assert_eq!(third[0].email, "user4@b.com");
}

#[sqlx::test(migrations = false)]
async fn test_update_user(pool: PgPool) {
    let store = common::pg_store(pool).await;
    let user = store.users().create(common::new_user("a@b.com")).await.unwrap();
    store.users().create(common::new_user("taken@b.com")).await.unwrap();

    let updated = store
        .users()
        .update(
            user.id,
            UserPatch {
                email: Some("new@b.com".to_string()),
                password_hash: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.email, "new@b.com");
    assert_eq!(updated.password_hash, user.password_hash);
    assert!(updated.updated_at >= user.updated_at);

    let conflict = store
        .users()
        .update(
            user.id,
            UserPatch {
                email: Some("taken@b.com".to_string()),
                password_hash: None,
            },
        )
        .await;
    assert!(matches!(conflict, Err(StoreError::Conflict { .. })));

    let missing = store.users().update(999, UserPatch::default()).await;
    assert!(matches!(missing, Err(StoreError::NotFound { .. })));
}

#[sqlx::test(migrations = false)]
async fn test_list_rejects_bad_page_bounds(pool: PgPool) {
    let store = common::pg_store(pool).await;
    store.users().create(common::new_user("a@b.com")).await.unwrap();

    assert!(matches!(
        store.users().list(i64::MAX, 2).await,
        Err(StoreError::Validation(_))
    ));
    assert!(matches!(
        store.users().list(1, -1).await,
        Err(StoreError::Validation(_))
    ));
    assert_eq!(store.users().list(0, 10).await.unwrap().len(), 1);
}
