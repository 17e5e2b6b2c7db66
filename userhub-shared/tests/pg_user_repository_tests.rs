/// Integration tests for the PostgreSQL user repository
///
/// These tests require a running PostgreSQL database and are ignored by
/// default. Run with:
/// cargo test -p userhub-shared --test pg_user_repository_tests -- --ignored --test-threads=1
///
/// Connection parameters come from DB_HOST, DB_PORT, DB_USER, DB_PASSWORD
/// and DB_NAME. Each test works on usernames with a random suffix so tests
/// do not see each other's rows.

use std::env;
use userhub_shared::db::migrations::run_migrations;
use userhub_shared::db::pool::{create_pool, DatabaseConfig};
use userhub_shared::models::user::NewUser;
use userhub_shared::repository::{PgUserRepository, UserRepository};
use uuid::Uuid;

async fn test_repository() -> PgUserRepository {
    let config = DatabaseConfig {
        host: env::var("DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
        port: env::var("DB_PORT")
            .ok()
            .and_then(|port| port.parse().ok())
            .unwrap_or(5432),
        username: env::var("DB_USER").unwrap_or_else(|_| "postgres".to_string()),
        password: env::var("DB_PASSWORD").unwrap_or_else(|_| "postgres".to_string()),
        database: env::var("DB_NAME").unwrap_or_else(|_| "userhub_test".to_string()),
        connect_attempts: 1,
        ..Default::default()
    };

    let pool = create_pool(&config).await.expect("Failed to create pool");
    run_migrations(&pool).await.expect("Migrations should apply");
    PgUserRepository::new(pool)
}

fn unique_username(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4())
}

fn new_user(username: &str, avatar: Option<&str>) -> NewUser {
    NewUser {
        username: username.to_string(),
        email: format!("{}@example.com", username),
        comment: "hello".to_string(),
        avatar: avatar.map(str::to_string),
    }
}

#[tokio::test]
#[ignore]
async fn test_insert_and_list_keeps_null_avatar() {
    let repo = test_repository().await;
    let username = unique_username("alice");

    let id = repo.insert(new_user(&username, None)).await.unwrap();
    assert!(id > 0);

    let users = repo.list_all().await.unwrap();
    let user = users.iter().find(|u| u.id == id).expect("inserted row listed");
    assert_eq!(user.username, username);
    assert_eq!(user.comment, "hello");
    assert!(user.avatar.is_none(), "NULL avatar must decode to None");

    repo.delete_by_username(&username).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_insert_with_avatar() {
    let repo = test_repository().await;
    let username = unique_username("bob");

    let id = repo
        .insert(new_user(&username, Some("uploads/bob.png")))
        .await
        .unwrap();

    let users = repo.list_all().await.unwrap();
    let user = users.iter().find(|u| u.id == id).unwrap();
    assert_eq!(user.avatar.as_deref(), Some("uploads/bob.png"));

    repo.delete_by_username(&username).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_update_avatar_path() {
    let repo = test_repository().await;
    let username = unique_username("carol");
    let id = repo.insert(new_user(&username, None)).await.unwrap();

    let path = format!("avatars/{}.png", id);
    assert_eq!(repo.update_avatar_path(id, &path).await.unwrap(), 1);
    assert_eq!(repo.update_avatar_path(i32::MAX, "avatars/x.png").await.unwrap(), 0);

    let users = repo.list_all().await.unwrap();
    let user = users.iter().find(|u| u.id == id).unwrap();
    assert_eq!(user.avatar.as_deref(), Some(path.as_str()));

    repo.delete_by_username(&username).await.unwrap();
}

#[tokio::test]
#[ignore]
async fn test_delete_by_username_counts_rows() {
    let repo = test_repository().await;
    let username = unique_username("dave");

    repo.insert(new_user(&username, None)).await.unwrap();
    repo.insert(new_user(&username, None)).await.unwrap();

    assert_eq!(repo.delete_by_username(&username.to_uppercase()).await.unwrap(), 0);
    assert_eq!(repo.delete_by_username(&username).await.unwrap(), 2);
    assert_eq!(repo.delete_by_username(&username).await.unwrap(), 0);
}

#[tokio::test]
#[ignore]
async fn test_ping() {
    let repo = test_repository().await;
    assert!(repo.ping().await.is_ok());
}
