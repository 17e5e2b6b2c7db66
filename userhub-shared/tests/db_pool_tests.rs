/// Integration tests for the database connection pool
///
/// Tests marked `#[ignore]` require a running PostgreSQL database:
/// cargo test -p userhub-shared -- --ignored --test-threads=1
///
/// Connection parameters come from DB_HOST, DB_PORT, DB_USER, DB_PASSWORD
/// and DB_NAME (defaults: localhost, 5432, postgres, postgres, userhub_test).

use std::env;
use std::time::Instant;
use userhub_shared::db::pool::{close_pool, create_pool, health_check, DatabaseConfig};

/// Helper to build the test database configuration from the environment
fn test_database_config() -> DatabaseConfig {
    DatabaseConfig {
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
    }
}

#[tokio::test]
async fn test_create_pool_gives_up_after_bounded_attempts() {
    // Port 1 on loopback refuses connections immediately
    let config = DatabaseConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        username: "nobody".to_string(),
        database: "nothing".to_string(),
        connect_timeout_seconds: 2,
        connect_attempts: 2,
        retry_delay_seconds: 0,
        ..Default::default()
    };

    let started = Instant::now();
    let result = create_pool(&config).await;

    assert!(result.is_err(), "Should fail when the database is unreachable");
    assert!(started.elapsed().as_secs() < 30, "Retries must be bounded");
}

#[tokio::test]
#[ignore]
async fn test_create_pool_success() {
    let pool = create_pool(&test_database_config())
        .await
        .expect("Failed to create pool");

    assert!(health_check(&pool).await.is_ok(), "Health check should succeed");

    close_pool(pool).await;
}

#[tokio::test]
#[ignore]
async fn test_migrations_create_users_table() {
    let pool = create_pool(&test_database_config())
        .await
        .expect("Failed to create pool");

    userhub_shared::db::migrations::run_migrations(&pool)
        .await
        .expect("Migrations should apply");

    // Running twice is a no-op
    userhub_shared::db::migrations::run_migrations(&pool)
        .await
        .expect("Migrations should be idempotent");

    let exists: bool = sqlx::query_scalar(
        "SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = 'users'
        )",
    )
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(exists);

    close_pool(pool).await;
}
