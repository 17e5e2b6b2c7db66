/// Database connection pool management
///
/// This module builds the PostgreSQL connection pool from discrete connection
/// parameters (host, port, user, password, database) and establishes it with a
/// bounded retry loop. If every attempt fails, the last error is returned and
/// the caller is expected to abort startup.
///
/// # Example
///
/// ```no_run
/// use userhub_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         host: "localhost".to_string(),
///         port: 5432,
///         username: "postgres".to_string(),
///         password: "postgres".to_string(),
///         database: "userhub".to_string(),
///         ..Default::default()
///     };
///
///     let pool = create_pool(&config).await?;
///
///     let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
///         .fetch_one(&pool)
///         .await?;
///
///     Ok(())
/// }
/// ```

use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions, PgSslMode};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Configuration for the database connection pool
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Database host name or address
    pub host: String,

    /// Database port
    pub port: u16,

    /// Login role
    pub username: String,

    /// Password for the login role (may be empty)
    pub password: String,

    /// Database name
    pub database: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Timeout for acquiring a connection from the pool (seconds)
    pub connect_timeout_seconds: u64,

    /// How many times startup tries to reach the database before giving up
    ///
    /// Values below 1 are treated as 1.
    pub connect_attempts: u32,

    /// Pause between two startup attempts (seconds)
    pub retry_delay_seconds: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            username: String::new(),
            password: String::new(),
            database: String::new(),
            max_connections: 10,
            connect_timeout_seconds: 30,
            connect_attempts: 5,
            retry_delay_seconds: 5,
        }
    }
}

impl DatabaseConfig {
    /// Builds the connection descriptor
    ///
    /// TLS is disabled, the service talks to a database on a trusted network.
    pub fn connect_options(&self) -> PgConnectOptions {
        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.username)
            .database(&self.database)
            .ssl_mode(PgSslMode::Disable);

        if !self.password.is_empty() {
            options = options.password(&self.password);
        }

        options
    }
}

/// Creates the PostgreSQL connection pool, retrying on failure
///
/// Each attempt opens the pool and runs [`health_check`]. Between failed
/// attempts the task sleeps for `retry_delay_seconds`.
///
/// # Errors
///
/// Returns the error of the last attempt once `connect_attempts` attempts
/// have failed.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let attempts = config.connect_attempts.max(1);

    info!(
        host = %config.host,
        port = config.port,
        database = %config.database,
        max_connections = config.max_connections,
        attempts,
        "Creating database connection pool"
    );

    let mut attempt = 1;
    loop {
        match try_connect(config).await {
            Ok(pool) => {
                info!(attempt, "Database connection pool created successfully");
                return Ok(pool);
            }
            Err(err) if attempt < attempts => {
                warn!(
                    attempt,
                    attempts,
                    error = %err,
                    retry_in_seconds = config.retry_delay_seconds,
                    "Database not reachable, retrying"
                );
                tokio::time::sleep(Duration::from_secs(config.retry_delay_seconds)).await;
                attempt += 1;
            }
            Err(err) => {
                error!(attempts, error = %err, "Giving up on database connection");
                return Err(err);
            }
        }
    }
}

async fn try_connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .connect_with(config.connect_options())
        .await?;

    health_check(&pool).await?;
    Ok(pool)
}

/// Performs a health check on the database connection
///
/// # Errors
///
/// Returns an error if the health check query fails
pub async fn health_check(pool: &PgPool) -> Result<(), sqlx::Error> {
    debug!("Performing database health check");

    let result: (i32,) = sqlx::query_as("SELECT 1").fetch_one(pool).await?;

    if result.0 == 1 {
        debug!("Database health check passed");
        Ok(())
    } else {
        warn!("Database health check returned unexpected value: {}", result.0);
        Err(sqlx::Error::Protocol(
            "Health check returned unexpected value".into(),
        ))
    }
}

/// Gracefully closes the connection pool
///
/// Called during shutdown so in-flight connections are released.
pub async fn close_pool(pool: PgPool) {
    info!("Closing database connection pool");
    pool.close().await;
    info!("Database connection pool closed");
}
