/// Database layer for userhub
///
/// This module provides database connection pooling and migrations.
///
/// # Modules
///
/// - `pool`: PostgreSQL connection pool with bounded startup retry
/// - `migrations`: Embedded migration runner for the `users` table
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
///         username: "postgres".to_string(),
///         database: "userhub".to_string(),
///         ..Default::default()
///     };
///
///     let pool = create_pool(&config).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
