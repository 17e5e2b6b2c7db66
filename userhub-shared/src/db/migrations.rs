/// Database migration runner
///
/// Migrations live in `userhub-shared/migrations/` and are embedded into the
/// binary at compile time by `sqlx::migrate!`. The schema migration is written
/// with `IF NOT EXISTS`, so it is safe to run against a database whose `users`
/// table was created by hand.
///
/// # Example
///
/// ```no_run
/// use userhub_shared::db::pool::{create_pool, DatabaseConfig};
/// use userhub_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(&DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration fails to apply or the database connection
/// is lost while migrating.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
