//! # Userhub API Server
//!
//! HTTP service exposing user CRUD and avatar upload.
//!
//! ## Startup
//!
//! 1. Load configuration from the environment (and `.env`)
//! 2. Install the JSON log subscriber
//! 3. Connect to PostgreSQL, retrying a bounded number of times
//! 4. Apply migrations (unless `RUN_MIGRATIONS=false`)
//! 5. Serve until Ctrl-C, then close the pool
//!
//! ## Usage
//!
//! ```bash
//! DB_HOST=localhost DB_USER=postgres DB_NAME=userhub cargo run -p userhub-api
//! ```

use std::sync::Arc;
use userhub_api::{
    app::{build_router, AppState},
    config::Config,
    logging,
};
use userhub_shared::{
    db::{
        migrations::run_migrations,
        pool::{close_pool, create_pool},
    },
    repository::PgUserRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    logging::init(config.log_format)?;

    tracing::info!(
        "Userhub API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    // Unreachable database after all attempts aborts startup
    let pool = create_pool(&config.database).await?;

    if config.run_migrations {
        run_migrations(&pool).await?;
    }

    let bind_address = config.bind_address();
    let state = AppState::new(Arc::new(PgUserRepository::new(pool.clone())), config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    close_pool(pool).await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received, exiting...");
}
