/// Application state and router builder
///
/// This module defines the shared application state and provides
/// a function to build the Axum router with all routes and middleware.
///
/// Every dependency a handler needs is carried by [`AppState`]; nothing is
/// reached through globals.
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use userhub_api::{app::AppState, config::Config};
/// use userhub_shared::db::pool::create_pool;
/// use userhub_shared::repository::PgUserRepository;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = create_pool(&config.database).await?;
/// let state = AppState::new(Arc::new(PgUserRepository::new(pool)), config);
/// let app = userhub_api::app::build_router(state);
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use userhub_shared::repository::UserRepository;
use userhub_shared::storage::FileStore;

/// Directory (under the upload root) for files sent with create user
pub const UPLOADS_DIR: &str = "uploads";

/// Directory (under the upload root) for files sent to the avatar endpoint
pub const AVATARS_DIR: &str = "avatars";

/// Shared application state
///
/// This is cloned for each request handler via Axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// User persistence
    pub users: Arc<dyn UserRepository>,

    /// Uploaded file storage
    pub files: FileStore,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    ///
    /// The file store is rooted at `config.uploads.root`.
    pub fn new(users: Arc<dyn UserRepository>, config: Config) -> Self {
        Self {
            users,
            files: FileStore::new(config.uploads.root.clone()),
            config: Arc::new(config),
        }
    }
}

/// Builds the complete Axum router with all routes and middleware
///
/// # Architecture
///
/// ```text
/// /
/// ├── GET    /health              # Health check
/// ├── GET    /users               # List users
/// ├── POST   /users               # Create user (multipart)
/// ├── DELETE /users/:username     # Delete user(s) by username
/// ├── POST   /users/:id/avatar    # Upload avatar (multipart)
/// ├── GET    /uploads/*           # Static files from <root>/uploads
/// └── GET    /avatars/*           # Static files from <root>/avatars
/// ```
///
/// The delete and avatar routes share their first parameter segment, so it
/// carries one name (`:user`) in both; each handler parses it its own way.
///
/// # Middleware Stack
///
/// Applied in order (bottom to top):
/// 1. Body limit (`UPLOAD_MAX_BYTES`)
/// 2. Logging (tower-http TraceLayer)
/// 3. CORS (tower-http CorsLayer)
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let root = state.files.root().to_path_buf();

    let user_routes = Router::new()
        .route(
            "/users",
            get(routes::users::list_users).post(routes::users::create_user),
        )
        .route("/users/:user", delete(routes::users::delete_user))
        .route("/users/:user/avatar", post(routes::avatar::upload_avatar));

    let cors = if state.config.cors_permissive() {
        CorsLayer::permissive()
    } else {
        let origins: Vec<HeaderValue> = state
            .config
            .api
            .cors_origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE])
            .max_age(std::time::Duration::from_secs(3600))
    };

    Router::new()
        .route("/health", get(routes::health::health_check))
        .merge(user_routes)
        .nest_service("/uploads", ServeDir::new(root.join(UPLOADS_DIR)))
        .nest_service("/avatars", ServeDir::new(root.join(AVATARS_DIR)))
        .layer(DefaultBodyLimit::max(state.config.uploads.max_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .with_state(state)
}
