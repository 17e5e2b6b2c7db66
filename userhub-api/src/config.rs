/// Configuration management for the API server
///
/// This module loads configuration from environment variables and provides
/// a type-safe configuration struct.
///
/// # Environment Variables
///
/// - `DB_HOST`, `DB_USER`, `DB_NAME`: PostgreSQL connection (required)
/// - `DB_PORT`: PostgreSQL port (default: 5432)
/// - `DB_PASSWORD`: PostgreSQL password (default: empty)
/// - `DB_MAX_CONNECTIONS`: Pool size (default: 10)
/// - `DB_CONNECT_ATTEMPTS`: Startup connection attempts (default: 5)
/// - `DB_CONNECT_RETRY_DELAY_SECS`: Delay between attempts (default: 5)
/// - `RUN_MIGRATIONS`: Apply embedded migrations at startup (default: true)
/// - `API_HOST`: Host to bind to (default: 0.0.0.0)
/// - `API_PORT`: Port to bind to (default: 8080)
/// - `CORS_ORIGINS`: `*` or a comma-separated list of origins (default: `*`)
/// - `UPLOAD_ROOT`: Directory holding `uploads/` and `avatars/` (default: `.`)
/// - `UPLOAD_MAX_BYTES`: Request body limit in bytes (default: 32 MiB)
/// - `LOG_FORMAT`: `json` or `pretty` (default: json)
/// - `RUST_LOG`: Log filter
///
/// # Example
///
/// ```no_run
/// use userhub_api::config::Config;
///
/// # fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// println!("Server will listen on {}", config.bind_address());
/// # Ok(())
/// # }
/// ```

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use userhub_shared::db::pool::DatabaseConfig;

/// Default request body limit (32 MiB)
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 32 * 1024 * 1024;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server configuration
    pub api: ApiConfig,

    /// Database connection and startup behaviour
    pub database: DatabaseConfig,

    /// Whether to apply embedded migrations at startup
    pub run_migrations: bool,

    /// Upload storage configuration
    pub uploads: UploadConfig,

    /// Log output configuration
    pub log_format: LogFormat,
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host to bind to
    pub host: String,

    /// Port to bind to
    pub port: u16,

    /// Allowed CORS origins, `*` means any
    pub cors_origins: Vec<String>,
}

/// Upload storage configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory holding `uploads/` and `avatars/`
    pub root: PathBuf,

    /// Maximum accepted request body, in bytes
    pub max_bytes: usize,
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per line
    Json,

    /// Human-readable, for local development
    Pretty,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => anyhow::bail!("unknown log format {:?} (expected json or pretty)", other),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables
    ///
    /// A `.env` file in the working directory is read first, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required environment variables are missing
    /// - Environment variables have invalid values
    pub fn from_env() -> anyhow::Result<Self> {
        // Load .env file if present (for development)
        dotenvy::dotenv().ok();

        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable source
    pub fn from_lookup<F>(var: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            var(name)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| anyhow::anyhow!("{} environment variable is required", name))
        };

        let database = DatabaseConfig {
            host: required("DB_HOST")?,
            port: parse_or(&var, "DB_PORT", 5432)?,
            username: required("DB_USER")?,
            password: var("DB_PASSWORD").unwrap_or_default(),
            database: required("DB_NAME")?,
            max_connections: parse_or(&var, "DB_MAX_CONNECTIONS", 10)?,
            connect_attempts: parse_or(&var, "DB_CONNECT_ATTEMPTS", 5)?,
            retry_delay_seconds: parse_or(&var, "DB_CONNECT_RETRY_DELAY_SECS", 5)?,
            ..Default::default()
        };

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            api: ApiConfig {
                host: var("API_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parse_or(&var, "API_PORT", 8080)?,
                cors_origins,
            },
            database,
            run_migrations: parse_or(&var, "RUN_MIGRATIONS", true)?,
            uploads: UploadConfig {
                root: var("UPLOAD_ROOT")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(".")),
                max_bytes: parse_or(&var, "UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES)?,
            },
            log_format: parse_or(&var, "LOG_FORMAT", LogFormat::Json)?,
        })
    }

    /// Returns the server bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.api.host, self.api.port)
    }

    /// Whether every origin is allowed
    pub fn cors_permissive(&self) -> bool {
        self.api.cors_origins.is_empty() || self.api.cors_origins.iter().any(|o| o == "*")
    }
}

fn parse_or<F, T>(var: &F, name: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match var(name) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow::anyhow!("invalid value for {}: {}", name, e)),
        _ => Ok(default),
    }
}
