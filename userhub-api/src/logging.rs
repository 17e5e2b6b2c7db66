/// Log initialisation
///
/// Installs a `tracing` subscriber that writes one JSON object per event to
/// stdout, with millisecond timestamps (`2024-01-31 12:00:00.123`). The
/// pretty format is meant for local development only.
///
/// The filter comes from `RUST_LOG` and falls back to
/// [`DEFAULT_FILTER`].

use crate::config::LogFormat;
use tracing_subscriber::{
    fmt::{format::Writer, time::FormatTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

/// Filter used when `RUST_LOG` is not set
pub const DEFAULT_FILTER: &str = "userhub_api=info,userhub_shared=info,tower_http=info";

/// Local wall-clock timestamp with millisecond precision
#[derive(Debug, Clone, Copy, Default)]
pub struct LogTimestamp;

impl FormatTime for LogTimestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Installs the global subscriber
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(format: LogFormat) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_timer(LogTimestamp)
                    .with_current_span(false),
            )
            .try_init()?,
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_timer(LogTimestamp))
            .try_init()?,
    }

    Ok(())
}
