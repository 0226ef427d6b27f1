use std::io;
use tracing_subscriber::{fmt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,tower_http=info,axum=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install the global subscriber writing to stdout.
///
/// `json` selects one JSON object per event for log collectors; otherwise
/// events are compact single lines. Later calls are ignored.
pub fn init_logging(json: bool) {
    let builder = fmt().with_env_filter(env_filter()).with_writer(io::stdout);
    let _ = if json {
        builder.with_target(true).json().try_init()
    } else {
        builder.with_target(false).compact().try_init()
    };
}
