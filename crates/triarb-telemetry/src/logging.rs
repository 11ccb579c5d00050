//! Tracing subscriber setup.

use crate::error::{TelemetryError, TelemetryResult};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "info,triarb=debug";

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` overrides the default directives. Output is JSON lines when
/// `RUST_ENV=production`, human-readable otherwise.
pub fn init_logging() -> TelemetryResult<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    let json_output = std::env::var("RUST_ENV")
        .map(|v| v == "production")
        .unwrap_or(false);

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true);

    let result = if json_output {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| TelemetryError::Init(e.to_string()))
}
