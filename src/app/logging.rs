use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use super::error::AppError;
use crate::config::{LogConfig, LogFormat};

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence, then `level_override`, then the configured
/// level. Logs go to stderr so stdout stays free for command output.
pub fn init_tracing(config: &LogConfig, level_override: Option<&str>) -> Result<(), AppError> {
    let level = level_override.unwrap_or(config.level.as_str());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .map_err(|e| AppError::InvalidArguments(format!("invalid log level: {}", e)))?;

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format {
        LogFormat::Console => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };

    result.map_err(|e| AppError::Logging(e.to_string()))
}
