//! Tracing subscriber setup.
//!
//! `RUST_LOG` takes precedence over `logging.level` when it holds a valid
//! filter. Output is compact text or one JSON object per line.

use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};
use crate::error::AppError;

/// Install the global subscriber described by `config`.
///
/// # Errors
///
/// Returns [`AppError::Logging`] if the configured level is not a valid
/// filter or a subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), AppError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(&config.level, rust_log.as_deref())?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = match config.format {
        LogFormat::Pretty => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    installed.map_err(|e| AppError::Logging {
        message: format!("failed to install subscriber: {e}"),
    })
}

/// Pick the filter: a parseable `override_directives` wins, otherwise
/// `level` is used.
fn build_filter(level: &str, override_directives: Option<&str>) -> Result<EnvFilter, AppError> {
    if let Some(directives) = override_directives.filter(|d| !d.trim().is_empty()) {
        match EnvFilter::try_new(directives) {
            Ok(filter) => return Ok(filter),
            // No subscriber exists yet, so this cannot be logged.
            Err(e) => eprintln!("ignoring invalid {}: {e}", EnvFilter::DEFAULT_ENV),
        }
    }

    EnvFilter::try_new(level).map_err(|e| AppError::Logging {
        message: format!("invalid log level {level:?}: {e}"),
    })
}
