//! Tracing subscriber setup

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig, DEFAULT_LOG_LEVEL};

/// Builds the filter for a configured level. An unparsable level falls back
/// to the default directives and returns the parse error as a warning.
pub fn level_filter(level: &str) -> (EnvFilter, Option<String>) {
    match EnvFilter::try_new(level) {
        Ok(filter) => (filter, None),
        Err(e) => (
            EnvFilter::new(DEFAULT_LOG_LEVEL),
            Some(format!(
                "Invalid LOG_LEVEL '{}': {} (using default: {})",
                level, e, DEFAULT_LOG_LEVEL
            )),
        ),
    }
}

/// Installs the global subscriber. `RUST_LOG` takes precedence over the
/// configured level.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let (env_filter, fallback_warning) = match EnvFilter::try_from_default_env() {
        Ok(filter) => (filter, None),
        Err(_) => level_filter(&config.level),
    };

    match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false).json())
            .try_init()?,
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().pretty())
            .try_init()?,
        LogFormat::Plain => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().with_target(false))
            .try_init()?,
    }

    if let Some(warning) = fallback_warning {
        tracing::warn!("{}", warning);
    }

    Ok(())
}
