use std::env;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::error::{AppError, AppResult};

/// Log output layout selected with `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Plain,
    Json,
    Pretty,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plain" | "text" => Ok(LogFormat::Plain),
            "json" => Ok(LogFormat::Json),
            "pretty" => Ok(LogFormat::Pretty),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LogFormat::Plain => "plain",
            LogFormat::Json => "json",
            LogFormat::Pretty => "pretty",
        };
        f.write_str(name)
    }
}

pub const DEFAULT_LOG_LEVEL: &str = "vat_extractor=debug,tower_http=debug,axum::rejection=trace";

/// The settings needed to install the subscriber.
///
/// Read before tracing exists, so nothing here logs: an unparsable
/// `LOG_FORMAT` falls back quietly and is reported again by
/// [`Config::from_env`] once the subscriber is up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub format: LogFormat,
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Plain,
            level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        let defaults = LoggingConfig::default();
        Self {
            format: env::var("LOG_FORMAT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.format),
            level: env::var("LOG_LEVEL").unwrap_or(defaults.level),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub max_file_size_mb: usize,
    pub log_format: LogFormat,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8080,
            max_file_size_mb: 25,
            log_format: LogFormat::Plain,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// Startup entry point: `from_env` with failures reported as
    /// [`AppError::ConfigError`].
    pub fn load() -> AppResult<Self> {
        Self::from_env().map_err(|e| AppError::config(format!("{:#}", e)))
    }

    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let config = Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| {
                info!("SERVER_HOST not set, using default: {}", defaults.server_host);
                defaults.server_host.clone()
            }),
            server_port: Self::server_port(defaults.server_port)?,
            max_file_size_mb: Self::parse_env_var("MAX_FILE_SIZE_MB", defaults.max_file_size_mb)
                .context("Failed to parse MAX_FILE_SIZE_MB")?,
            log_format: Self::parse_env_var("LOG_FORMAT", defaults.log_format)
                .context("Failed to parse LOG_FORMAT")?,
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        };

        config.validate()?;

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    /// `PORT` is set by most PaaS hosts and takes precedence over `SERVER_PORT`.
    fn server_port(default: u16) -> Result<u16> {
        if let Ok(port) = env::var("PORT") {
            match port.parse::<u16>() {
                Ok(parsed) => return Ok(parsed),
                Err(e) => warn!("Ignoring invalid PORT '{}': {}", port, e),
            }
        }
        Self::parse_env_var("SERVER_PORT", default).context("Failed to parse SERVER_PORT")
    }

    fn parse_env_var<T>(var_name: &str, default: T) -> Result<T>
    where
        T: FromStr + Copy + fmt::Debug,
        T::Err: fmt::Display,
    {
        match env::var(var_name) {
            Ok(val) => match val.parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    Ok(default)
                }
            },
            Err(_) => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be greater than 0"));
        }
        if self.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        Ok(())
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
