//! Server configuration from environment variables

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use thiserror::Error;

pub const ENV_HOST: &str = "EVENT_PULSE_HOST";
pub const ENV_PORT: &str = "EVENT_PULSE_PORT";
pub const ENV_SUBSCRIBER_QUEUE: &str = "EVENT_PULSE_SUBSCRIBER_QUEUE";
pub const ENV_SHUTDOWN_TIMEOUT: &str = "EVENT_PULSE_SHUTDOWN_TIMEOUT_SECS";
pub const ENV_LOG_LEVEL: &str = "EVENT_PULSE_LOG_LEVEL";
pub const ENV_LOG_FORMAT: &str = "EVENT_PULSE_LOG_FORMAT";

/// A variable was set but could not be parsed
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid value '{value}' for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: String,
}

/// Output format of the log subscriber
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// Payloads buffered per subscriber before it is evicted as too slow
    pub subscriber_queue: usize,
    /// How long to wait for connections to drain after a shutdown signal
    pub shutdown_timeout: Duration,
    pub log: LogConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([0, 0, 0, 0]),
            port: 8080,
            subscriber_queue: 256,
            shutdown_timeout: Duration::from_secs(30),
            log: LogConfig::default(),
        }
    }
}

impl ServerConfig {
    /// Load from the process environment, falling back to defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load using an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_HOST) {
            config.host = parse(ENV_HOST, &value)?;
        }
        if let Some(value) = lookup(ENV_PORT) {
            config.port = parse(ENV_PORT, &value)?;
        }
        if let Some(value) = lookup(ENV_SUBSCRIBER_QUEUE) {
            let capacity: usize = parse(ENV_SUBSCRIBER_QUEUE, &value)?;
            if capacity == 0 {
                return Err(ConfigError {
                    key: ENV_SUBSCRIBER_QUEUE,
                    value,
                    reason: "must be at least 1".to_string(),
                });
            }
            config.subscriber_queue = capacity;
        }
        if let Some(value) = lookup(ENV_SHUTDOWN_TIMEOUT) {
            config.shutdown_timeout = Duration::from_secs(parse(ENV_SHUTDOWN_TIMEOUT, &value)?);
        }
        if let Some(value) = lookup(ENV_LOG_LEVEL) {
            if !value.trim().is_empty() {
                config.log.level = value.trim().to_string();
            }
        }
        if let Some(value) = lookup(ENV_LOG_FORMAT) {
            config.log.format = match value.trim().to_ascii_lowercase().as_str() {
                "pretty" | "text" => LogFormat::Pretty,
                "json" => LogFormat::Json,
                _ => {
                    return Err(ConfigError {
                        key: ENV_LOG_FORMAT,
                        value,
                        reason: "expected 'pretty' or 'json'".to_string(),
                    })
                }
            };
        }

        Ok(config)
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse<T>(key: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        key,
        value: value.to_string(),
        reason: e.to_string(),
    })
}
