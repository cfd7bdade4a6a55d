use std::time::Duration;
use tracing::level_filters::LevelFilter;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Log output settings. Read separately from [`Config`] so logging can come
/// up before the rest of the configuration is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSettings {
    pub level: LevelFilter,
    pub environment: Option<String>,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unknown `LOG_LEVEL` values fall back to `info` rather than failing,
    /// since the logger has to exist to report anything at all.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let level = lookup("LOG_LEVEL")
            .and_then(|v| parse_log_level(&v))
            .unwrap_or(LevelFilter::INFO);
        let environment = lookup("NODE_ENV").filter(|v| !v.trim().is_empty());
        Self { level, environment }
    }

    pub fn is_development(&self) -> bool {
        self.environment.as_deref() == Some("development")
    }

    /// `NODE_ENV` as attached to log records, `unset` when absent.
    pub fn environment_label(&self) -> &str {
        self.environment.as_deref().unwrap_or("unset")
    }
}

/// Maps winston-style level names onto tracing levels.
pub fn parse_log_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "error" => Some(LevelFilter::ERROR),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "info" => Some(LevelFilter::INFO),
        "http" | "verbose" | "debug" => Some(LevelFilter::DEBUG),
        "silly" | "trace" => Some(LevelFilter::TRACE),
        "off" | "silent" => Some(LevelFilter::OFF),
        _ => None,
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub mongo_uri: String,
    pub connect_timeout: Duration,
    pub log: LogSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "PORT",
                value: v,
            })?,
            None => DEFAULT_PORT,
        };

        let mongo_uri = lookup("MONGO_URI")
            .filter(|v| !v.trim().is_empty())
            .ok_or(ConfigError::Missing("MONGO_URI"))?;

        let connect_timeout = match lookup("MONGO_CONNECT_TIMEOUT_SECS") {
            Some(v) => match v.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "MONGO_CONNECT_TIMEOUT_SECS",
                        value: v,
                    })
                }
            },
            None => Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self {
            port,
            mongo_uri,
            connect_timeout,
            log: LogSettings::from_lookup(&lookup),
        })
    }

    pub fn log_level_name(&self) -> String {
        self.log.level.to_string().to_ascii_lowercase()
    }
}
