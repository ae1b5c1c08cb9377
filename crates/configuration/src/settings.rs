use crate::error::ConfigError;
use config::builder::DefaultState;
use config::ConfigBuilder;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub environment: Environment,
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub logging: LoggingSettings,
}

/// The deployment flavour. Only affects log formatting and startup banners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

/// Contains parameters for the HTTP listener.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Requests still running after this many seconds are aborted.
    pub request_timeout_secs: u64,
}

/// Contains parameters for the PostgreSQL connection pool.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// A full connection string. When set, it takes precedence over the discrete fields below.
    #[serde(default)]
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    /// One of libpq's `sslmode` values (`disable`, `prefer`, `require`, ...).
    pub ssl_mode: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
}

/// Contains parameters for the tracing subscriber.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// An `EnvFilter` directive. `RUST_LOG` wins when it is set.
    pub level: String,
    /// When present, logs go to a daily-rolling file in this directory instead of stdout.
    #[serde(default)]
    pub directory: Option<PathBuf>,
    pub file_prefix: String,
    pub ansi: bool,
}

/// Seeds a builder with the values used when neither the file nor the environment says otherwise.
pub(crate) fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = builder
        .set_default("environment", "development")?
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", 8080)?
        .set_default("server.request_timeout_secs", 15)?
        .set_default("database.host", "127.0.0.1")?
        .set_default("database.port", 5432)?
        .set_default("database.user", "postgres")?
        .set_default("database.password", "")?
        .set_default("database.name", "employee")?
        .set_default("database.ssl_mode", "disable")?
        .set_default("database.max_connections", 25)?
        .set_default("database.min_connections", 5)?
        .set_default("database.acquire_timeout_secs", 5)?
        .set_default("logging.level", "info")?
        .set_default("logging.file_prefix", "employer.log")?
        .set_default("logging.ansi", true)?;
    Ok(builder)
}

impl Settings {
    /// Rejects settings that would only fail later, at connect or bind time.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.url.is_none() && self.database.password.is_empty() {
            return Err(ConfigError::ValidationError(
                "database.password must be set (EMPLOYER__DATABASE__PASSWORD)".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be at least 1".to_string(),
            ));
        }
        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigError::ValidationError(format!(
                "database.min_connections ({}) exceeds database.max_connections ({})",
                self.database.min_connections, self.database.max_connections
            )));
        }
        Ok(())
    }
}

impl ServerSettings {
    /// The `host:port` pair the listener binds to.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl DatabaseSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}
