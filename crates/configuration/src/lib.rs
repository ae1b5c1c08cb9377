use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use logging::init_tracing;
pub use settings::{DatabaseSettings, Environment, LoggingSettings, ServerSettings, Settings};

/// The file consulted by [`load_settings`] when it exists.
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

/// The prefix for environment overrides, e.g. `EMPLOYER__DATABASE__PASSWORD`.
pub const ENV_PREFIX: &str = "EMPLOYER";

/// Loads the application settings from `config.toml` (if present) and the environment.
///
/// This function is the primary entry point for this crate. Sources are layered:
/// built-in defaults first, then the file, then `EMPLOYER__*` environment variables.
/// The result is validated before it is returned.
pub fn load_settings() -> Result<Settings, ConfigError> {
    load_settings_from(Path::new(DEFAULT_CONFIG_FILE))
}

/// Same as [`load_settings`] but reads the optional file from `path`.
pub fn load_settings_from(path: &Path) -> Result<Settings, ConfigError> {
    let builder = settings::with_defaults(config::Config::builder())?
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.validate()?;

    Ok(settings)
}
