//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `EMERGENCY_RELAY` prefix and nested values use double underscores as
//! separators. Every value has a default, so an empty environment is valid.
//!
//! # Example
//!
//! ```no_run
//! use emergency_relay::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod error;
mod server;
mod sirens;

pub use error::{ConfigError, ValidationError};
pub use server::{Environment, ServerConfig};
pub use sirens::SirenConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment, logging, CORS)
    #[serde(default)]
    pub server: ServerConfig,

    /// Siren lifetime and registry capacity
    #[serde(default)]
    pub sirens: SirenConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `EMERGENCY_RELAY` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// # Environment Variable Format
    ///
    /// - `EMERGENCY_RELAY__SERVER__PORT=3001` -> `server.port = 3001`
    /// - `EMERGENCY_RELAY__SIRENS__DURATION_SECS=30` -> `sirens.duration_secs = 30`
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("EMERGENCY_RELAY")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.sirens.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
