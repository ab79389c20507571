//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field has a default, so an absent file is a valid
//! configuration.

pub mod cli;
pub mod logging;
pub mod sharing;

use serde::{Deserialize, Serialize};

use self::cli::CliConfig;
use self::logging::LoggingConfig;
use self::sharing::SharingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// Top-level deserialization target for the merged configuration sources
/// (base file + environment overlay + `LINKSHARE__*` variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Link-share controller policy.
    #[serde(default)]
    pub sharing: SharingConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Command-line front end settings.
    #[serde(default)]
    pub cli: CliConfig,
}

impl AppConfig {
    /// Load configuration.
    ///
    /// Merges the base file at `path` (extension optional), an
    /// environment-specific overlay `config/{env}`, and environment
    /// variables prefixed with `LINKSHARE__`. Missing files are skipped.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("LINKSHARE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let loaded: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;
        loaded.sharing.validate()?;
        Ok(loaded)
    }
}

fn default_true() -> bool {
    true
}
