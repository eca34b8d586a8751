//! Settings loaded from TOML with environment overrides.

use config::{Config, Environment, File, FileFormat};
use error_stack::{Report, ResultExt};
use log::LevelFilter;
use serde::{Deserialize, Serialize};

use crate::error::VastError;

const DEFAULT_SETTINGS_TOML: &str = include_str!("../../../trusted-server-vast.toml");
const ENVIRONMENT_PREFIX: &str = "TRUSTED_SERVER_VAST";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Logging {
    pub level: String,
}

impl Logging {
    /// Parses `level` into a filter.
    ///
    /// # Errors
    ///
    /// Returns [`VastError::Configuration`] if `level` is not a log level name.
    pub fn level_filter(&self) -> Result<LevelFilter, Report<VastError>> {
        self.level.parse().map_err(|_| {
            Report::new(VastError::Configuration {
                message: format!("unknown log level \"{}\"", self.level),
            })
        })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Limits {
    /// Largest input document accepted by the command line tool.
    pub max_input_bytes: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub logging: Logging,
    pub limits: Limits,
}

impl Settings {
    /// Loads the embedded defaults, with environment overrides applied.
    ///
    /// # Errors
    ///
    /// Returns [`VastError::Configuration`] if an override makes the settings
    /// invalid.
    pub fn new() -> Result<Self, Report<VastError>> {
        Self::from_toml(DEFAULT_SETTINGS_TOML)
    }

    /// Loads settings from a TOML string. Environment variables prefixed with
    /// `TRUSTED_SERVER_VAST__` override values, e.g.
    /// `TRUSTED_SERVER_VAST__LOGGING__LEVEL=debug`.
    ///
    /// # Errors
    ///
    /// Returns [`VastError::Configuration`] if the TOML is invalid, a section
    /// is missing, or the log level is unknown.
    pub fn from_toml(toml_str: &str) -> Result<Self, Report<VastError>> {
        let environment = Environment::default()
            .prefix(ENVIRONMENT_PREFIX)
            .separator("__");

        let toml = File::from_str(toml_str, FileFormat::Toml);
        let config = Config::builder()
            .add_source(toml)
            .add_source(environment)
            .build()
            .change_context(VastError::Configuration {
                message: "failed to build settings".to_string(),
            })?;

        let settings: Self = config
            .try_deserialize()
            .change_context(VastError::Configuration {
                message: "failed to deserialize settings".to_string(),
            })?;

        settings.logging.level_filter()?;
        Ok(settings)
    }
}
