//! Portal configuration.
//!
//! Loaded from an optional `atrium.toml` in the working directory, then
//! `ATRIUM_*` environment variables (e.g. `ATRIUM_ORIGIN`,
//! `ATRIUM_CREDENTIAL_HEADER`). Missing keys take their defaults.

use std::path::Path;

use atrium_application::PortalSettings;
use atrium_domain::DEFAULT_CREDENTIAL_HEADER;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

/// Configuration file looked up by `PortalConfig::load`.
pub const DEFAULT_CONFIG_FILE: &str = "atrium.toml";

const ENV_PREFIX: &str = "ATRIUM";

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The origin is not an absolute http(s) URL.
    #[error("invalid origin '{origin}': {reason}")]
    InvalidOrigin {
        /// Configured value.
        origin: String,
        /// What is wrong with it.
        reason: String,
    },

    /// The settings path is not absolute.
    #[error("settings path must start with '/': {0}")]
    InvalidSettingsPath(String),
}

/// Runtime configuration of the portal.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PortalConfig {
    /// Origin that endpoint paths are resolved against.
    pub origin: String,
    /// Path of the settings document, relative to the origin.
    pub settings_path: String,
    /// Header the credential is sent in.
    pub credential_header: String,
    /// Default log filter, used when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            origin: "http://localhost:3000".to_string(),
            settings_path: "/api/settings".to_string(),
            credential_header: DEFAULT_CREDENTIAL_HEADER.to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl PortalConfig {
    /// Loads configuration from `atrium.toml` and the environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source is malformed or a value is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Loads configuration from the given file and the environment.
    ///
    /// The file is optional; environment variables take precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a source is malformed or a value is invalid.
    pub fn load_from(file: &Path) -> Result<Self, ConfigError> {
        Self::build(file, Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn build(file: &Path, environment: config::Environment) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::from(file).required(false))
            .add_source(environment)
            .build()?;

        let portal: Self = config.try_deserialize()?;
        portal.validated()
    }

    /// Checks the values and normalizes the origin.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for a non-http(s) origin or a relative
    /// settings path.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidOrigin {
            origin: self.origin.clone(),
            reason,
        };

        let url = Url::parse(&self.origin).map_err(|e| invalid(e.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
        }
        if !url.has_host() {
            return Err(invalid("missing host".to_string()));
        }
        if !self.settings_path.starts_with('/') {
            return Err(ConfigError::InvalidSettingsPath(self.settings_path));
        }

        let trimmed_len = self.origin.trim_end_matches('/').len();
        self.origin.truncate(trimmed_len);
        Ok(self)
    }

    /// Settings handed to the portal controller.
    #[must_use]
    pub fn portal_settings(&self) -> PortalSettings {
        PortalSettings {
            origin: self.origin.clone(),
            credential_header: self.credential_header.clone(),
        }
    }
}
