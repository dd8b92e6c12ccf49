//! # Configuration
//!
//! Application configuration loaded with the `config` crate.
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. A TOML file (`shipping-rates.toml` by default, optional)
//! 2. Environment variables prefixed with `SHIPPING_RATES__`, using `__`
//!    between nested keys, e.g. `SHIPPING_RATES__CARRIERS__UPS__ACCESS_TOKEN`
//!
//! A `.env` file in the working directory is loaded into the environment
//! first when present.
//!
//! # Example
//!
//! ```toml
//! [logging]
//! level = "shipping_rates=debug,info"
//! format = "json"
//!
//! [carriers.ups]
//! access_token = "..."
//! timeout_ms = 8000
//!
//! [carriers.usps]
//! base_url = "https://apis-tem.usps.com"
//! access_token = "..."
//! ```

use crate::infrastructure::carriers::{UpsConfig, UspsConfig};
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Default configuration file name, without extension.
pub const DEFAULT_CONFIG_FILE: &str = "shipping-rates";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "SHIPPING_RATES";

const ENV_SEPARATOR: &str = "__";

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was read but is unusable.
    #[error("invalid configuration value for {key}: {message}")]
    Invalid {
        /// Dotted key of the offending value.
        key: String,
        /// What is wrong with it.
        message: String,
    },
}

impl ConfigError {
    fn invalid(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Invalid {
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable single-line output.
    #[default]
    Compact,
    /// One JSON object per event.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive used when `RUST_LOG` is not set.
    pub level: String,
    /// Output format.
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// Carrier client settings. A carrier without a section is not registered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarriersConfig {
    /// UPS Rating API settings.
    pub ups: Option<UpsConfig>,
    /// USPS prices API settings.
    pub usps: Option<UspsConfig>,
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Carrier settings.
    pub carriers: CarriersConfig,
}

impl AppConfig {
    /// Loads configuration from a file and the environment.
    ///
    /// With `path` set the file must exist; otherwise
    /// [`DEFAULT_CONFIG_FILE`] is read if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Load` if a source cannot be parsed and
    /// `ConfigError::Invalid` if [`validate`](Self::validate) fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };
        let config: Self = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from TOML text, without the environment.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load).
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks values that deserialize but cannot be used.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        EnvFilter::try_new(&self.logging.level)
            .map_err(|e| ConfigError::invalid("logging.level", e.to_string()))?;

        if let Some(ups) = &self.carriers.ups {
            check_carrier("carriers.ups", &ups.base_url, &ups.access_token, ups.timeout_ms)?;
        }
        if let Some(usps) = &self.carriers.usps {
            check_carrier(
                "carriers.usps",
                &usps.base_url,
                &usps.access_token,
                usps.timeout_ms,
            )?;
            if usps.price_type.trim().is_empty() {
                return Err(ConfigError::invalid(
                    "carriers.usps.price_type",
                    "must not be empty",
                ));
            }
        }
        Ok(())
    }
}

fn check_carrier(
    section: &str,
    base_url: &str,
    access_token: &str,
    timeout_ms: u64,
) -> Result<(), ConfigError> {
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::invalid(
            format!("{section}.base_url"),
            format!("'{base_url}' is not an http(s) URL"),
        ));
    }
    if access_token.trim().is_empty() {
        return Err(ConfigError::invalid(
            format!("{section}.access_token"),
            "must not be empty",
        ));
    }
    if timeout_ms == 0 {
        return Err(ConfigError::invalid(
            format!("{section}.timeout_ms"),
            "must be greater than zero",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::carriers::ups::{DEFAULT_UPS_BASE_URL, DEFAULT_UPS_TIMEOUT_MS};

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_toml("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.logging.level, "info");
        assert!(config.carriers.ups.is_none());
    }

    #[test]
    fn carrier_sections() {
        let config = AppConfig::from_toml(
            r#"
            [logging]
            format = "json"

            [carriers.ups]
            access_token = "ups-token"

            [carriers.usps]
            base_url = "https://apis-tem.usps.com"
            access_token = "usps-token"
            timeout_ms = 2500
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.format, LogFormat::Json);
        let ups = config.carriers.ups.unwrap();
        assert_eq!(ups.base_url, DEFAULT_UPS_BASE_URL);
        assert_eq!(ups.timeout_ms, DEFAULT_UPS_TIMEOUT_MS);
        let usps = config.carriers.usps.unwrap();
        assert_eq!(usps.timeout_ms, 2500);
        assert_eq!(usps.price_type, "RETAIL");
    }

    #[test]
    fn blank_token_rejected() {
        let err = AppConfig::from_toml(
            r#"
            [carriers.ups]
            access_token = "  "
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("carriers.ups.access_token"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let err = AppConfig::from_toml(
            r#"
            [carriers.usps]
            access_token = "t"
            timeout_ms = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "carriers.usps.timeout_ms"));
    }

    #[test]
    fn non_http_base_url_rejected() {
        let err = AppConfig::from_toml(
            r#"
            [carriers.ups]
            base_url = "onlinetools.ups.com"
            access_token = "t"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("carriers.ups.base_url"));
    }

    #[test]
    fn unknown_format_is_load_error() {
        let err = AppConfig::from_toml("[logging]\nformat = \"xml\"").unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }

    #[test]
    fn missing_explicit_file_is_load_error() {
        let err = AppConfig::load(Some(Path::new("/nonexistent/shipping-rates.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Load(_)));
    }
}
