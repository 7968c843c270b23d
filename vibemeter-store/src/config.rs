//! Configuration loading.

use crate::error::StoreError;
use crate::persistence::default_config_path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use vibemeter_core::{DEFAULT_MAX_OTHER_ITEMS, MeterSettings};

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeterConfig {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Spending limits and display currency.
    #[serde(default)]
    pub spending: SpendingConfig,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level for `vibemeter` targets when neither `--verbose` nor
    /// `--quiet` is given. Unknown levels fall back to `warn`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Ordinary invoice lines shown before collapsing into "... and N more".
    #[serde(default = "default_max_invoice_items")]
    pub max_invoice_items: usize,
    /// Age in hours after which exchange rates are reported as stale.
    #[serde(default = "default_rates_max_age_hours")]
    pub rates_max_age_hours: u32,
    /// Passed through to the shell.
    #[serde(default)]
    pub launch_at_login: bool,
}

/// Limit and currency settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpendingConfig {
    /// Spending at which the gauge is full, in USD.
    #[serde(default = "default_upper_limit")]
    pub upper_limit_usd: f64,
    /// Spending at which the UI warns, in USD.
    #[serde(default = "default_warning_limit")]
    pub warning_limit_usd: f64,
    /// ISO code of the display currency.
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_max_invoice_items() -> usize {
    DEFAULT_MAX_OTHER_ITEMS
}

fn default_rates_max_age_hours() -> u32 {
    24
}

fn default_upper_limit() -> f64 {
    MeterSettings::default().upper_limit_usd
}

fn default_warning_limit() -> f64 {
    MeterSettings::default().warning_limit_usd
}

fn default_currency() -> String {
    MeterSettings::default().selected_currency_code
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            max_invoice_items: default_max_invoice_items(),
            rates_max_age_hours: default_rates_max_age_hours(),
            launch_at_login: false,
        }
    }
}

impl Default for SpendingConfig {
    fn default() -> Self {
        Self {
            upper_limit_usd: default_upper_limit(),
            warning_limit_usd: default_warning_limit(),
            currency: default_currency(),
        }
    }
}

impl MeterConfig {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads configuration from the default path.
    pub fn load() -> Result<Self, StoreError> {
        Self::load_from(&Self::default_path())
    }

    /// Loads configuration from a specific path.
    ///
    /// A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self, StoreError> {
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: MeterConfig = serde_json::from_str(&content)?;

        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Builds the settings snapshot the engine reads.
    ///
    /// # Errors
    ///
    /// Returns an error if a limit is not finite and positive or the
    /// currency is not a three-letter code.
    pub fn to_settings(&self) -> Result<MeterSettings, StoreError> {
        let settings = MeterSettings {
            upper_limit_usd: self.spending.upper_limit_usd,
            warning_limit_usd: self.spending.warning_limit_usd,
            selected_currency_code: self.spending.currency.trim().to_ascii_uppercase(),
            launch_at_login_enabled: self.general.launch_at_login,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Returns the staleness threshold for exchange rates.
    pub fn rates_max_age(&self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.general.rates_max_age_hours))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let config = MeterConfig::load_from(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.general.max_invoice_items, 8);
        assert_eq!(config.spending.currency, "USD");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"spending": {"currency": "eur", "upper_limit_usd": 250}}"#)
            .unwrap();

        let config = MeterConfig::load_from(&path).unwrap();
        let settings = config.to_settings().unwrap();
        assert_eq!(settings.selected_currency_code, "EUR");
        assert_eq!(settings.upper_limit_usd, 250.0);
        assert_eq!(settings.warning_limit_usd, 200.0);
        assert_eq!(config.general.log_level, "warn");
    }

    #[test]
    fn test_log_level_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"general": {"log_level": "debug"}}"#).unwrap();

        let config = MeterConfig::load_from(&path).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.general.max_invoice_items, 8);
    }

    #[test]
    fn test_malformed_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            MeterConfig::load_from(&path),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn test_invalid_limit_rejected() {
        let mut config = MeterConfig::default();
        config.spending.upper_limit_usd = -5.0;
        assert!(matches!(config.to_settings(), Err(StoreError::Core(_))));
    }

    #[test]
    fn test_rates_max_age() {
        let mut config = MeterConfig::default();
        config.general.rates_max_age_hours = 6;
        assert_eq!(config.rates_max_age(), chrono::Duration::hours(6));
    }
}
