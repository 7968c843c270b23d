//! User-facing meter settings snapshot.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Limits and currency preferences read by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterSettings {
    /// Spending at which the gauge is full, in USD.
    pub upper_limit_usd: f64,
    /// Spending at which the UI warns, in USD.
    pub warning_limit_usd: f64,
    /// ISO code of the display currency.
    pub selected_currency_code: String,
    /// Passed through to the shell; not used by the engine.
    pub launch_at_login_enabled: bool,
}

impl Default for MeterSettings {
    fn default() -> Self {
        Self {
            upper_limit_usd: 1000.0,
            warning_limit_usd: 200.0,
            selected_currency_code: "USD".to_string(),
            launch_at_login_enabled: false,
        }
    }
}

impl MeterSettings {
    /// Checks that limits are finite and positive and the currency code is
    /// three ASCII letters.
    ///
    /// # Errors
    ///
    /// Returns the first offending value.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, value) in [
            ("upper_limit_usd", self.upper_limit_usd),
            ("warning_limit_usd", self.warning_limit_usd),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(CoreError::InvalidLimit { name, value });
            }
        }
        let code = &self.selected_currency_code;
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(CoreError::InvalidCurrency(code.clone()));
        }
        Ok(())
    }
}
