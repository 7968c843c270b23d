//! Exchange rate table.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// The currency every amount in the engine is denominated in.
pub const BASE_CURRENCY: &str = "USD";

fn default_base() -> String {
    BASE_CURRENCY.to_string()
}

/// Point-in-time currency multipliers relative to USD.
///
/// A code missing from `rates` means "not convertible now", never "rate 1".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateTable {
    /// Base currency of the multipliers. Always USD.
    #[serde(default = "default_base")]
    pub base_currency: String,
    /// ISO currency code to multiplier.
    #[serde(default)]
    pub rates: HashMap<String, f64>,
    /// When these rates were published.
    pub as_of: DateTime<Utc>,
}

impl ExchangeRateTable {
    /// Creates an empty table as of now.
    pub fn new() -> Self {
        Self {
            base_currency: default_base(),
            rates: HashMap::new(),
            as_of: Utc::now(),
        }
    }

    /// Builder-style helper adding one rate.
    #[must_use]
    pub fn with_rate(mut self, code: impl Into<String>, rate: f64) -> Self {
        self.rates.insert(code.into().to_ascii_uppercase(), rate);
        self
    }

    /// Returns the multiplier for a currency code.
    ///
    /// The base currency is always 1.0. Non-finite or non-positive entries
    /// count as absent.
    pub fn rate(&self, code: &str) -> Option<f64> {
        let code = code.trim();
        if code.eq_ignore_ascii_case(&self.base_currency) {
            return Some(1.0);
        }
        self.rates
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(code))
            .map(|(_, r)| *r)
            .filter(|r| r.is_finite() && *r > 0.0)
    }

    /// Returns true if the table is older than `max_age` at `now`.
    pub fn is_stale(&self, max_age: Duration, now: DateTime<Utc>) -> bool {
        now - self.as_of > max_age
    }
}

impl Default for ExchangeRateTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_lookup_is_case_insensitive() {
        let table = ExchangeRateTable::new().with_rate("eur", 0.9);
        assert_eq!(table.rate("EUR"), Some(0.9));
        assert_eq!(table.rate("eur"), Some(0.9));
    }

    #[test]
    fn test_base_currency_always_supported() {
        let table = ExchangeRateTable::new();
        assert_eq!(table.rate("USD"), Some(1.0));
        assert_eq!(table.rate("EUR"), None);
    }

    #[test]
    fn test_invalid_rates_count_as_absent() {
        let table = ExchangeRateTable::new()
            .with_rate("AAA", 0.0)
            .with_rate("BBB", -1.5)
            .with_rate("CCC", f64::NAN)
            .with_rate("DDD", f64::INFINITY);
        for code in ["AAA", "BBB", "CCC", "DDD"] {
            assert_eq!(table.rate(code), None, "{code} should be unsupported");
        }
    }

    #[test]
    fn test_staleness() {
        let mut table = ExchangeRateTable::new();
        let now = Utc::now();
        table.as_of = now - Duration::hours(30);
        assert!(table.is_stale(Duration::hours(24), now));
        assert!(!table.is_stale(Duration::hours(48), now));
    }
}
