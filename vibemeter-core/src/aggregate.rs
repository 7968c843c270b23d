//! Cross-provider spending totals.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{ProviderId, SpendingRecord};

/// Combined spending across providers.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AggregateResult {
    /// Sum of all present providers, in US cents.
    pub total_usd_cents: u64,
    /// Cents per provider. Only providers with a record appear here; a
    /// provider with zero spend is present with `0`.
    pub per_provider: BTreeMap<ProviderId, u64>,
}

impl AggregateResult {
    /// Returns true if at least one provider has delivered a record.
    pub fn has_data(&self) -> bool {
        !self.per_provider.is_empty()
    }

    /// Total spending in US dollars.
    #[allow(clippy::cast_precision_loss)]
    pub fn total_usd(&self) -> f64 {
        self.total_usd_cents as f64 / 100.0
    }

    /// Returns the total in dollars, or `None` when nothing was fetched yet.
    pub fn total_usd_if_known(&self) -> Option<f64> {
        self.has_data().then(|| self.total_usd())
    }
}

/// Sums spending records into a total and a per-provider breakdown.
pub fn aggregate(records: &BTreeMap<ProviderId, SpendingRecord>) -> AggregateResult {
    let per_provider: BTreeMap<ProviderId, u64> = records
        .iter()
        .map(|(id, record)| (*id, record.total_cents))
        .collect();
    let total_usd_cents = per_provider
        .values()
        .fold(0u64, |acc, cents| acc.saturating_add(*cents));

    AggregateResult {
        total_usd_cents,
        per_provider,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_has_no_data() {
        let result = aggregate(&BTreeMap::new());
        assert!(!result.has_data());
        assert_eq!(result.total_usd_cents, 0);
        assert_eq!(result.total_usd_if_known(), None);
    }

    #[test]
    fn test_zero_spend_is_still_data() {
        let mut records = BTreeMap::new();
        records.insert(ProviderId::Cursor, SpendingRecord::new(0));

        let result = aggregate(&records);
        assert!(result.has_data());
        assert_eq!(result.per_provider.get(&ProviderId::Cursor), Some(&0));
        assert_eq!(result.total_usd_if_known(), Some(0.0));
    }

    #[test]
    fn test_sums_providers() {
        let mut records = BTreeMap::new();
        records.insert(ProviderId::Cursor, SpendingRecord::new(1250));
        records.insert(ProviderId::Claude, SpendingRecord::new(750));

        let result = aggregate(&records);
        assert_eq!(result.total_usd_cents, 2000);
        assert_eq!(result.total_usd(), 20.0);
        assert_eq!(result.per_provider.len(), 2);
        assert!(!result.per_provider.is_empty());
    }

    #[test]
    fn test_total_saturates() {
        let mut records = BTreeMap::new();
        records.insert(ProviderId::Cursor, SpendingRecord::new(u64::MAX));
        records.insert(ProviderId::Claude, SpendingRecord::new(10));

        assert_eq!(aggregate(&records).total_usd_cents, u64::MAX);
    }
}
