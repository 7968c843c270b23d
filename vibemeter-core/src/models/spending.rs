//! Spending types.
//!
//! This module contains the raw per-provider spending inputs:
//! - [`SpendingRecord`] - One provider's fetched spending for the period
//! - [`InvoiceItem`] - A single invoice line
//! - [`RefreshStatus`] - Which providers have a refresh in flight

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::provider::ProviderId;

// ============================================================================
// Invoice Item
// ============================================================================

/// A single line of a provider invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Line description as reported by the provider.
    pub description: String,
    /// Amount in US cents. Negative for credits and refunds.
    pub cents: i64,
    /// Optional category label.
    #[serde(default)]
    pub category: Option<String>,
}

impl InvoiceItem {
    /// Creates a new item without a category.
    pub fn new(description: impl Into<String>, cents: i64) -> Self {
        Self {
            description: description.into(),
            cents,
            category: None,
        }
    }
}

// ============================================================================
// Spending Record
// ============================================================================

/// Spending fetched for one provider.
///
/// Replaced wholesale on each refresh; records are never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpendingRecord {
    /// Total spending for the period in US cents.
    pub total_cents: u64,
    /// Itemized invoice lines, in provider order. Empty when the provider
    /// only reports a total.
    #[serde(default)]
    pub items: Vec<InvoiceItem>,
    /// Pricing description id attached to the invoice, if any.
    #[serde(default)]
    pub pricing_id: Option<String>,
    /// When this record was fetched.
    pub fetched_at: DateTime<Utc>,
}

impl SpendingRecord {
    /// Creates a total-only record fetched now.
    pub fn new(total_cents: u64) -> Self {
        Self {
            total_cents,
            items: Vec::new(),
            pricing_id: None,
            fetched_at: Utc::now(),
        }
    }

    /// Creates an itemized record fetched now.
    pub fn with_items(total_cents: u64, items: Vec<InvoiceItem>) -> Self {
        Self {
            items,
            ..Self::new(total_cents)
        }
    }

    /// Total spending in US dollars.
    #[allow(clippy::cast_precision_loss)]
    pub fn total_usd(&self) -> f64 {
        self.total_cents as f64 / 100.0
    }

    /// Returns true if the provider delivered an itemized breakdown.
    pub fn is_itemized(&self) -> bool {
        !self.items.is_empty()
    }
}

// ============================================================================
// Refresh Status
// ============================================================================

/// Refresh-in-flight flags keyed by provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RefreshStatus {
    in_flight: BTreeMap<ProviderId, bool>,
}

impl RefreshStatus {
    /// Creates a status with no refreshes in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the in-flight flag for a provider.
    pub fn set(&mut self, provider: ProviderId, in_flight: bool) {
        self.in_flight.insert(provider, in_flight);
    }

    /// Returns true if the provider has a refresh in flight.
    pub fn is_refreshing(&self, provider: ProviderId) -> bool {
        self.in_flight.get(&provider).copied().unwrap_or(false)
    }

    /// Returns true if any provider has a refresh in flight.
    pub fn any_in_flight(&self) -> bool {
        self.in_flight.values().any(|&v| v)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_total_usd() {
        assert_eq!(SpendingRecord::new(12_345).total_usd(), 123.45);
        assert_eq!(SpendingRecord::new(0).total_usd(), 0.0);
    }

    #[test]
    fn test_itemized_capability() {
        assert!(!SpendingRecord::new(500).is_itemized());
        let record = SpendingRecord::with_items(500, vec![InvoiceItem::new("Usage", 500)]);
        assert!(record.is_itemized());
    }

    #[test]
    fn test_refresh_status_any() {
        let mut status = RefreshStatus::new();
        assert!(!status.any_in_flight());

        status.set(ProviderId::Cursor, false);
        assert!(!status.any_in_flight());

        status.set(ProviderId::Claude, true);
        assert!(status.any_in_flight());
        assert!(status.is_refreshing(ProviderId::Claude));
        assert!(!status.is_refreshing(ProviderId::Cursor));
    }
}
