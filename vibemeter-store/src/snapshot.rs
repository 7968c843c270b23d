//! Provider-side input snapshot.
//!
//! The JSON shape of [`MeterSnapshot`] is what the CLI reads:
//!
//! ```json
//! {
//!   "sessions":   { "cursor": { "status": "logged_in", "user_email": "dev@example.com" } },
//!   "spending":   { "cursor": { "total_cents": 4200, "items": [], "fetched_at": "2025-06-01T12:00:00Z" } },
//!   "refreshing": { "cursor": false },
//!   "rates":      { "rates": { "EUR": 0.92 }, "as_of": "2025-06-01T00:00:00Z" }
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use vibemeter_core::{
    AggregateResult, DisplayState, EngineInputs, ExchangeRateTable, MeterSettings,
    MultiProviderSession, ProviderId, RefreshStatus, SpendingRecord, StatusSummary,
    StatusSummaryBuilder, aggregate, target_state,
};

use crate::error::StoreError;
use crate::persistence::{load_json, load_json_or_default};

/// Everything the external session/data collaborators deliver.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterSnapshot {
    /// Session state per provider.
    pub sessions: MultiProviderSession,
    /// Latest spending record per provider. Absent means not fetched yet.
    pub spending: BTreeMap<ProviderId, SpendingRecord>,
    /// Refresh-in-flight flags.
    pub refreshing: RefreshStatus,
    /// Exchange rates, if any have been fetched.
    pub rates: Option<ExchangeRateTable>,
}

impl MeterSnapshot {
    /// Loads a snapshot from a JSON file.
    pub async fn load(path: &Path) -> Result<Self, StoreError> {
        load_json(path).await
    }

    /// Loads a snapshot, falling back to an empty one if the file is
    /// missing or malformed.
    pub async fn load_or_default(path: &Path) -> Self {
        load_json_or_default(path).await
    }

    /// Aggregates the spending records.
    pub fn aggregate(&self) -> AggregateResult {
        aggregate(&self.spending)
    }

    /// Display state for this snapshot alone, without hysteresis.
    pub fn display_state(&self, settings: &MeterSettings) -> DisplayState {
        let totals = self.aggregate();
        target_state(&EngineInputs {
            sessions: &self.sessions,
            refreshing: &self.refreshing,
            aggregate: &totals,
            upper_limit_usd: settings.upper_limit_usd,
        })
    }

    /// Builds the status summary for this snapshot.
    pub fn summary(&self, builder: &StatusSummaryBuilder, settings: &MeterSettings) -> StatusSummary {
        builder.build(&self.sessions, &self.spending, self.rates.as_ref(), settings)
    }
}
