//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use vibemeter_core::{
    AggregateResult, DisplayState, FormattedAmount, MultiProviderSession, ProviderId,
    StatusSummary,
};

// ============================================================================
// Output Types
// ============================================================================

/// Display state with the totals that produced it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateOutput {
    pub display: DisplayState,
    pub total_usd_cents: u64,
    pub per_provider: BTreeMap<ProviderId, u64>,
    pub upper_limit_usd: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spending: Option<String>,
}

/// Menu text.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryOutput<'a> {
    pub display: DisplayState,
    pub lines: &'a [String],
    pub has_debug_section: bool,
}

/// Result of a currency conversion.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionOutput {
    pub amount_usd: f64,
    pub currency: String,
    pub formatted: String,
    pub fell_back: bool,
}

/// A supported provider.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOutput {
    pub id: ProviderId,
    pub name: &'static str,
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats the display state.
    pub fn format_state(
        &self,
        state: DisplayState,
        totals: &AggregateResult,
        upper_limit_usd: f64,
        spending: Option<&FormattedAmount>,
    ) -> Result<String> {
        self.format(&StateOutput {
            display: state,
            total_usd_cents: totals.total_usd_cents,
            per_provider: totals.per_provider.clone(),
            upper_limit_usd,
            spending: spending.map(|s| s.text.clone()),
        })
    }

    /// Formats the menu text.
    pub fn format_summary(&self, state: DisplayState, summary: &StatusSummary) -> Result<String> {
        self.format(&SummaryOutput {
            display: state,
            lines: &summary.lines,
            has_debug_section: summary.has_debug_section,
        })
    }

    /// Formats a conversion result.
    pub fn format_conversion(
        &self,
        amount_usd: f64,
        currency: &str,
        converted: &FormattedAmount,
    ) -> Result<String> {
        self.format(&ConversionOutput {
            amount_usd,
            currency: currency.to_string(),
            formatted: converted.text.clone(),
            fell_back: converted.fell_back,
        })
    }

    /// Formats the provider list with session status.
    pub fn format_providers(&self, sessions: &MultiProviderSession) -> Result<String> {
        let outputs: Vec<ProviderOutput> = ProviderId::all()
            .iter()
            .map(|&id| {
                let session = sessions.session(id);
                ProviderOutput {
                    id,
                    name: id.display_name(),
                    logged_in: session.is_logged_in(),
                    user_email: session.user_email,
                }
            })
            .collect();

        self.format(&outputs)
    }
}
