//! Status menu summary.
//!
//! [`StatusSummaryBuilder`] turns one snapshot of sessions, spending, rates
//! and settings into the ordered text lines of the status menu. Action items
//! (refresh, settings, log out) belong to the shell and are not produced
//! here.

use std::collections::BTreeMap;

use crate::aggregate::aggregate;
use crate::currency::{FormattedAmount, format_money};
use crate::invoice::{DEFAULT_MAX_OTHER_ITEMS, summarize};
use crate::models::{
    ExchangeRateTable, MeterSettings, MultiProviderSession, ProviderId, SpendingRecord,
    StatusSummary,
};

/// Banner shown when the team lookup failed for a logged-in account.
pub const TEAM_FETCH_FAILED_BANNER: &str = "Can't find your team right now. Try a refresh?";
/// Banner shown once when any amount had to fall back to USD.
pub const RATES_UNAVAILABLE_BANNER: &str = "Exchange rates unavailable. Showing USD for now.";

const PRICING_ID_CHARS: usize = 8;

/// Builds [`StatusSummary`] values.
#[derive(Debug, Clone)]
pub struct StatusSummaryBuilder {
    max_invoice_items: usize,
}

impl Default for StatusSummaryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusSummaryBuilder {
    /// Creates a builder with the default invoice cap.
    pub fn new() -> Self {
        Self {
            max_invoice_items: DEFAULT_MAX_OTHER_ITEMS,
        }
    }

    /// Sets the cap on ordinary invoice lines.
    #[must_use]
    pub fn with_max_invoice_items(mut self, max: usize) -> Self {
        self.max_invoice_items = max;
        self
    }

    /// Builds the summary for one snapshot.
    pub fn build(
        &self,
        sessions: &MultiProviderSession,
        spending: &BTreeMap<ProviderId, SpendingRecord>,
        rates: Option<&ExchangeRateTable>,
        settings: &MeterSettings,
    ) -> StatusSummary {
        let mut money = MoneyFormatter {
            currency: &settings.selected_currency_code,
            rates,
            fell_back: false,
        };
        let mut body = Vec::new();
        let mut has_debug_section = false;

        let active = sessions.active_provider();
        match active {
            Some(provider) => {
                let session = sessions.session(provider);
                body.push(match &session.user_email {
                    Some(email) => format!("Logged In As: {email}"),
                    None => "Logged In".to_string(),
                });

                let current = match aggregate(spending).total_usd_if_known() {
                    Some(total) => money.format(total),
                    None => "Loading...".to_string(),
                };
                body.push(format!("Current Spending: {current}"));
                body.push(format!("Warning at: {}", money.format(settings.warning_limit_usd)));
                body.push(format!("Max: {}", money.format(settings.upper_limit_usd)));

                if let Some(team) = &session.team_name {
                    body.push(format!("Team: {team}"));
                }

                if let Some(record) = spending.get(&provider).filter(|r| r.is_itemized()) {
                    self.push_invoice_block(&mut body, record, &mut money);
                    has_debug_section = true;
                }
            }
            None => {
                let authenticating = sessions.iter().any(|(_, s)| s.is_authenticating());
                body.push(if authenticating {
                    "Logging In...".to_string()
                } else {
                    "Not Logged In".to_string()
                });
            }
        }

        let mut lines = banners(sessions, active, money.fell_back);
        if !lines.is_empty() {
            lines.push(StatusSummary::SEPARATOR.to_string());
        }
        lines.extend(body);

        StatusSummary {
            lines,
            has_debug_section,
        }
    }

    fn push_invoice_block(
        &self,
        body: &mut Vec<String>,
        record: &SpendingRecord,
        money: &mut MoneyFormatter<'_>,
    ) {
        body.push(StatusSummary::SEPARATOR.to_string());
        body.push("Invoice Details".to_string());
        body.push(format!("Total: {}", money.format(record.total_usd())));
        body.push(format!("Usage Items: {}", record.items.len()));

        let lines = summarize(&record.items, money.rates, money.currency, self.max_invoice_items);
        body.extend(lines.iter().map(ToString::to_string));

        if let Some(pricing_id) = &record.pricing_id {
            let short: String = pricing_id.chars().take(PRICING_ID_CHARS).collect();
            body.push(format!("Pricing ID: {short}..."));
        }
    }
}

/// Formats amounts and remembers whether any of them fell back to USD.
struct MoneyFormatter<'a> {
    currency: &'a str,
    rates: Option<&'a ExchangeRateTable>,
    fell_back: bool,
}

impl MoneyFormatter<'_> {
    fn format(&mut self, amount_usd: f64) -> String {
        let FormattedAmount { text, fell_back } = format_money(amount_usd, self.currency, self.rates);
        self.fell_back |= fell_back;
        text
    }
}

/// Contextual banners in fixed order: provider error, team lookup failure,
/// missing rates.
fn banners(
    sessions: &MultiProviderSession,
    active: Option<ProviderId>,
    rates_fell_back: bool,
) -> Vec<String> {
    let mut lines = Vec::new();

    let error = match active {
        Some(provider) => sessions.session(provider).last_error_message,
        None => sessions
            .iter()
            .find_map(|(_, s)| s.last_error_message.clone()),
    };
    if let Some(message) = error {
        lines.push(message);
    }

    if let Some(provider) = active {
        if sessions.session(provider).team_fetch_failed {
            lines.push(TEAM_FETCH_FAILED_BANNER.to_string());
        }
    }

    if rates_fell_back {
        lines.push(RATES_UNAVAILABLE_BANNER.to_string());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{InvoiceItem, ProviderSessionState};

    fn logged_in() -> MultiProviderSession {
        let mut sessions = MultiProviderSession::new();
        sessions.set(ProviderId::Cursor, ProviderSessionState::logged_in("dev@example.com"));
        sessions
    }

    fn spending(record: SpendingRecord) -> BTreeMap<ProviderId, SpendingRecord> {
        let mut map = BTreeMap::new();
        map.insert(ProviderId::Cursor, record);
        map
    }

    fn eur_rates() -> ExchangeRateTable {
        ExchangeRateTable::new().with_rate("EUR", 0.5)
    }

    fn eur_settings() -> MeterSettings {
        MeterSettings {
            upper_limit_usd: 100.0,
            warning_limit_usd: 50.0,
            selected_currency_code: "EUR".to_string(),
            launch_at_login_enabled: false,
        }
    }

    #[test]
    fn test_not_logged_in() {
        let summary = StatusSummaryBuilder::new().build(
            &MultiProviderSession::new(),
            &BTreeMap::new(),
            None,
            &MeterSettings::default(),
        );
        assert_eq!(summary.lines, vec!["Not Logged In"]);
        assert!(!summary.has_debug_section);
    }

    #[test]
    fn test_logging_in() {
        let mut sessions = MultiProviderSession::new();
        sessions.session_mut(ProviderId::Cursor).start_authenticating();
        let summary =
            StatusSummaryBuilder::new().build(&sessions, &BTreeMap::new(), None, &eur_settings());
        assert_eq!(summary.lines, vec!["Logging In..."]);
    }

    #[test]
    fn test_converted_lines() {
        let summary = StatusSummaryBuilder::new().build(
            &logged_in(),
            &spending(SpendingRecord::new(2000)),
            Some(&eur_rates()),
            &eur_settings(),
        );
        assert_eq!(
            summary.lines,
            vec![
                "Logged In As: dev@example.com",
                "Current Spending: €10.00",
                "Warning at: €25.00",
                "Max: €50.00",
            ]
        );
        assert!(!summary.has_debug_section);
    }

    #[test]
    fn test_missing_rate_falls_back_with_single_banner() {
        let summary = StatusSummaryBuilder::new().build(
            &logged_in(),
            &spending(SpendingRecord::new(10_000)),
            Some(&ExchangeRateTable::new()),
            &eur_settings(),
        );
        assert_eq!(
            summary.lines,
            vec![
                RATES_UNAVAILABLE_BANNER,
                StatusSummary::SEPARATOR,
                "Logged In As: dev@example.com",
                "Current Spending: $100.00 (USD)",
                "Warning at: $50.00 (USD)",
                "Max: $100.00 (USD)",
            ]
        );
    }

    #[test]
    fn test_no_data_yet_shows_loading() {
        let summary = StatusSummaryBuilder::new().build(
            &logged_in(),
            &BTreeMap::new(),
            Some(&eur_rates()),
            &eur_settings(),
        );
        assert_eq!(summary.lines[1], "Current Spending: Loading...");
    }

    #[test]
    fn test_banner_order_and_team_line() {
        let mut sessions = logged_in();
        {
            let cursor = sessions.session_mut(ProviderId::Cursor);
            cursor.team_name = Some("Platform".into());
            cursor.team_fetch_failed = true;
            cursor.fail("Session expired soon");
        }

        let summary = StatusSummaryBuilder::new().build(
            &sessions,
            &spending(SpendingRecord::new(0)),
            None,
            &eur_settings(),
        );
        assert_eq!(summary.lines[0], "Session expired soon");
        assert_eq!(summary.lines[1], TEAM_FETCH_FAILED_BANNER);
        assert_eq!(summary.lines[2], RATES_UNAVAILABLE_BANNER);
        assert_eq!(summary.lines[3], StatusSummary::SEPARATOR);
        assert_eq!(summary.lines.last().map(String::as_str), Some("Team: Platform"));
    }

    #[test]
    fn test_usd_selection_never_falls_back() {
        let settings = MeterSettings::default();
        let summary = StatusSummaryBuilder::new().build(
            &logged_in(),
            &spending(SpendingRecord::new(1234)),
            None,
            &settings,
        );
        assert_eq!(summary.lines[0], "Logged In As: dev@example.com");
        assert_eq!(summary.lines[1], "Current Spending: $12.34");
    }

    #[test]
    fn test_invoice_block() {
        let mut record = SpendingRecord::with_items(
            1500,
            vec![
                InvoiceItem::new("claude-sonnet tokens", 2000),
                InvoiceItem::new("Mid-month usage paid", -500),
            ],
        );
        record.pricing_id = Some("abcdef1234567890".into());

        let summary = StatusSummaryBuilder::new().build(
            &logged_in(),
            &spending(record),
            Some(&eur_rates()),
            &eur_settings(),
        );
        assert!(summary.has_debug_section);
        assert_eq!(
            &summary.lines[4..],
            &[
                StatusSummary::SEPARATOR,
                "Invoice Details",
                "Total: €7.50",
                "Usage Items: 2",
                "💰 Mid-month usage paid: €-2.50",
                "• claude-sonnet tokens: €10.00",
                "Pricing ID: abcdef12...",
            ]
        );
    }

    #[test]
    fn test_invoice_only_for_active_provider() {
        let mut map = BTreeMap::new();
        map.insert(
            ProviderId::Claude,
            SpendingRecord::with_items(100, vec![InvoiceItem::new("tokens", 100)]),
        );
        let summary =
            StatusSummaryBuilder::new().build(&logged_in(), &map, None, &MeterSettings::default());
        assert!(!summary.has_debug_section);
        assert_eq!(summary.lines[1], "Current Spending: $1.00");
    }

    #[test]
    fn test_invoice_cap_is_configurable() {
        let items = (0..5).map(|i| InvoiceItem::new(format!("item {i}"), 10)).collect();
        let summary = StatusSummaryBuilder::new().with_max_invoice_items(2).build(
            &logged_in(),
            &spending(SpendingRecord::with_items(50, items)),
            None,
            &MeterSettings::default(),
        );
        assert_eq!(summary.lines.last().map(String::as_str), Some("... and 3 more items"));
    }
}
