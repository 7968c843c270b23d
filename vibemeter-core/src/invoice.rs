//! Bounded, prioritized invoice summaries.
//!
//! Credits and mid-month adjustments are listed first; ordinary usage lines
//! are capped so the menu keeps roughly the same height either way.

use crate::currency::format_cents;
use crate::models::{ExchangeRateTable, InvoiceItem};

/// Description substring marking adjustment/credit lines.
pub const PRIORITY_MARKER: &str = "Mid-month usage paid";

/// Default cap on ordinary usage lines.
pub const DEFAULT_MAX_OTHER_ITEMS: usize = 8;

/// How much the cap shrinks when priority lines are present.
const PRIORITY_CAP_REDUCTION: usize = 2;

/// Longest description shown untruncated.
const MAX_DESCRIPTION_CHARS: usize = 50;
/// Characters kept when truncating.
const TRUNCATED_CHARS: usize = 47;
const ELLIPSIS: &str = "...";

/// One rendered line of an invoice summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryLine {
    /// Credit/adjustment line shown ahead of usage.
    Priority {
        /// Possibly truncated description.
        description: String,
        /// Formatted amount.
        amount: String,
    },
    /// Ordinary usage line.
    Usage {
        /// Possibly truncated description.
        description: String,
        /// Formatted amount.
        amount: String,
    },
    /// Count of lines that did not fit.
    More(usize),
    /// The invoice has no lines.
    Empty,
}

impl std::fmt::Display for SummaryLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Priority { description, amount } => write!(f, "💰 {description}: {amount}"),
            Self::Usage { description, amount } => write!(f, "• {description}: {amount}"),
            Self::More(n) => write!(f, "... and {n} more items"),
            Self::Empty => write!(f, "No usage items this period"),
        }
    }
}

/// Returns true if the item belongs at the top of the summary.
pub fn is_priority(item: &InvoiceItem) -> bool {
    item.description.contains(PRIORITY_MARKER)
}

/// Shortens descriptions over 50 characters to 47 plus `...`.
pub fn truncate_description(description: &str) -> String {
    if description.chars().count() > MAX_DESCRIPTION_CHARS {
        let kept: String = description.chars().take(TRUNCATED_CHARS).collect();
        format!("{kept}{ELLIPSIS}")
    } else {
        description.to_string()
    }
}

/// Builds the display lines for an itemized invoice.
///
/// Priority items are all shown; other items are capped at
/// `max_other_items`, or two fewer when priority items exist. A trailing
/// [`SummaryLine::More`] counts what was left out.
pub fn summarize(
    items: &[InvoiceItem],
    rates: Option<&ExchangeRateTable>,
    target_currency: &str,
    max_other_items: usize,
) -> Vec<SummaryLine> {
    if items.is_empty() {
        return vec![SummaryLine::Empty];
    }

    let (priority, other): (Vec<&InvoiceItem>, Vec<&InvoiceItem>) =
        items.iter().partition(|item| is_priority(item));

    let cap = if priority.is_empty() {
        max_other_items
    } else {
        max_other_items.saturating_sub(PRIORITY_CAP_REDUCTION)
    };
    let shown_other = other.len().min(cap);

    let mut lines = Vec::with_capacity(priority.len() + shown_other + 1);
    lines.extend(priority.iter().map(|item| SummaryLine::Priority {
        description: truncate_description(&item.description),
        amount: format_cents(item.cents, target_currency, rates).text,
    }));
    lines.extend(other.iter().take(shown_other).map(|item| SummaryLine::Usage {
        description: truncate_description(&item.description),
        amount: format_cents(item.cents, target_currency, rates).text,
    }));

    let emitted = priority.len() + shown_other;
    if items.len() > emitted {
        lines.push(SummaryLine::More(items.len() - emitted));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage_items(n: usize) -> Vec<InvoiceItem> {
        (0..n)
            .map(|i| InvoiceItem::new(format!("model-{i} tokens"), 100))
            .collect()
    }

    fn credit(n: usize) -> InvoiceItem {
        InvoiceItem::new(format!("Mid-month usage paid #{n}"), -500)
    }

    #[test]
    fn test_empty_invoice() {
        let lines = summarize(&[], None, "USD", DEFAULT_MAX_OTHER_ITEMS);
        assert_eq!(lines, vec![SummaryLine::Empty]);
        assert_eq!(lines[0].to_string(), "No usage items this period");
    }

    #[test]
    fn test_cap_without_priority_items() {
        let lines = summarize(&usage_items(10), None, "USD", DEFAULT_MAX_OTHER_ITEMS);
        assert_eq!(lines.len(), 9);
        assert!(lines[..8].iter().all(|l| matches!(l, SummaryLine::Usage { .. })));
        assert_eq!(lines[8], SummaryLine::More(2));
        assert_eq!(lines[8].to_string(), "... and 2 more items");
    }

    #[test]
    fn test_cap_narrows_with_priority_items() {
        let mut items = usage_items(10);
        items.insert(3, credit(1));
        items.push(credit(2));

        let lines = summarize(&items, None, "USD", DEFAULT_MAX_OTHER_ITEMS);
        assert_eq!(lines.len(), 9);
        assert!(matches!(&lines[0], SummaryLine::Priority { description, .. } if description.ends_with("#1")));
        assert!(matches!(&lines[1], SummaryLine::Priority { description, .. } if description.ends_with("#2")));
        assert!(lines[2..8].iter().all(|l| matches!(l, SummaryLine::Usage { .. })));
        assert_eq!(lines[8], SummaryLine::More(4));
    }

    #[test]
    fn test_preserves_relative_order() {
        let lines = summarize(&usage_items(3), None, "USD", DEFAULT_MAX_OTHER_ITEMS);
        let descriptions: Vec<String> = lines.iter().map(ToString::to_string).collect();
        assert_eq!(
            descriptions,
            vec![
                "• model-0 tokens: $1.00",
                "• model-1 tokens: $1.00",
                "• model-2 tokens: $1.00",
            ]
        );
    }

    #[test]
    fn test_no_trailer_when_everything_fits() {
        let lines = summarize(&usage_items(8), None, "USD", DEFAULT_MAX_OTHER_ITEMS);
        assert_eq!(lines.len(), 8);
        assert!(!lines.iter().any(|l| matches!(l, SummaryLine::More(_))));
    }

    #[test]
    fn test_priority_glyph_and_credit_amount() {
        let lines = summarize(&[credit(1)], None, "USD", DEFAULT_MAX_OTHER_ITEMS);
        assert_eq!(lines[0].to_string(), "💰 Mid-month usage paid #1: $-5.00");
    }

    #[test]
    fn test_amounts_use_rates_or_fallback() {
        let rates = ExchangeRateTable::new().with_rate("EUR", 0.9);
        let items = [InvoiceItem::new("tokens", 1000)];

        let lines = summarize(&items, Some(&rates), "EUR", DEFAULT_MAX_OTHER_ITEMS);
        assert_eq!(lines[0].to_string(), "• tokens: €9.00");

        let lines = summarize(&items, Some(&rates), "XYZ", DEFAULT_MAX_OTHER_ITEMS);
        assert_eq!(lines[0].to_string(), "• tokens: $10.00 (USD)");
    }

    #[test]
    fn test_truncation() {
        let long = "a".repeat(60);
        let truncated = truncate_description(&long);
        assert_eq!(truncated.chars().count(), 50);
        assert_eq!(truncated, format!("{}...", "a".repeat(47)));

        let exact = "b".repeat(50);
        assert_eq!(truncate_description(&exact), exact);
    }

    #[test]
    fn test_truncation_counts_characters_not_bytes() {
        let long = "é".repeat(55);
        let truncated = truncate_description(&long);
        assert_eq!(truncated.chars().count(), 50);
    }

    #[test]
    fn test_empty_description_rendered_as_is() {
        let lines = summarize(&[InvoiceItem::new("", 0)], None, "USD", DEFAULT_MAX_OTHER_ITEMS);
        assert_eq!(lines[0].to_string(), "• : $0.00");
    }
}
