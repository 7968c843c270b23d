//! Currency conversion and money formatting.
//!
//! [`convert`] is the only place amounts change currency. It never assumes a
//! rate of 1 for a code the table does not carry; callers branch on the
//! `Option`. [`format_money`] applies display precision and the USD fallback.

use crate::models::{BASE_CURRENCY, ExchangeRateTable};

/// Converts a USD amount into `target_currency`.
///
/// Returns `None` when the table has no usable rate for the target. The
/// base currency converts as identity. No rounding is applied.
pub fn convert(amount_usd: f64, target_currency: &str, rates: &ExchangeRateTable) -> Option<f64> {
    rates.rate(target_currency).map(|rate| amount_usd * rate)
}

/// Returns the display symbol for an ISO currency code.
///
/// Unknown codes render as the code followed by a space.
pub fn currency_symbol(code: &str) -> String {
    let symbol = match code.trim().to_ascii_uppercase().as_str() {
        "USD" | "CAD" | "AUD" | "NZD" | "SGD" | "HKD" | "MXN" => "$",
        "EUR" => "€",
        "GBP" => "£",
        "JPY" | "CNY" => "¥",
        "INR" => "₹",
        "KRW" => "₩",
        "BRL" => "R$",
        "CHF" => "CHF ",
        "SEK" | "NOK" | "DKK" => "kr ",
        "PLN" => "zł ",
        "RUB" => "₽",
        "TRY" => "₺",
        "ILS" => "₪",
        "UAH" => "₴",
        other => return format!("{other} "),
    };
    symbol.to_string()
}

/// A formatted monetary amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedAmount {
    /// Display text, e.g. `€12.34` or `$12.34 (USD)`.
    pub text: String,
    /// True when the target currency was not convertible and the amount
    /// is shown in USD instead.
    pub fell_back: bool,
}

/// Formats a USD amount in the selected currency with two decimals.
///
/// USD needs no table. Other currencies fall back to `$X.XX (USD)` when
/// `rates` is missing or does not cover `currency_code`.
pub fn format_money(
    amount_usd: f64,
    currency_code: &str,
    rates: Option<&ExchangeRateTable>,
) -> FormattedAmount {
    let converted = if currency_code.trim().eq_ignore_ascii_case(BASE_CURRENCY) {
        Some(amount_usd)
    } else {
        rates.and_then(|r| convert(amount_usd, currency_code, r))
    };
    match converted {
        Some(converted) => FormattedAmount {
            text: format!("{}{converted:.2}", currency_symbol(currency_code)),
            fell_back: false,
        },
        None => FormattedAmount {
            text: format!("${amount_usd:.2} (USD)"),
            fell_back: true,
        },
    }
}

/// Formats an amount given in US cents.
#[allow(clippy::cast_precision_loss)]
pub fn format_cents(
    cents: i64,
    currency_code: &str,
    rates: Option<&ExchangeRateTable>,
) -> FormattedAmount {
    format_money(cents as f64 / 100.0, currency_code, rates)
}
