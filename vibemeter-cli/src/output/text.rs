//! Text output formatting with gauge bars and colors.

use vibemeter_core::{DisplayState, FormattedAmount, ProviderId, ProviderSessionState, StatusSummary};

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

// Gauge bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

/// Width of rendered separator rules.
const RULE_WIDTH: usize = 40;

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 20,
        }
    }

    /// Set the gauge bar width.
    #[cfg(test)]
    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    // ========================================================================
    // State
    // ========================================================================

    /// Formats the display state with its gauge bar and total.
    pub fn format_state(&self, state: DisplayState, total: Option<&FormattedAmount>) -> String {
        let mut lines = vec![format!("{} {}", self.bold("State:"), state.label())];

        if let Some(gauge) = state.gauge_value() {
            lines.push(format!(
                "{} {}",
                self.gauge_bar(gauge),
                self.color_for_gauge(gauge, &format!("{:.0}%", gauge * 100.0))
            ));
        }

        if let Some(total) = total {
            lines.push(format!("Spending: {}", self.format_amount(total)));
        }

        lines.join("\n")
    }

    /// Formats a gauge bar for a value in `[0, 1]`.
    pub fn gauge_bar(&self, gauge: f64) -> String {
        let fraction = gauge.clamp(0.0, 1.0);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let filled = ((fraction * self.bar_width as f64).round() as usize).min(self.bar_width);
        let empty = self.bar_width - filled;

        let bar = format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        );

        self.color_for_gauge(fraction, &bar)
    }

    // ========================================================================
    // Summary
    // ========================================================================

    /// Formats summary lines, drawing separators as rules.
    pub fn format_summary(&self, summary: &StatusSummary) -> String {
        summary
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                if summary.is_separator(i) {
                    self.dim(&"─".repeat(RULE_WIDTH))
                } else if line == "Invoice Details" {
                    self.bold(line)
                } else {
                    line.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ========================================================================
    // Conversion
    // ========================================================================

    /// Formats a converted amount next to its USD source.
    pub fn format_conversion(&self, amount_usd: f64, converted: &FormattedAmount) -> String {
        format!("${amount_usd:.2} → {}", self.format_amount(converted))
    }

    fn format_amount(&self, amount: &FormattedAmount) -> String {
        if amount.fell_back {
            format!("{} {}", amount.text, self.dim("(rates unavailable)"))
        } else {
            self.cyan(&amount.text)
        }
    }

    // ========================================================================
    // Providers
    // ========================================================================

    /// Formats provider list header.
    pub fn format_providers_header(&self) -> String {
        format!(
            "{:<10} {:<8} {}",
            self.bold("Provider"),
            self.bold("CLI"),
            self.bold("Session")
        )
    }

    /// Formats a single provider line.
    pub fn format_provider_line(
        &self,
        provider: ProviderId,
        session: &ProviderSessionState,
    ) -> String {
        let status = if session.is_logged_in() {
            let who = session.user_email.as_deref().unwrap_or("logged in");
            format!("{} {}", self.green("✓"), who)
        } else if session.is_authenticating() {
            self.yellow("… logging in")
        } else {
            self.dim("−")
        };

        format!("{:<10} {:<8} {}", provider.display_name(), provider.cli_name(), status)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn color_for_gauge(&self, gauge: f64, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        if gauge >= 0.9 {
            self.red(text)
        } else if gauge >= 0.5 {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}
