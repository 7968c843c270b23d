//! Engine outputs.
//!
//! - [`DisplayState`] - What the status icon shows
//! - [`StatusSummary`] - Text lines for the status menu

use serde::{Deserialize, Serialize};

// ============================================================================
// Display State
// ============================================================================

/// Discrete state of the status icon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DisplayState {
    /// No provider is logged in.
    #[default]
    NotLoggedIn,
    /// A refresh is running or the first fetch has not completed.
    Loading,
    /// Spending is known.
    Data {
        /// Spending as a fraction of the upper limit, in `[0.0, 1.0]`.
        gauge_value: f64,
    },
}

impl DisplayState {
    /// Creates a data state, clamping the gauge into `[0.0, 1.0]`.
    ///
    /// NaN clamps to 0.0.
    pub fn data(gauge_value: f64) -> Self {
        let gauge_value = if gauge_value.is_nan() {
            0.0
        } else {
            gauge_value.clamp(0.0, 1.0)
        };
        Self::Data { gauge_value }
    }

    /// Returns the gauge value if this is a data state.
    pub fn gauge_value(&self) -> Option<f64> {
        match self {
            Self::Data { gauge_value } => Some(*gauge_value),
            _ => None,
        }
    }

    /// Returns a short label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NotLoggedIn => "Not logged in",
            Self::Loading => "Loading",
            Self::Data { .. } => "Data",
        }
    }
}

impl std::fmt::Display for DisplayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Data { gauge_value } => write!(f, "{} ({:.0}%)", self.label(), gauge_value * 100.0),
            _ => write!(f, "{}", self.label()),
        }
    }
}

// ============================================================================
// Status Summary
// ============================================================================

/// Human-readable summary rendered in the status menu.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusSummary {
    /// Lines in display order. Separators are [`StatusSummary::SEPARATOR`].
    pub lines: Vec<String>,
    /// True when an itemized invoice block is included.
    pub has_debug_section: bool,
}

impl StatusSummary {
    /// Line value marking a menu separator.
    pub const SEPARATOR: &'static str = "---";

    /// Returns true if the line at `index` is a separator.
    pub fn is_separator(&self, index: usize) -> bool {
        self.lines.get(index).is_some_and(|l| l == Self::SEPARATOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_clamps() {
        assert_eq!(DisplayState::data(1.7).gauge_value(), Some(1.0));
        assert_eq!(DisplayState::data(-0.3).gauge_value(), Some(0.0));
        assert_eq!(DisplayState::data(f64::NAN).gauge_value(), Some(0.0));
        assert_eq!(DisplayState::data(f64::INFINITY).gauge_value(), Some(1.0));
    }

    #[test]
    fn test_display_state_display() {
        assert_eq!(DisplayState::Loading.to_string(), "Loading");
        assert_eq!(DisplayState::data(0.25).to_string(), "Data (25%)");
    }

    #[test]
    fn test_summary_separators() {
        let summary = StatusSummary {
            lines: vec!["banner".into(), StatusSummary::SEPARATOR.into(), "Logged In".into()],
            has_debug_section: false,
        };
        assert!(summary.is_separator(1));
        assert!(!summary.is_separator(0));
        assert!(!summary.is_separator(9));
    }
}
