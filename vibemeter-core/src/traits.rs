//! Trait definitions for VibeMeter.
//!
//! The engine is UI-framework-free; the rendering shell subscribes through
//! [`StatusObserver`].

use crate::models::{DisplayState, StatusSummary};

/// Receives engine outputs when they change.
///
/// Implementors must not block: callbacks run on the task that committed
/// the triggering input change, while that commit still holds the store's
/// write lock. Changes therefore arrive in commit order.
pub trait StatusObserver: Send + Sync {
    /// Called when the status icon should switch to `state`.
    fn on_display_state_changed(&self, state: DisplayState);

    /// Called when the menu text changed.
    fn on_summary_changed(&self, summary: &StatusSummary);
}
