//! Display-state derivation.
//!
//! The status icon has three looks: not logged in, loading, and a gauge.
//! [`DisplayStateEngine`] projects the current inputs onto one of them and
//! applies hysteresis so tiny recomputation noise does not redraw the gauge.
//!
//! Branch order matters and is fixed:
//!
//! 1. any refresh in flight → `Loading` (a background refresh never flashes
//!    "not logged in" for an authenticated provider)
//! 2. nobody logged in → `NotLoggedIn`
//! 3. logged in but no record yet → `Loading`
//! 4. otherwise → `Data(total / upper limit)`, clamped to `[0, 1]`

use crate::aggregate::AggregateResult;
use crate::models::{DisplayState, MultiProviderSession, RefreshStatus};

/// Gauge changes at or below this are swallowed while already showing data.
pub const HYSTERESIS_THRESHOLD: f64 = 0.01;

/// Everything the engine looks at, borrowed from a consistent snapshot.
#[derive(Debug, Clone, Copy)]
pub struct EngineInputs<'a> {
    /// Session state per provider.
    pub sessions: &'a MultiProviderSession,
    /// Refresh-in-flight flags.
    pub refreshing: &'a RefreshStatus,
    /// Aggregated spending.
    pub aggregate: &'a AggregateResult,
    /// Spending at which the gauge is full, in USD.
    pub upper_limit_usd: f64,
}

/// Computes the state the inputs call for, ignoring hysteresis.
///
/// A non-finite or non-positive upper limit degrades to `Loading`.
pub fn target_state(inputs: &EngineInputs<'_>) -> DisplayState {
    if inputs.refreshing.any_in_flight() {
        return DisplayState::Loading;
    }
    if !inputs.sessions.is_logged_in_to_any() {
        return DisplayState::NotLoggedIn;
    }
    if !inputs.aggregate.has_data() {
        return DisplayState::Loading;
    }
    let limit = inputs.upper_limit_usd;
    if !limit.is_finite() || limit <= 0.0 {
        return DisplayState::Loading;
    }
    DisplayState::data(inputs.aggregate.total_usd() / limit)
}

/// Applies the hysteresis rule to a transition from `current`.
///
/// Only `Data → Data` moves are filtered; the first data after `Loading` or
/// `NotLoggedIn` always goes through.
pub fn next_state(current: DisplayState, inputs: &EngineInputs<'_>) -> DisplayState {
    let target = target_state(inputs);
    match (current, target) {
        (
            DisplayState::Data { gauge_value: old },
            DisplayState::Data { gauge_value: new },
        ) if (old - new).abs() <= HYSTERESIS_THRESHOLD => current,
        _ => target,
    }
}

/// Holds the current display state. The engine is its only writer.
#[derive(Debug, Clone, Default)]
pub struct DisplayStateEngine {
    current: DisplayState,
}

impl DisplayStateEngine {
    /// Creates an engine starting at `NotLoggedIn`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine starting at `state`.
    pub fn with_state(state: DisplayState) -> Self {
        Self { current: state }
    }

    /// Returns a copy of the current state.
    pub fn current(&self) -> DisplayState {
        self.current
    }

    /// Re-evaluates against new inputs.
    ///
    /// Returns the new state if it differs from the previous one, `None`
    /// if nothing needs re-rendering.
    pub fn evaluate(&mut self, inputs: &EngineInputs<'_>) -> Option<DisplayState> {
        let next = next_state(self.current, inputs);
        if next == self.current {
            return None;
        }
        self.current = next;
        Some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::models::{ProviderId, ProviderSessionState, SpendingRecord};
    use std::collections::BTreeMap;

    struct Fixture {
        sessions: MultiProviderSession,
        refreshing: RefreshStatus,
        aggregate: AggregateResult,
        upper_limit_usd: f64,
    }

    impl Fixture {
        fn logged_in() -> Self {
            let mut sessions = MultiProviderSession::new();
            sessions.set(ProviderId::Cursor, ProviderSessionState::logged_in("dev@example.com"));
            Self {
                sessions,
                refreshing: RefreshStatus::new(),
                aggregate: AggregateResult::default(),
                upper_limit_usd: 100.0,
            }
        }

        fn logged_out() -> Self {
            Self {
                sessions: MultiProviderSession::new(),
                ..Self::logged_in()
            }
        }

        fn spending(mut self, cents: u64) -> Self {
            let mut records = BTreeMap::new();
            records.insert(ProviderId::Cursor, SpendingRecord::new(cents));
            self.aggregate = aggregate(&records);
            self
        }

        fn inputs(&self) -> EngineInputs<'_> {
            EngineInputs {
                sessions: &self.sessions,
                refreshing: &self.refreshing,
                aggregate: &self.aggregate,
                upper_limit_usd: self.upper_limit_usd,
            }
        }
    }

    fn gauge(state: DisplayState) -> f64 {
        state.gauge_value().expect("data state")
    }

    #[test]
    fn test_not_logged_in() {
        let f = Fixture::logged_out();
        assert_eq!(target_state(&f.inputs()), DisplayState::NotLoggedIn);
    }

    #[test]
    fn test_refresh_wins_over_login_state() {
        let mut f = Fixture::logged_out();
        f.refreshing.set(ProviderId::Cursor, true);
        assert_eq!(target_state(&f.inputs()), DisplayState::Loading);

        let mut f = Fixture::logged_in().spending(5000);
        f.refreshing.set(ProviderId::Claude, true);
        assert_eq!(target_state(&f.inputs()), DisplayState::Loading);
    }

    #[test]
    fn test_logged_in_without_data_is_loading() {
        let f = Fixture::logged_in();
        assert_eq!(target_state(&f.inputs()), DisplayState::Loading);
    }

    #[test]
    fn test_authenticating_is_not_logged_in() {
        let mut f = Fixture::logged_out();
        f.sessions.session_mut(ProviderId::Cursor).start_authenticating();
        assert_eq!(target_state(&f.inputs()), DisplayState::NotLoggedIn);
    }

    #[test]
    fn test_gauge_clamping() {
        assert_eq!(gauge(target_state(&Fixture::logged_in().spending(0).inputs())), 0.0);
        assert_eq!(gauge(target_state(&Fixture::logged_in().spending(2500).inputs())), 0.25);
        assert_eq!(gauge(target_state(&Fixture::logged_in().spending(10_000).inputs())), 1.0);
        assert_eq!(gauge(target_state(&Fixture::logged_in().spending(99_999).inputs())), 1.0);
    }

    #[test]
    fn test_bad_limit_degrades_to_loading() {
        for limit in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let mut f = Fixture::logged_in().spending(500);
            f.upper_limit_usd = limit;
            assert_eq!(target_state(&f.inputs()), DisplayState::Loading, "limit {limit}");
        }
    }

    #[test]
    fn test_hysteresis_suppresses_small_changes() {
        let current = DisplayState::data(0.50);

        let f = Fixture::logged_in().spending(5050);
        assert_eq!(next_state(current, &f.inputs()), current);

        let f = Fixture::logged_in().spending(5200);
        assert_eq!(gauge(next_state(current, &f.inputs())), 0.52);
    }

    #[test]
    fn test_first_data_always_transitions() {
        let f = Fixture::logged_in().spending(5000);
        assert_eq!(next_state(DisplayState::Loading, &f.inputs()), DisplayState::data(0.5));
        assert_eq!(next_state(DisplayState::NotLoggedIn, &f.inputs()), DisplayState::data(0.5));
    }

    #[test]
    fn test_hysteresis_does_not_block_leaving_data() {
        let f = Fixture::logged_out();
        assert_eq!(next_state(DisplayState::data(0.3), &f.inputs()), DisplayState::NotLoggedIn);
    }

    #[test]
    fn test_engine_reports_only_changes() {
        let mut engine = DisplayStateEngine::new();
        assert_eq!(engine.current(), DisplayState::NotLoggedIn);

        let f = Fixture::logged_out();
        assert_eq!(engine.evaluate(&f.inputs()), None);

        let f = Fixture::logged_in();
        assert_eq!(engine.evaluate(&f.inputs()), Some(DisplayState::Loading));
        assert_eq!(engine.evaluate(&f.inputs()), None);

        let f = Fixture::logged_in().spending(5000);
        assert_eq!(engine.evaluate(&f.inputs()), Some(DisplayState::data(0.5)));

        let f = Fixture::logged_in().spending(5050);
        assert_eq!(engine.evaluate(&f.inputs()), None);
        assert_eq!(engine.current(), DisplayState::data(0.5));

        let f = Fixture::logged_in().spending(6000);
        assert_eq!(engine.evaluate(&f.inputs()), Some(DisplayState::data(0.6)));
    }

    #[test]
    fn test_slow_drift_is_held_until_threshold() {
        let mut engine = DisplayStateEngine::with_state(DisplayState::data(0.50));
        for cents in [5004, 5008, 5010] {
            let f = Fixture::logged_in().spending(cents);
            assert_eq!(engine.evaluate(&f.inputs()), None, "cents {cents}");
        }
        let f = Fixture::logged_in().spending(5150);
        assert!(engine.evaluate(&f.inputs()).is_some());
    }
}
