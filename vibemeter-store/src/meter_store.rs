//! Observable meter state.
//!
//! [`MeterStore`] is the observation layer around the pure engine. Every
//! mutation is committed under the write lock and the engine is re-evaluated
//! against that committed snapshot before the lock is released, so readers
//! never see a half-replaced spending record. Outputs are published on
//! `watch` channels and to registered [`StatusObserver`]s, only when they
//! actually change. Observers are called before the lock is released, so
//! they receive changes in commit order.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};
use vibemeter_core::{
    DisplayState, DisplayStateEngine, EngineInputs, ExchangeRateTable, MeterSettings, ProviderId,
    ProviderSessionState, SpendingRecord, StatusObserver, StatusSummary, StatusSummaryBuilder,
    aggregate,
};

use crate::error::StoreError;
use crate::snapshot::MeterSnapshot;

/// Default age after which rates are logged as stale.
const DEFAULT_RATES_MAX_AGE_HOURS: i64 = 24;

// ============================================================================
// Inner State
// ============================================================================

struct MeterStoreInner {
    snapshot: MeterSnapshot,
    settings: MeterSettings,
    engine: DisplayStateEngine,
}

/// What a commit changed.
struct Published {
    state: Option<DisplayState>,
    summary: Option<StatusSummary>,
}

// ============================================================================
// Meter Store
// ============================================================================

/// Holds the current inputs and publishes engine outputs.
pub struct MeterStore {
    inner: Arc<RwLock<MeterStoreInner>>,
    builder: StatusSummaryBuilder,
    rates_max_age: chrono::Duration,
    display: watch::Sender<DisplayState>,
    summary: watch::Sender<StatusSummary>,
    observers: RwLock<Vec<Arc<dyn StatusObserver>>>,
}

impl Default for MeterStore {
    fn default() -> Self {
        Self::new(MeterSettings::default())
    }
}

impl MeterStore {
    /// Creates a store with no provider data.
    pub fn new(settings: MeterSettings) -> Self {
        Self::with_builder(settings, StatusSummaryBuilder::new())
    }

    /// Creates a store using a custom summary builder.
    pub fn with_builder(settings: MeterSettings, builder: StatusSummaryBuilder) -> Self {
        let snapshot = MeterSnapshot::default();
        let engine = DisplayStateEngine::new();
        let initial_summary = snapshot.summary(&builder, &settings);
        let (display, _) = watch::channel(engine.current());
        let (summary, _) = watch::channel(initial_summary);

        Self {
            inner: Arc::new(RwLock::new(MeterStoreInner {
                snapshot,
                settings,
                engine,
            })),
            builder,
            rates_max_age: chrono::Duration::hours(DEFAULT_RATES_MAX_AGE_HOURS),
            display,
            summary,
            observers: RwLock::new(Vec::new()),
        }
    }

    /// Sets the age after which rates are reported as stale.
    #[must_use]
    pub fn with_rates_max_age(mut self, max_age: chrono::Duration) -> Self {
        self.rates_max_age = max_age;
        self
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// Returns the current display state.
    pub fn display_state(&self) -> DisplayState {
        *self.display.borrow()
    }

    /// Returns the current summary.
    pub fn summary(&self) -> StatusSummary {
        self.summary.borrow().clone()
    }

    /// Returns a copy of the current inputs.
    pub async fn snapshot(&self) -> MeterSnapshot {
        self.inner.read().await.snapshot.clone()
    }

    /// Returns the current settings.
    pub async fn settings(&self) -> MeterSettings {
        self.inner.read().await.settings.clone()
    }

    // ========================================================================
    // Subscribing
    // ========================================================================

    /// Subscribes to display-state changes.
    pub fn subscribe_display(&self) -> watch::Receiver<DisplayState> {
        self.display.subscribe()
    }

    /// Subscribes to summary changes.
    pub fn subscribe_summary(&self) -> watch::Receiver<StatusSummary> {
        self.summary.subscribe()
    }

    /// Registers an observer called on every published change.
    pub async fn add_observer(&self, observer: Arc<dyn StatusObserver>) {
        self.observers.write().await.push(observer);
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Replaces the session state for a provider.
    pub async fn set_session(&self, provider: ProviderId, state: ProviderSessionState) {
        debug!(provider = %provider, status = ?state.status, "Session updated");
        self.commit(|inner| inner.snapshot.sessions.set(provider, state))
            .await;
    }

    /// Mutates the session state for a provider in place.
    pub async fn update_session<F>(&self, provider: ProviderId, f: F)
    where
        F: FnOnce(&mut ProviderSessionState),
    {
        self.commit(|inner| f(inner.snapshot.sessions.session_mut(provider)))
            .await;
    }

    // ========================================================================
    // Spending & Refresh
    // ========================================================================

    /// Replaces the spending record for a provider.
    pub async fn set_spending(&self, provider: ProviderId, record: SpendingRecord) {
        debug!(provider = %provider, total_cents = record.total_cents, items = record.items.len(), "Spending replaced");
        self.commit(|inner| {
            inner.snapshot.spending.insert(provider, record);
        })
        .await;
    }

    /// Drops the spending record for a provider, e.g. after log out.
    pub async fn clear_spending(&self, provider: ProviderId) {
        self.commit(|inner| {
            inner.snapshot.spending.remove(&provider);
        })
        .await;
    }

    /// Marks a provider as refreshing.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::RefreshInProgress`] if a refresh is already
    /// running for this provider.
    pub async fn start_refresh(&self, provider: ProviderId) -> Result<(), StoreError> {
        self.try_commit(|inner| {
            if inner.snapshot.refreshing.is_refreshing(provider) {
                return Err(StoreError::RefreshInProgress(provider.to_string()));
            }
            inner.snapshot.refreshing.set(provider, true);
            Ok(())
        })
        .await
    }

    /// Stores the fetched record and clears the refresh flag in one commit.
    ///
    /// A successful fetch also clears the provider's last error.
    pub async fn complete_refresh(&self, provider: ProviderId, record: SpendingRecord) {
        debug!(provider = %provider, total_cents = record.total_cents, "Refresh completed");
        self.commit(|inner| {
            inner.snapshot.spending.insert(provider, record);
            inner.snapshot.refreshing.set(provider, false);
            inner.snapshot.sessions.session_mut(provider).last_error_message = None;
        })
        .await;
    }

    /// Clears the refresh flag after a failed fetch, recording the error.
    pub async fn fail_refresh(&self, provider: ProviderId, message: impl Into<String>) {
        let message = message.into();
        warn!(provider = %provider, error = %message, "Refresh failed");
        self.commit(|inner| {
            inner.snapshot.refreshing.set(provider, false);
            inner.snapshot.sessions.session_mut(provider).fail(message);
        })
        .await;
    }

    /// Sets the refresh-in-flight flag for a provider.
    pub async fn set_refreshing(&self, provider: ProviderId, in_flight: bool) {
        self.commit(|inner| inner.snapshot.refreshing.set(provider, in_flight))
            .await;
    }

    // ========================================================================
    // Rates & Settings
    // ========================================================================

    /// Replaces the exchange rate table. `None` means no rates are known.
    pub async fn set_rates(&self, rates: Option<ExchangeRateTable>) {
        match &rates {
            Some(table) if table.is_stale(self.rates_max_age, Utc::now()) => {
                warn!(as_of = %table.as_of, "Exchange rates are stale");
            }
            Some(table) => debug!(currencies = table.rates.len(), "Exchange rates updated"),
            None => warn!("Exchange rates unavailable"),
        }
        self.commit(|inner| inner.snapshot.rates = rates).await;
    }

    /// Replaces the settings.
    ///
    /// Invalid limits are accepted; the engine shows `Loading` until they
    /// are fixed.
    pub async fn set_settings(&self, settings: MeterSettings) {
        if let Err(e) = settings.validate() {
            warn!(error = %e, "Applying invalid settings");
        }
        self.commit(|inner| inner.settings = settings).await;
    }

    /// Replaces all provider-side inputs at once.
    pub async fn replace_snapshot(&self, snapshot: MeterSnapshot) {
        self.commit(|inner| inner.snapshot = snapshot).await;
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// Applies a mutation, re-evaluates and publishes.
    async fn commit<F>(&self, mutate: F)
    where
        F: FnOnce(&mut MeterStoreInner),
    {
        let mut guard = self.inner.write().await;
        mutate(&mut *guard);
        let published = self.evaluate(&mut *guard);
        self.notify_observers(published).await;
    }

    /// Like [`Self::commit`], but the mutation may refuse. A refused
    /// mutation must leave the inputs untouched; nothing is published.
    async fn try_commit<F>(&self, mutate: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut MeterStoreInner) -> Result<(), StoreError>,
    {
        let mut guard = self.inner.write().await;
        mutate(&mut *guard)?;
        let published = self.evaluate(&mut *guard);
        self.notify_observers(published).await;
        Ok(())
    }

    fn evaluate(&self, inner: &mut MeterStoreInner) -> Published {
        let totals = aggregate(&inner.snapshot.spending);
        let state = inner.engine.evaluate(&EngineInputs {
            sessions: &inner.snapshot.sessions,
            refreshing: &inner.snapshot.refreshing,
            aggregate: &totals,
            upper_limit_usd: inner.settings.upper_limit_usd,
        });
        if let Some(state) = state {
            info!(state = %state, "Display state changed");
            self.display.send_replace(state);
        }

        let summary = inner.snapshot.summary(&self.builder, &inner.settings);
        let summary_changed = self.summary.send_if_modified(|current| {
            if *current == summary {
                false
            } else {
                *current = summary.clone();
                true
            }
        });

        debug!(
            total_cents = totals.total_usd_cents,
            has_data = totals.has_data(),
            state_changed = state.is_some(),
            summary_changed,
            "Re-evaluated meter"
        );

        Published {
            state,
            summary: summary_changed.then_some(summary),
        }
    }

    /// Runs while the committing write guard is still held, so observers
    /// see changes in commit order.
    async fn notify_observers(&self, published: Published) {
        if published.state.is_none() && published.summary.is_none() {
            return;
        }
        let observers = self.observers.read().await.clone();
        for observer in &observers {
            if let Some(state) = published.state {
                observer.on_display_state_changed(state);
            }
            if let Some(summary) = &published.summary {
                observer.on_summary_changed(summary);
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
