// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `VibeMeter` Core
//!
//! Spending aggregation and display-state derivation for the `VibeMeter`
//! status bar.
//!
//! Everything here is synchronous and pure: callers pass immutable snapshots
//! of provider state and get back a [`DisplayState`] and a [`StatusSummary`].
//! Nothing in this crate performs I/O or fails on documented inputs.
//!
//! ## Components
//!
//! - [`currency`] - USD conversion against an [`ExchangeRateTable`]
//! - [`aggregate()`] - Cross-provider totals ([`AggregateResult`])
//! - [`invoice`] - Bounded, prioritized invoice lines ([`SummaryLine`])
//! - [`engine`] - The [`DisplayStateEngine`] state machine
//! - [`summary`] - The [`StatusSummaryBuilder`]
//!
//! ## Example
//!
//! ```
//! use std::collections::BTreeMap;
//! use vibemeter_core::{
//!     aggregate, DisplayState, DisplayStateEngine, EngineInputs, MultiProviderSession,
//!     ProviderId, ProviderSessionState, RefreshStatus, SpendingRecord,
//! };
//!
//! let mut sessions = MultiProviderSession::new();
//! sessions.set(ProviderId::Cursor, ProviderSessionState::logged_in("dev@example.com"));
//!
//! let mut spending = BTreeMap::new();
//! spending.insert(ProviderId::Cursor, SpendingRecord::new(2500));
//! let totals = aggregate(&spending);
//!
//! let mut engine = DisplayStateEngine::new();
//! let changed = engine.evaluate(&EngineInputs {
//!     sessions: &sessions,
//!     refreshing: &RefreshStatus::new(),
//!     aggregate: &totals,
//!     upper_limit_usd: 100.0,
//! });
//! assert_eq!(changed, Some(DisplayState::data(0.25)));
//! ```

pub mod aggregate;
pub mod currency;
pub mod engine;
pub mod error;
pub mod invoice;
pub mod models;
pub mod summary;
pub mod traits;

pub use error::CoreError;

pub use models::{
    // Providers & sessions
    AuthStatus,
    MultiProviderSession,
    ProviderId,
    ProviderSessionState,
    // Spending
    InvoiceItem,
    RefreshStatus,
    SpendingRecord,
    // Rates & settings
    BASE_CURRENCY,
    ExchangeRateTable,
    MeterSettings,
    // Outputs
    DisplayState,
    StatusSummary,
};

pub use aggregate::{AggregateResult, aggregate};
pub use currency::{FormattedAmount, convert, currency_symbol, format_cents, format_money};
pub use engine::{DisplayStateEngine, EngineInputs, HYSTERESIS_THRESHOLD, next_state, target_state};
pub use invoice::{DEFAULT_MAX_OTHER_ITEMS, PRIORITY_MARKER, SummaryLine, summarize};
pub use summary::StatusSummaryBuilder;
pub use traits::StatusObserver;
