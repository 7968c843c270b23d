//! Domain models for VibeMeter.
//!
//! These are the immutable snapshots the engine consumes and the values it
//! produces.
//!
//! ## Submodules
//!
//! - `provider` - Provider ids and session state ([`ProviderId`], [`MultiProviderSession`])
//! - `spending` - Spending records, invoice items, refresh flags ([`SpendingRecord`])
//! - `rates` - Exchange rate table ([`ExchangeRateTable`])
//! - `settings` - Limits and currency preferences ([`MeterSettings`])
//! - `display` - Display state and status summary ([`DisplayState`], [`StatusSummary`])

mod display;
mod provider;
mod rates;
mod settings;
mod spending;

pub use display::{DisplayState, StatusSummary};
pub use provider::{AuthStatus, MultiProviderSession, ProviderId, ProviderSessionState};
pub use rates::{BASE_CURRENCY, ExchangeRateTable};
pub use settings::MeterSettings;
pub use spending::{InvoiceItem, RefreshStatus, SpendingRecord};
