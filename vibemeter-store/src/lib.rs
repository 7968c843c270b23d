// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `VibeMeter` Store
//!
//! Observable state for the `VibeMeter` engine.
//!
//! This crate provides:
//!
//! - **MeterStore**: Current inputs plus the published display state and
//!   summary, via watch channels and [`StatusObserver`] callbacks
//! - **MeterSnapshot**: The JSON shape of provider-side inputs
//! - **MeterConfig**: Limits, currency and tuning read from `config.json`
//! - **Persistence**: File I/O helpers for JSON data
//!
//! ## Usage
//!
//! ```ignore
//! use vibemeter_store::MeterStore;
//! use vibemeter_core::{MeterSettings, ProviderId, ProviderSessionState, SpendingRecord};
//!
//! let store = MeterStore::new(MeterSettings::default());
//! let mut rx = store.subscribe_display();
//!
//! store.set_session(ProviderId::Cursor, ProviderSessionState::logged_in("dev@example.com")).await;
//! store.complete_refresh(ProviderId::Cursor, SpendingRecord::new(4200)).await;
//!
//! while rx.changed().await.is_ok() {
//!     println!("Display state: {}", *rx.borrow());
//! }
//! ```
//!
//! [`StatusObserver`]: vibemeter_core::StatusObserver

pub mod config;
pub mod error;
pub mod meter_store;
pub mod persistence;
pub mod snapshot;

pub use config::{GeneralConfig, MeterConfig, SpendingConfig};
pub use error::StoreError;
pub use meter_store::MeterStore;
pub use persistence::{default_config_dir, default_config_path, load_json, load_json_or_default};
pub use snapshot::MeterSnapshot;
