//! Core error types for `VibeMeter`.
//!
//! The engine itself never fails; these errors only surface when parsing
//! identifiers or validating externally supplied values.

use thiserror::Error;

/// Core error type for `VibeMeter` operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Provider name not recognized.
    #[error("Unknown provider: {0}")]
    UnknownProvider(String),

    /// Currency code is not a three-letter ISO code.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// A spending limit is not a finite positive amount.
    #[error("Invalid limit for {name}: {value}")]
    InvalidLimit {
        /// Which limit was rejected.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
