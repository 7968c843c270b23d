//! Provider and session types.
//!
//! This module contains types related to cost-tracking providers:
//! - [`ProviderId`] - Enum of supported providers
//! - [`AuthStatus`] - Login lifecycle of a single provider
//! - [`ProviderSessionState`] - Per-provider session snapshot
//! - [`MultiProviderSession`] - Session states for all providers

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Provider Id
// ============================================================================

/// Supported cost-tracking providers.
///
/// Variant order defines the iteration order used everywhere a "first"
/// provider is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Cursor IDE
    Cursor,
    /// Anthropic Claude
    Claude,
}

impl ProviderId {
    /// Returns the display name for this provider.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Cursor => "Cursor",
            Self::Claude => "Claude",
        }
    }

    /// Returns the CLI name for this provider (lowercase, no spaces).
    pub fn cli_name(&self) -> &'static str {
        match self {
            Self::Cursor => "cursor",
            Self::Claude => "claude",
        }
    }

    /// Returns all available providers.
    pub fn all() -> &'static [ProviderId] {
        &[Self::Cursor, Self::Claude]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ProviderId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|p| p.cli_name() == needle)
            .ok_or_else(|| CoreError::UnknownProvider(s.to_string()))
    }
}

// ============================================================================
// Session State
// ============================================================================

/// Where a provider is in its login lifecycle.
///
/// Authenticating and logged in are mutually exclusive by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AuthStatus {
    /// No session.
    #[default]
    LoggedOut,
    /// Login flow in progress.
    Authenticating,
    /// Authenticated session.
    LoggedIn,
}

/// Session snapshot for a single provider.
///
/// Mutated only by the external authentication flow; the engine reads it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProviderSessionState {
    /// Login lifecycle.
    #[serde(default)]
    pub status: AuthStatus,
    /// Last error reported by the provider's auth or fetch flow.
    #[serde(default)]
    pub last_error_message: Option<String>,
    /// Account email address.
    #[serde(default)]
    pub user_email: Option<String>,
    /// Team the account belongs to.
    #[serde(default)]
    pub team_name: Option<String>,
    /// The team lookup failed during the last refresh.
    #[serde(default)]
    pub team_fetch_failed: bool,
}

impl ProviderSessionState {
    /// Creates a logged-out session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a logged-in session for the given account.
    pub fn logged_in(email: impl Into<String>) -> Self {
        let mut state = Self::new();
        state.complete_login(Some(email.into()), None);
        state
    }

    /// Returns true if the provider has an authenticated session.
    pub fn is_logged_in(&self) -> bool {
        self.status == AuthStatus::LoggedIn
    }

    /// Returns true while a login flow is running.
    pub fn is_authenticating(&self) -> bool {
        self.status == AuthStatus::Authenticating
    }

    /// Marks the start of a login flow and clears the previous error.
    pub fn start_authenticating(&mut self) {
        self.status = AuthStatus::Authenticating;
        self.last_error_message = None;
    }

    /// Records a successful login.
    pub fn complete_login(&mut self, email: Option<String>, team: Option<String>) {
        self.status = AuthStatus::LoggedIn;
        self.user_email = email;
        self.team_name = team;
        self.last_error_message = None;
        self.team_fetch_failed = false;
    }

    /// Records a failed login or fetch. A login in progress is aborted.
    pub fn fail(&mut self, message: impl Into<String>) {
        if self.status == AuthStatus::Authenticating {
            self.status = AuthStatus::LoggedOut;
        }
        self.last_error_message = Some(message.into());
    }

    /// Drops the session and all account details.
    pub fn log_out(&mut self) {
        *self = Self::default();
    }
}

// ============================================================================
// Multi-Provider Session
// ============================================================================

/// Session states keyed by provider.
///
/// Providers that were never referenced read as a default (logged-out) state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MultiProviderSession {
    sessions: BTreeMap<ProviderId, ProviderSessionState>,
}

impl MultiProviderSession {
    /// Creates an empty session map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the session for a provider, or a default one if never referenced.
    pub fn session(&self, provider: ProviderId) -> ProviderSessionState {
        self.sessions.get(&provider).cloned().unwrap_or_default()
    }

    /// Returns the session for a provider, creating it on first reference.
    pub fn session_mut(&mut self, provider: ProviderId) -> &mut ProviderSessionState {
        self.sessions.entry(provider).or_default()
    }

    /// Replaces the session for a provider.
    pub fn set(&mut self, provider: ProviderId, state: ProviderSessionState) {
        self.sessions.insert(provider, state);
    }

    /// Returns true if any provider has an authenticated session.
    pub fn is_logged_in_to_any(&self) -> bool {
        self.sessions.values().any(ProviderSessionState::is_logged_in)
    }

    /// Returns the first logged-in provider in [`ProviderId`] order.
    pub fn active_provider(&self) -> Option<ProviderId> {
        self.sessions
            .iter()
            .find(|(_, s)| s.is_logged_in())
            .map(|(id, _)| *id)
    }

    /// Returns the providers that are currently logged in.
    pub fn logged_in_providers(&self) -> Vec<ProviderId> {
        self.sessions
            .iter()
            .filter(|(_, s)| s.is_logged_in())
            .map(|(id, _)| *id)
            .collect()
    }

    /// Iterates over all referenced sessions in provider order.
    pub fn iter(&self) -> impl Iterator<Item = (&ProviderId, &ProviderSessionState)> {
        self.sessions.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================
