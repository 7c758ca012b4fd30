//! Shared application state for the call log API.
//!
//! [`AppState`] holds the record store handle plus the access policy for
//! the call history. It is wrapped in [`Arc`](std::sync::Arc) and injected
//! via Axum's `State` extractor.

use lifeline_db::CallStore;

/// Shared state for the Axum application.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Where call records live.
    pub store: CallStore,
    /// When true, `GET /call-history/` rejects anonymous callers.
    pub history_requires_identity: bool,
}

impl AppState {
    /// State over `store` with a public call history.
    pub const fn new(store: CallStore) -> Self {
        Self {
            store,
            history_requires_identity: false,
        }
    }

    /// Set whether listing the call history needs an authenticated caller.
    #[must_use]
    pub const fn with_history_requires_identity(mut self, required: bool) -> Self {
        self.history_requires_identity = required;
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(CallStore::memory())
    }
}
