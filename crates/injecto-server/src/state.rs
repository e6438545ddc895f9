//! Application state.
//!
//! Shared state for all request handlers. Processing jobs are independent
//! and keep their own data, so nothing here is mutable.

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Application version reported by the health check.
    pub(crate) version: String,
}
