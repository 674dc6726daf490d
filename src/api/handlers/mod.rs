//! API request handlers.
//!
//! This module contains all HTTP request handlers organized by functionality.

/// Authentication handlers (register, login, token checks).
pub mod auth;
/// Customer management handlers.
pub mod customers;
/// Health and metrics endpoints.
pub mod health;

use crate::AppState;

/// Re-reads the customer count into the `customers_total` gauge.
pub(crate) async fn refresh_customers_gauge(state: &AppState) {
    match state.customers.count().await {
        Ok(count) => crate::metrics::set_customers_count(count),
        Err(e) => tracing::warn!(error = %e, "failed to refresh customers gauge"),
    }
}
