//! Configuration utilities.

/// TOML service configuration (`customers.toml`).
pub mod toml_config;
