//! # Customer Hub
//!
//! Customer accounts with credential-based authentication, signed access
//! tokens and role-based authorization, served over an Axum REST API.
//!
//! ## Overview
//!
//! Customer Hub can be used in two ways:
//!
//! 1. **As a standalone server** - Run the `customer-hub` binary
//! 2. **As a library** - Embed [`AuthService`] or the whole router in your own
//!    Axum application
//!
//! ## Quick Start (Library Usage)
//!
//! ```rust,ignore
//! use customer_hub::{create_app, AppConfig, AppState};
//!
//! let config = AppConfig::load("customers.toml")?;
//! let secret = config.jwt_secret()?;
//! let state = AppState::from_config(config, &secret).await?;
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//! axum::serve(listener, create_app(state)).await?;
//! ```
//!
//! ### Using the auth core directly
//!
//! ```rust,ignore
//! use customer_hub::auth::{AuthService, JwtCodec, PasswordService};
//! use customer_hub::db::InMemoryStore;
//! use std::sync::Arc;
//!
//! let auth = AuthService::new(
//!     Arc::new(InMemoryStore::new()),
//!     Arc::new(JwtCodec::new(&secret, 3600)),
//!     PasswordService::new(&Default::default())?,
//! );
//! let session = auth.register(request).await?;
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `turso` | Remote Turso databases via `[database] turso_url_env` |
//! | `swagger-ui` | Interactive API docs at `/swagger-ui` |

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

/// HTTP API handlers and routes.
pub mod api;
/// Password hashing, tokens, guards.
pub mod auth;
/// Command-line interface.
pub mod cli;
/// Customer account management.
pub mod customers;
/// Customer storage backends (in-process, SQLite, Turso).
pub mod db;
/// Prometheus metrics recorder and middleware.
pub mod metrics;
/// Core types (accounts, requests, responses, errors).
pub mod types;
/// Configuration utilities (TOML).
pub mod utils;

// Re-export commonly used types
pub use auth::{AuthService, JwtCodec, PasswordService, TokenCodec};
pub use customers::CustomerService;
pub use db::{CustomerStore, DatabaseProvider};
pub use types::{AppError, Result};
pub use utils::toml_config::AppConfig;

use axum::{middleware, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Effective configuration
    pub config: Arc<AppConfig>,
    /// Registration, login and permission checks
    pub auth_service: Arc<AuthService>,
    /// Customer CRUD
    pub customers: Arc<CustomerService>,
    /// Renders `/metrics`
    pub metrics: PrometheusHandle,
}

impl AppState {
    /// Wires services around an existing store.
    pub fn new(
        config: AppConfig,
        store: Arc<dyn CustomerStore>,
        jwt_secret: &str,
    ) -> Result<Self> {
        let passwords = PasswordService::new(&config.auth.password)?;
        let codec = Arc::new(JwtCodec::new(jwt_secret, config.auth.jwt_expiry));

        Ok(Self {
            auth_service: Arc::new(AuthService::new(store.clone(), codec, passwords.clone())),
            customers: Arc::new(CustomerService::new(store, passwords)),
            metrics: metrics::setup_metrics_recorder()?,
            config: Arc::new(config),
        })
    }

    /// Opens the configured store and wires services around it.
    pub async fn from_config(config: AppConfig, jwt_secret: &str) -> Result<Self> {
        let provider = config
            .database_provider()
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let store = provider.create_store().await?;

        Self::new(config, store, jwt_secret)
    }
}

/// Full application router with tracing, CORS and metrics layers.
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(api::handlers::health::health_check))
        .route("/metrics", get(api::handlers::health::metrics))
        .nest(
            "/api",
            api::routes::create_router(state.auth_service.clone()),
        )
        .merge(api::openapi::docs_router())
        .layer(middleware::from_fn(metrics::metrics_layer))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
