//! Shared helpers for integration tests.
//!
//! Builds the full router over an in-process store with cheap Argon2
//! parameters, plus shortcuts for obtaining tokens.

#![allow(dead_code)]

use axum_test::TestServer;
use customer_hub::{
    create_app,
    db::{CustomerStore, InMemoryStore},
    utils::toml_config::PasswordConfig,
    AppConfig, AppState,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub const TEST_SECRET: &str = "integration-test-secret-with-32-chars!";

pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.auth.password = PasswordConfig::fast_for_tests();
    config.database.url = "memory".to_string();
    config
}

pub fn test_state_with(store: Arc<dyn CustomerStore>) -> AppState {
    AppState::new(test_config(), store, TEST_SECRET).expect("Failed to build state")
}

/// Test server over a fresh in-memory store
pub fn create_test_server() -> TestServer {
    let state = test_state_with(Arc::new(InMemoryStore::new()));
    TestServer::new(create_app(state)).expect("Failed to create test server")
}

/// Registers an account and returns `(token, customer id)`.
pub async fn register(server: &TestServer, email: &str, role: Option<&str>) -> (String, i64) {
    let mut body = json!({
        "email": email,
        "password": "secret1",
    });
    if let Some(role) = role {
        body["role"] = json!(role);
    }

    let response = server.post("/api/auth/register").json(&body).await;
    let body: Value = response.json();

    let token = body["access_token"]
        .as_str()
        .unwrap_or_else(|| panic!("no token in register response: {}", body))
        .to_string();
    let id = body["customer"]["id"].as_i64().expect("customer id");

    (token, id)
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}
