//! HTTP API Handlers and Routes
//!
//! This module provides the REST API layer, built on the Axum web framework.
//!
//! # Module Structure
//!
//! - [`api::handlers`](crate::api::handlers) - Request handlers for each endpoint
//! - [`api::routes`](crate::api::routes) - Route definitions and guards
//! - [`api::openapi`](crate::api::openapi) - OpenAPI document
//!
//! # API Endpoints
//!
//! ## Authentication (`/api/auth`)
//! - `POST /api/auth/register` - Register and receive a token
//! - `POST /api/auth/login` - Login and receive a token
//! - `GET /api/auth/profile` - Current account (authenticated)
//! - `POST /api/auth/validate` - Check the presented token (authenticated)
//! - `POST /api/auth/validate-permission` - Check a token and role for another service
//!
//! ## Customers (`/api/customers`)
//! - `GET|PATCH /api/customers/me` - Own account (authenticated)
//! - `GET|POST /api/customers` - List or create (admin)
//! - `GET|PATCH|DELETE /api/customers/{id}` - Manage one account (admin)
//!
//! ## Operations
//! - `GET /health` - Health check
//! - `GET /metrics` - Prometheus metrics
//! - `GET /api-docs/openapi.json` - OpenAPI document
//!
//! # Authentication
//!
//! Guarded endpoints require a token in the `Authorization` header:
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! # OpenAPI Documentation
//!
//! When the `swagger-ui` feature is enabled, interactive API documentation
//! is available at `/swagger-ui/`.

/// Request and response handlers for all API endpoints.
pub mod handlers;
/// OpenAPI document and docs router.
pub mod openapi;
/// Router configuration and route definitions.
pub mod routes;
