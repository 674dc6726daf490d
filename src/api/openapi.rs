//! OpenAPI documentation
//!
//! The document is generated from the `#[utoipa::path]` annotations on the
//! handlers. When adding an endpoint, register its path and any new schema
//! types below.

use crate::api::handlers::health::HealthResponse;
use crate::types::{
    AuthResponse, CreateCustomerRequest, CustomerProfile, CustomerType, LoginRequest,
    PermissionCheckRequest, PermissionCheckResponse, ProfileResponse, RegisterRequest, Role,
    TokenUser, UpdateCustomerRequest, UpdateProfileRequest,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Customer Hub API",
        description = "Customer accounts, authentication and role-based authorization.",
        license(name = "MIT")
    ),
    tags(
        (name = "health", description = "Health check and metrics"),
        (name = "auth", description = "Registration, login and token checks"),
        (name = "customers", description = "Customer account management")
    ),
    components(
        schemas(
            Role,
            CustomerType,
            CustomerProfile,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
            ProfileResponse,
            TokenUser,
            PermissionCheckRequest,
            PermissionCheckResponse,
            CreateCustomerRequest,
            UpdateCustomerRequest,
            UpdateProfileRequest,
            HealthResponse,
        )
    ),
    paths(
        crate::api::handlers::health::health_check,
        crate::api::handlers::health::metrics,
        crate::api::handlers::auth::register,
        crate::api::handlers::auth::login,
        crate::api::handlers::auth::profile,
        crate::api::handlers::auth::validate,
        crate::api::handlers::auth::validate_permission,
        crate::api::handlers::customers::list_customers,
        crate::api::handlers::customers::get_me,
        crate::api::handlers::customers::update_me,
        crate::api::handlers::customers::get_customer,
        crate::api::handlers::customers::create_customer,
        crate::api::handlers::customers::update_customer,
        crate::api::handlers::customers::delete_customer,
    ),
    modifiers(&BearerAuth)
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Serves the raw document at `/api-docs/openapi.json`.
#[cfg(not(feature = "swagger-ui"))]
pub fn docs_router<S>() -> axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    axum::Router::new().route(
        "/api-docs/openapi.json",
        axum::routing::get(|| async { axum::Json(ApiDoc::openapi()) }),
    )
}

/// Mounts Swagger UI at `/swagger-ui` and the document at `/api-docs/openapi.json`.
#[cfg(feature = "swagger-ui")]
pub fn docs_router<S>() -> axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi())
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_spec_valid() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string_pretty(&spec).unwrap();

        assert!(json.contains("Customer Hub API"));
        assert!(json.contains("/api/auth/register"));
        assert!(json.contains("/api/auth/validate-permission"));
        assert!(json.contains("/api/customers/{id}"));
        assert!(json.contains("/metrics"));
    }

    #[test]
    fn test_openapi_contains_schemas_and_security() {
        let spec = ApiDoc::openapi();
        let json = serde_json::to_string(&spec).unwrap();

        assert!(json.contains("CustomerProfile"));
        assert!(json.contains("PermissionCheckResponse"));
        assert!(json.contains("\"bearer\""));
        assert!(!json.contains("password_hash"));
    }

    #[test]
    fn test_docs_router_creates() {
        let _router: axum::Router<()> = docs_router();
    }
}
