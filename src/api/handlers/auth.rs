use crate::{
    api::handlers::refresh_customers_gauge,
    auth::AuthUser,
    types::{
        AuthResponse, LoginRequest, PermissionCheckRequest, PermissionCheckResponse,
        ProfileResponse, RegisterRequest, Result,
    },
    AppState,
};
use axum::{extract::State, http::StatusCode, Json};

/// Register a new customer account
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Customer registered successfully", body = AuthResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    ),
    tag = "auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let response = state.auth_service.register(payload).await?;
    refresh_customers_gauge(&state).await;

    Ok((StatusCode::CREATED, Json(response)))
}

/// Login with email and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials or account deactivated")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    Ok(Json(state.auth_service.login(payload).await?))
}

/// Current customer's account
#[utoipa::path(
    get,
    path = "/api/auth/profile",
    responses(
        (status = 200, description = "Authenticated customer", body = ProfileResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "auth",
    security(("bearer" = []))
)]
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<ProfileResponse>> {
    let user = state.customers.get(caller.id).await?;
    Ok(Json(ProfileResponse { user }))
}

/// Confirm that the presented token is valid
#[utoipa::path(
    post,
    path = "/api/auth/validate",
    responses(
        (status = 200, description = "Token is valid", body = PermissionCheckResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "auth",
    security(("bearer" = []))
)]
pub async fn validate(AuthUser(caller): AuthUser) -> Json<PermissionCheckResponse> {
    Json(PermissionCheckResponse {
        valid: true,
        user: Some(caller),
        error: None,
    })
}

/// Check a token and optional role on behalf of another service
///
/// Always answers 200; failures are reported in the body.
#[utoipa::path(
    post,
    path = "/api/auth/validate-permission",
    request_body = PermissionCheckRequest,
    responses(
        (status = 200, description = "Outcome of the check", body = PermissionCheckResponse)
    ),
    tag = "auth"
)]
pub async fn validate_permission(
    State(state): State<AppState>,
    Json(payload): Json<PermissionCheckRequest>,
) -> Json<PermissionCheckResponse> {
    Json(
        state
            .auth_service
            .check_permission(&payload.token, payload.required_role)
            .await,
    )
}
