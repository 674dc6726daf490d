use crate::{
    api::handlers::refresh_customers_gauge,
    auth::AuthUser,
    types::{
        CreateCustomerRequest, CustomerProfile, Result, UpdateCustomerRequest,
        UpdateProfileRequest,
    },
    AppState,
};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

/// List all customers (admin)
#[utoipa::path(
    get,
    path = "/api/customers",
    responses(
        (status = 200, description = "All customers ordered by id", body = Vec<CustomerProfile>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin role required")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn list_customers(State(state): State<AppState>) -> Result<Json<Vec<CustomerProfile>>> {
    Ok(Json(state.customers.list().await?))
}

/// The caller's own account
#[utoipa::path(
    get,
    path = "/api/customers/me",
    responses(
        (status = 200, description = "Caller's account", body = CustomerProfile),
        (status = 401, description = "Missing or invalid token")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
) -> Result<Json<CustomerProfile>> {
    Ok(Json(state.customers.get(caller.id).await?))
}

/// Update the caller's own account
#[utoipa::path(
    patch,
    path = "/api/customers/me",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Updated account", body = CustomerProfile),
        (status = 400, description = "Invalid input"),
        (status = 401, description = "Missing or invalid token"),
        (status = 409, description = "Email already registered")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn update_me(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<CustomerProfile>> {
    Ok(Json(
        state.customers.update_profile(caller.id, payload).await?,
    ))
}

/// Get one customer (admin)
#[utoipa::path(
    get,
    path = "/api/customers/{id}",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 200, description = "Customer found", body = CustomerProfile),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Customer not found")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn get_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CustomerProfile>> {
    Ok(Json(state.customers.get(id).await?))
}

/// Create a customer (admin)
#[utoipa::path(
    post,
    path = "/api/customers",
    request_body = CreateCustomerRequest,
    responses(
        (status = 201, description = "Customer created", body = CustomerProfile),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin role required"),
        (status = 409, description = "Email already registered")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn create_customer(
    State(state): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerProfile>)> {
    let customer = state.customers.create(payload).await?;
    refresh_customers_gauge(&state).await;

    Ok((StatusCode::CREATED, Json(customer)))
}

/// Update any customer, including role and activation (admin)
#[utoipa::path(
    patch,
    path = "/api/customers/{id}",
    params(("id" = i64, Path, description = "Customer id")),
    request_body = UpdateCustomerRequest,
    responses(
        (status = 200, description = "Updated customer", body = CustomerProfile),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Customer not found"),
        (status = 409, description = "Email already registered")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn update_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateCustomerRequest>,
) -> Result<Json<CustomerProfile>> {
    Ok(Json(state.customers.update(id, payload).await?))
}

/// Delete a customer (admin)
#[utoipa::path(
    delete,
    path = "/api/customers/{id}",
    params(("id" = i64, Path, description = "Customer id")),
    responses(
        (status = 204, description = "Customer deleted"),
        (status = 403, description = "Admin role required"),
        (status = 404, description = "Customer not found")
    ),
    tag = "customers",
    security(("bearer" = []))
)]
pub async fn delete_customer(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.customers.remove(id).await?;
    refresh_customers_gauge(&state).await;

    Ok(StatusCode::NO_CONTENT)
}
