use crate::api::handlers::{auth, customers};
use crate::auth::{authorize, AuthService};
use crate::types::Role;
use crate::AppState;
use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Routes mounted under `/api`.
pub fn create_router(auth_service: Arc<AuthService>) -> Router<AppState> {
    let public_routes = Router::new()
        // Public routes (no auth required)
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/validate-permission", post(auth::validate_permission));

    let authenticated = auth_service.clone();
    let protected_routes = Router::new()
        // Any active account
        .route("/auth/profile", get(auth::profile))
        .route("/auth/validate", post(auth::validate))
        .route(
            "/customers/me",
            get(customers::get_me).patch(customers::update_me),
        )
        .route_layer(middleware::from_fn(move |req: Request, next: Next| {
            authorize(authenticated.clone(), None, req, next)
        }));

    let admin_routes = Router::new()
        .route(
            "/customers",
            get(customers::list_customers).post(customers::create_customer),
        )
        .route(
            "/customers/{id}",
            get(customers::get_customer)
                .patch(customers::update_customer)
                .delete(customers::delete_customer),
        )
        .route_layer(middleware::from_fn(move |req: Request, next: Next| {
            authorize(auth_service.clone(), Some(Role::Admin), req, next)
        }));

    public_routes.merge(protected_routes).merge(admin_routes)
}
