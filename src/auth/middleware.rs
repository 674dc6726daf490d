use crate::auth::service::AuthService;
use crate::types::{AppError, Role, TokenUser};
use axum::{
    extract::{FromRequestParts, Request},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

/// Route guard.
///
/// Rejects with 401 when the bearer token is missing or invalid or the
/// account is gone or deactivated, and with 403 when the account's current
/// role does not satisfy `required`. On success the stored identity of the
/// account is placed in the request extensions for [`AuthUser`].
///
/// ```ignore
/// let admin = Router::new()
///     .route("/", get(list_customers))
///     .route_layer(middleware::from_fn(move |req, next| {
///         authorize(auth.clone(), Some(Role::Admin), req, next)
///     }));
/// ```
pub async fn authorize(
    auth: Arc<AuthService>,
    required: Option<Role>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&req).ok_or(AppError::InvalidToken)?;
    let claims = auth.verify_token(token)?;

    let Some(customer) = auth.validate_account(claims.sub).await? else {
        tracing::debug!(customer_id = claims.sub, "token for missing or inactive account");
        return Err(AppError::InvalidToken);
    };

    if let Some(role) = required {
        if !customer.role.satisfies(role) {
            tracing::debug!(customer_id = customer.id, required = %role, "role requirement not met");
            return Err(AppError::Forbidden);
        }
    }

    req.extensions_mut().insert(TokenUser::from(&customer));

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Current identity of the caller, available behind [`authorize`].
pub struct AuthUser(pub TokenUser);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenUser>()
            .cloned()
            .map(AuthUser)
            .ok_or(AppError::InvalidToken)
    }
}
