use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use validator::Validate;

// ============= Roles =============

/// Access role carried by every customer account and every issued token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Regular customer; only satisfies a `customer` requirement
    #[default]
    Customer,
    /// Administrator; satisfies every requirement
    Admin,
}

impl Role {
    /// Whether an account holding `self` may act where `required` is demanded.
    ///
    /// Admin passes unconditionally, every other role needs an exact match.
    pub fn satisfies(self, required: Role) -> bool {
        if self == Role::Admin {
            return true;
        }
        self == required
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "customer" => Ok(Role::Customer),
            "admin" => Ok(Role::Admin),
            other => Err(AppError::InvalidInput(format!("Unknown role: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    #[default]
    Individual,
    Professional,
}

impl CustomerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Individual => "individual",
            CustomerType::Professional => "professional",
        }
    }
}

impl FromStr for CustomerType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "individual" => Ok(CustomerType::Individual),
            "professional" => Ok(CustomerType::Professional),
            other => Err(AppError::InvalidInput(format!(
                "Unknown customer type: {}",
                other
            ))),
        }
    }
}

// ============= Customer Records =============

/// A customer account as persisted by the store.
///
/// Carries the password hash and is not `Serialize`; responses use
/// [`CustomerProfile`].
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: Role,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub customer_type: CustomerType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a customer, without credentials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CustomerProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub customer_type: CustomerType,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Customer> for CustomerProfile {
    fn from(c: Customer) -> Self {
        Self {
            id: c.id,
            first_name: c.first_name,
            last_name: c.last_name,
            email: c.email,
            phone: c.phone,
            role: c.role,
            address: c.address,
            city: c.city,
            postal_code: c.postal_code,
            country: c.country,
            customer_type: c.customer_type,
            is_active: c.is_active,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Fields required to insert a customer; the store assigns id and timestamps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub role: Role,
    pub address: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub customer_type: CustomerType,
}

/// Partial update applied by [`crate::db::CustomerStore::update`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerChanges {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    /// `Some(None)` clears the number
    pub phone: Option<Option<String>>,
    pub role: Option<Role>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub customer_type: Option<CustomerType>,
    pub is_active: Option<bool>,
}

impl CustomerChanges {
    /// Writes every present field onto `customer` and bumps `updated_at`.
    pub fn apply_to(self, customer: &mut Customer) {
        if let Some(v) = self.first_name {
            customer.first_name = v;
        }
        if let Some(v) = self.last_name {
            customer.last_name = v;
        }
        if let Some(v) = self.email {
            customer.email = v;
        }
        if let Some(v) = self.password_hash {
            customer.password_hash = v;
        }
        if let Some(v) = self.phone {
            customer.phone = v;
        }
        if let Some(v) = self.role {
            customer.role = v;
        }
        if let Some(v) = self.address {
            customer.address = v;
        }
        if let Some(v) = self.city {
            customer.city = v;
        }
        if let Some(v) = self.postal_code {
            customer.postal_code = v;
        }
        if let Some(v) = self.country {
            customer.country = v;
        }
        if let Some(v) = self.customer_type {
            customer.customer_type = v;
        }
        if let Some(v) = self.is_active {
            customer.is_active = v;
        }
        customer.updated_at = Utc::now();
    }
}

// ============= Authentication Types =============

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterRequest {
    #[validate(email(message = "email must be a valid address"))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    /// Requested role, `customer` when omitted
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[serde(default)]
    #[validate(length(max = 10))]
    pub postal_code: Option<String>,
    #[serde(default)]
    #[validate(length(max = 100))]
    pub country: Option<String>,
    #[serde(default)]
    pub customer_type: Option<CustomerType>,
}

/// Token plus the authenticated customer, returned by register and login.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    pub access_token: String,
    pub customer: CustomerProfile,
}

/// Body of the profile endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user: CustomerProfile,
}

/// JWT payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Customer id
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    /// Unique token id
    pub jti: String,
}

/// Identity summary echoed back by the token inspection endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TokenUser {
    pub id: i64,
    pub email: String,
    pub role: Role,
}

impl From<&Customer> for TokenUser {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id,
            email: customer.email.clone(),
            role: customer.role,
        }
    }
}

impl From<&TokenClaims> for TokenUser {
    fn from(claims: &TokenClaims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email.clone(),
            role: claims.role,
        }
    }
}

/// Body of the token inspection endpoint.
///
/// Unknown fields are rejected so a misspelled role field cannot drop the
/// requirement.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PermissionCheckRequest {
    pub token: String,
    #[serde(default, alias = "requiredRole")]
    pub required_role: Option<Role>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PermissionCheckResponse {
    pub valid: bool,
    pub user: Option<TokenUser>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

// ============= Customer Management Types =============

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email(message = "email must be a valid address"), length(max = 255))]
    pub email: String,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: String,
    #[validate(length(max = 100))]
    pub city: String,
    #[validate(length(min = 5, max = 10))]
    pub postal_code: String,
    #[validate(length(max = 100))]
    pub country: String,
    #[serde(default)]
    pub customer_type: Option<CustomerType>,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Admin update; every field is optional. An empty `phone` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "email must be a valid address"), length(max = 255))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(min = 5, max = 10))]
    pub postal_code: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    pub customer_type: Option<CustomerType>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// Self-service update; role and activation are not reachable from here.
/// An empty `phone` clears it.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email(message = "email must be a valid address"), length(max = 255))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "password must be at least 6 characters"))]
    pub password: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(min = 5, max = 10))]
    pub postal_code: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    pub customer_type: Option<CustomerType>,
}

impl From<UpdateProfileRequest> for UpdateCustomerRequest {
    fn from(p: UpdateProfileRequest) -> Self {
        Self {
            first_name: p.first_name,
            last_name: p.last_name,
            email: p.email,
            password: p.password,
            phone: p.phone,
            address: p.address,
            city: p.city,
            postal_code: p.postal_code,
            country: p.country,
            customer_type: p.customer_type,
            role: None,
            is_active: None,
        }
    }
}

// ============= Error Types =============

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Customer with this email already exists")]
    DuplicateAccount,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is deactivated")]
    AccountDeactivated,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(errors.to_string())
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        let status = match &self {
            AppError::DuplicateAccount => StatusCode::CONFLICT,
            AppError::InvalidCredentials
            | AppError::AccountDeactivated
            | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Driver and internal details stay in the logs
        let message = match &self {
            AppError::Database(detail) | AppError::Internal(detail) => {
                tracing::error!(error = %detail, "request failed");
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = serde_json::json!({
            "error": message
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
