//! Authentication and authorization
//!
//! # Module Structure
//!
//! - [`auth::password`](crate::auth::password) - Argon2id hashing on the blocking pool
//! - [`auth::jwt`](crate::auth::jwt) - token signing and verification behind [`TokenCodec`](jwt::TokenCodec)
//! - [`auth::service`](crate::auth::service) - register, login and permission checks
//! - [`auth::middleware`](crate::auth::middleware) - Axum route guard and caller extractor
//!
//! # Roles
//!
//! Two roles exist, `customer` and `admin`. An admin satisfies every
//! requirement; any other role must match exactly. Guards look at the role
//! stored on the account, not the one embedded in the token, so demotions
//! and deactivations apply to tokens already in circulation.
//!
//! # Usage
//!
//! ```ignore
//! use customer_hub::auth::{AuthService, JwtCodec, PasswordService};
//!
//! let auth = AuthService::new(
//!     store,
//!     Arc::new(JwtCodec::new(&secret, 3600)),
//!     PasswordService::new(&config.auth.password)?,
//! );
//! let session = auth.login(LoginRequest { email, password }).await?;
//! ```

pub mod jwt;
pub mod middleware;
pub mod password;
pub mod service;

pub use jwt::{JwtCodec, TokenCodec};
pub use middleware::{authorize, AuthUser};
pub use password::PasswordService;
pub use service::AuthService;
