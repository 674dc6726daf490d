use crate::auth::jwt::TokenCodec;
use crate::auth::password::PasswordService;
use crate::db::CustomerStore;
use crate::types::{
    AppError, AuthResponse, Customer, LoginRequest, NewCustomer, PermissionCheckResponse,
    RegisterRequest, Result, Role, TokenClaims, TokenUser,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use validator::Validate;

/// Registration, login and permission checks over a [`CustomerStore`].
///
/// Holds no per-request state; every collaborator is shared behind an `Arc`
/// so one instance serves all connections.
pub struct AuthService {
    store: Arc<dyn CustomerStore>,
    codec: Arc<dyn TokenCodec>,
    passwords: PasswordService,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CustomerStore>,
        codec: Arc<dyn TokenCodec>,
        passwords: PasswordService,
    ) -> Self {
        Self {
            store,
            codec,
            passwords,
        }
    }

    /// Creates an active account and signs a token for it.
    pub async fn register(&self, request: RegisterRequest) -> Result<AuthResponse> {
        request.validate()?;

        // Early out only; the store enforces uniqueness on insert
        if self.store.find_by_email(&request.email).await?.is_some() {
            warn!(email = %request.email, "registration rejected: email already in use");
            return Err(AppError::DuplicateAccount);
        }

        let password_hash = self.passwords.hash(request.password).await?;

        let customer = self
            .store
            .create(NewCustomer {
                first_name: request.first_name.unwrap_or_default(),
                last_name: request.last_name.unwrap_or_default(),
                email: request.email,
                password_hash,
                phone: request.phone,
                role: request.role.unwrap_or_default(),
                address: request.address.unwrap_or_default(),
                city: request.city.unwrap_or_default(),
                postal_code: request.postal_code.unwrap_or_default(),
                country: request.country.unwrap_or_default(),
                customer_type: request.customer_type.unwrap_or_default(),
            })
            .await?;

        info!(customer_id = customer.id, role = %customer.role, "customer registered");

        self.issue_token(customer)
    }

    /// Exchanges email and password for a token.
    ///
    /// Unknown email and wrong password are indistinguishable to the caller.
    /// Deactivation is only revealed once the password has matched.
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse> {
        let Some(customer) = self.store.find_by_email(&request.email).await? else {
            warn!(email = %request.email, "login rejected: unknown email");
            return Err(AppError::InvalidCredentials);
        };

        match self
            .passwords
            .verify(request.password, customer.password_hash.clone())
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                warn!(customer_id = customer.id, "login rejected: password mismatch");
                return Err(AppError::InvalidCredentials);
            }
            Err(e) => {
                warn!(customer_id = customer.id, error = %e, "login rejected: unreadable password hash");
                return Err(AppError::InvalidCredentials);
            }
        }

        if !customer.is_active {
            warn!(customer_id = customer.id, "login rejected: account deactivated");
            return Err(AppError::AccountDeactivated);
        }

        info!(customer_id = customer.id, "customer logged in");

        self.issue_token(customer)
    }

    /// Active account with the given id, `None` when missing or deactivated.
    pub async fn validate_account(&self, id: i64) -> Result<Option<Customer>> {
        self.store.find_active_by_id(id).await
    }

    /// Decodes a token, reporting every failure as [`AppError::InvalidToken`].
    pub fn verify_token(&self, token: &str) -> Result<TokenClaims> {
        self.codec.verify(token).map_err(|e| {
            debug!(error = %e, "token verification failed");
            AppError::InvalidToken
        })
    }

    /// Whether the active account `id` satisfies `required`.
    ///
    /// With no requirement any active account passes.
    pub async fn has_permission(&self, id: i64, required: Option<Role>) -> Result<bool> {
        let Some(customer) = self.validate_account(id).await? else {
            return Ok(false);
        };

        Ok(match required {
            None => true,
            Some(role) => customer.role.satisfies(role),
        })
    }

    /// Token inspection for other services.
    ///
    /// Never fails: a bad token or a lookup error yields `valid: false` with
    /// an `Invalid token` message, a valid token without the role yields
    /// `valid: false` and no user.
    pub async fn check_permission(
        &self,
        token: &str,
        required: Option<Role>,
    ) -> PermissionCheckResponse {
        let claims = match self.verify_token(token) {
            Ok(claims) => claims,
            Err(e) => return PermissionCheckResponse::rejected(e),
        };

        match self.has_permission(claims.sub, required).await {
            Ok(true) => PermissionCheckResponse {
                valid: true,
                user: Some(TokenUser::from(&claims)),
                error: None,
            },
            Ok(false) => PermissionCheckResponse {
                valid: false,
                user: None,
                error: None,
            },
            Err(e) => {
                warn!(customer_id = claims.sub, error = %e, "permission check failed");
                PermissionCheckResponse::rejected(AppError::InvalidToken)
            }
        }
    }

    fn issue_token(&self, customer: Customer) -> Result<AuthResponse> {
        let claims = TokenClaims::for_customer(&customer, self.codec.ttl())?;
        let access_token = self.codec.sign(&claims)?;

        Ok(AuthResponse {
            access_token,
            customer: customer.into(),
        })
    }
}

impl PermissionCheckResponse {
    fn rejected(error: AppError) -> Self {
        Self {
            valid: false,
            user: None,
            error: Some(error.to_string()),
        }
    }
}
