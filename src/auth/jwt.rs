use crate::types::{AppError, Customer, Result, TokenClaims};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use uuid::Uuid;

/// Signs and verifies access tokens.
///
/// The secret and token lifetime belong to the implementation; callers only
/// hand over claims or a token string.
pub trait TokenCodec: Send + Sync {
    /// Encodes and signs `claims`.
    fn sign(&self, claims: &TokenClaims) -> Result<String>;

    /// Checks signature and expiry and returns the embedded claims.
    fn verify(&self, token: &str) -> Result<TokenClaims>;

    /// Lifetime of newly issued tokens.
    fn ttl(&self) -> Duration;
}

/// HS256 JSON Web Token codec.
pub struct JwtCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl JwtCodec {
    /// Creates a codec from a shared secret and a token lifetime in seconds.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for signing JWTs (should be at least 32 chars)
    /// * `expiry_secs` - Access token validity in seconds
    ///
    /// A lifetime past what `chrono` can represent is kept at the maximum and
    /// fails when a token is issued.
    pub fn new(jwt_secret: &str, expiry_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            ttl: Duration::try_seconds(expiry_secs).unwrap_or(Duration::MAX),
        }
    }
}

impl TokenCodec for JwtCodec {
    fn sign(&self, claims: &TokenClaims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<TokenClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Internal(format!("Token rejected: {}", e)))
    }

    fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl TokenClaims {
    /// Claims for `customer`, valid from now for `ttl`.
    pub fn for_customer(customer: &Customer, ttl: Duration) -> Result<Self> {
        let now = Utc::now();
        let exp = now.checked_add_signed(ttl).ok_or_else(|| {
            AppError::Internal(format!("Token lifetime out of range: {}", ttl))
        })?;

        Ok(Self {
            sub: customer.id,
            email: customer.email.clone(),
            role: customer.role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
            jti: Uuid::new_v4().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Role;

    const SECRET: &str = "test-secret-key-that-is-at-least-32-chars";

    fn claims(sub: i64, role: Role, exp_offset: i64) -> TokenClaims {
        let now = Utc::now().timestamp();
        TokenClaims {
            sub,
            email: "user@test.com".to_string(),
            role,
            iat: now,
            exp: now + exp_offset,
            jti: Uuid::new_v4().to_string(),
        }
    }

    #[test]
    fn test_token_verification_success() {
        let codec = JwtCodec::new(SECRET, 900);
        let issued = claims(456, Role::Admin, 900);

        let token = codec.sign(&issued).expect("should sign");
        let decoded = codec.verify(&token).expect("should verify token");

        assert_eq!(decoded, issued);
    }

    #[test]
    fn test_token_verification_invalid_token() {
        let codec = JwtCodec::new(SECRET, 900);
        assert!(codec.verify("invalid.token.here").is_err());
        assert!(codec.verify("").is_err());
    }

    #[test]
    fn test_token_verification_wrong_secret() {
        let codec1 = JwtCodec::new("secret-one-that-is-32-chars-long", 900);
        let codec2 = JwtCodec::new("secret-two-that-is-32-chars-long", 900);

        let token = codec1.sign(&claims(789, Role::Customer, 900)).unwrap();
        assert!(codec2.verify(&token).is_err(), "token from different secret should fail");
    }

    #[test]
    fn test_expired_token_rejected() {
        let codec = JwtCodec::new(SECRET, 900);
        let token = codec.sign(&claims(1, Role::Customer, -5)).unwrap();

        assert!(codec.verify(&token).is_err());
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = JwtCodec::new(SECRET, 900);
        let token = codec.sign(&claims(1, Role::Customer, 900)).unwrap();

        let forged = codec.sign(&claims(1, Role::Admin, 900)).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged_parts: Vec<&str> = forged.split('.').collect();
        parts[1] = forged_parts[1];

        assert!(codec.verify(&parts.join(".")).is_err());
    }

    fn customer() -> Customer {
        let now = Utc::now();
        Customer {
            id: 3,
            first_name: String::new(),
            last_name: String::new(),
            email: "c@example.com".to_string(),
            password_hash: "x".to_string(),
            phone: None,
            role: Role::Customer,
            address: String::new(),
            city: String::new(),
            postal_code: String::new(),
            country: String::new(),
            customer_type: Default::default(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_claims_expiration_window() {
        let customer = customer();
        let a = TokenClaims::for_customer(&customer, Duration::seconds(900)).unwrap();
        let b = TokenClaims::for_customer(&customer, Duration::seconds(900)).unwrap();

        assert_eq!(a.exp - a.iat, 900);
        assert_eq!(a.sub, 3);
        assert_ne!(a.jti, b.jti, "each token carries its own id");
    }

    #[test]
    fn test_oversized_lifetime_is_an_error() {
        let codec = JwtCodec::new(SECRET, i64::MAX);
        let result = TokenClaims::for_customer(&customer(), codec.ttl());
        assert!(matches!(result, Err(AppError::Internal(_))));

        let far = Duration::seconds(1_000_000_000_000_000);
        let result = TokenClaims::for_customer(&customer(), far);
        assert!(matches!(result, Err(AppError::Internal(_))));
    }
}
