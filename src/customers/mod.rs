//! Customer account management
//!
//! Admin CRUD plus self-service profile edits. Every write goes through the
//! same [`CustomerStore`], so email uniqueness holds across registration and
//! administration alike.

use crate::auth::PasswordService;
use crate::db::CustomerStore;
use crate::types::{
    AppError, CreateCustomerRequest, CustomerChanges, CustomerProfile, NewCustomer, Result,
    UpdateCustomerRequest, UpdateProfileRequest,
};
use std::sync::Arc;
use tracing::info;
use validator::Validate;

pub struct CustomerService {
    store: Arc<dyn CustomerStore>,
    passwords: PasswordService,
}

impl CustomerService {
    pub fn new(store: Arc<dyn CustomerStore>, passwords: PasswordService) -> Self {
        Self { store, passwords }
    }

    /// All customers, ordered by id.
    pub async fn list(&self) -> Result<Vec<CustomerProfile>> {
        let customers = self.store.find_all().await?;
        Ok(customers.into_iter().map(CustomerProfile::from).collect())
    }

    pub async fn get(&self, id: i64) -> Result<CustomerProfile> {
        self.store
            .find_by_id(id)
            .await?
            .map(CustomerProfile::from)
            .ok_or_else(|| not_found(id))
    }

    pub async fn create(&self, request: CreateCustomerRequest) -> Result<CustomerProfile> {
        request.validate()?;

        let password_hash = self.passwords.hash(request.password).await?;

        let customer = self
            .store
            .create(NewCustomer {
                first_name: request.first_name,
                last_name: request.last_name,
                email: request.email,
                password_hash,
                phone: request.phone,
                role: request.role.unwrap_or_default(),
                address: request.address,
                city: request.city,
                postal_code: request.postal_code,
                country: request.country,
                customer_type: request.customer_type.unwrap_or_default(),
            })
            .await?;

        info!(customer_id = customer.id, "customer created");

        Ok(customer.into())
    }

    /// Admin update; may change role and activation.
    pub async fn update(&self, id: i64, request: UpdateCustomerRequest) -> Result<CustomerProfile> {
        request.validate()?;
        self.apply(id, request).await
    }

    /// Self-service update of the caller's own account.
    pub async fn update_profile(
        &self,
        id: i64,
        request: UpdateProfileRequest,
    ) -> Result<CustomerProfile> {
        request.validate()?;
        self.apply(id, request.into()).await
    }

    pub async fn remove(&self, id: i64) -> Result<()> {
        self.store.remove(id).await.map_err(|e| match e {
            AppError::NotFound(_) => not_found(id),
            other => other,
        })?;

        info!(customer_id = id, "customer removed");

        Ok(())
    }

    pub async fn count(&self) -> Result<u64> {
        self.store.count().await
    }

    async fn apply(&self, id: i64, request: UpdateCustomerRequest) -> Result<CustomerProfile> {
        let password_hash = match request.password {
            Some(password) => Some(self.passwords.hash(password).await?),
            None => None,
        };

        let changes = CustomerChanges {
            first_name: request.first_name,
            last_name: request.last_name,
            email: request.email,
            password_hash,
            phone: request.phone.map(|p| Some(p).filter(|p| !p.is_empty())),
            role: request.role,
            address: request.address,
            city: request.city,
            postal_code: request.postal_code,
            country: request.country,
            customer_type: request.customer_type,
            is_active: request.is_active,
        };

        let customer = self.store.update(id, changes).await.map_err(|e| match e {
            AppError::NotFound(_) => not_found(id),
            other => other,
        })?;

        info!(customer_id = id, "customer updated");

        Ok(customer.into())
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("Customer with ID {} not found", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{InMemoryStore, MockCustomerStore};
    use crate::types::{CustomerType, Role};
    use crate::utils::toml_config::PasswordConfig;

    fn passwords() -> PasswordService {
        PasswordService::new(&PasswordConfig::fast_for_tests()).unwrap()
    }

    fn service() -> (CustomerService, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::new());
        (CustomerService::new(store.clone(), passwords()), store)
    }

    fn create_request(email: &str) -> CreateCustomerRequest {
        CreateCustomerRequest {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            password: "secret1".to_string(),
            phone: Some("0600000000".to_string()),
            address: "1 Main Street".to_string(),
            city: "Lyon".to_string(),
            postal_code: "69001".to_string(),
            country: "France".to_string(),
            customer_type: Some(CustomerType::Professional),
            role: None,
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let (service, store) = service();

        let created = service.create(create_request("jane@x.com")).await.unwrap();
        assert_eq!(created.customer_type, CustomerType::Professional);
        assert_eq!(created.role, Role::Customer);

        let fetched = service.get(created.id).await.unwrap();
        assert_eq!(fetched, created);

        let stored = store.find_by_id(created.id).await.unwrap().unwrap();
        assert!(stored.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_create_rejects_short_postal_code() {
        let (service, _) = service();
        let mut request = create_request("jane@x.com");
        request.postal_code = "123".to_string();

        let result = service.create(request).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_create_duplicate() {
        let (service, _) = service();
        service.create(create_request("jane@x.com")).await.unwrap();

        let result = service.create(create_request("jane@x.com")).await;
        assert!(matches!(result, Err(AppError::DuplicateAccount)));
    }

    #[tokio::test]
    async fn test_list_ordered_by_id() {
        let (service, _) = service();
        for email in ["c@x.com", "a@x.com", "b@x.com"] {
            service.create(create_request(email)).await.unwrap();
        }

        let emails: Vec<String> = service
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.email)
            .collect();
        assert_eq!(emails, ["c@x.com", "a@x.com", "b@x.com"]);
        assert_eq!(service.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_admin_update_changes_role_and_activation() {
        let (service, _) = service();
        let created = service.create(create_request("jane@x.com")).await.unwrap();

        let updated = service
            .update(
                created.id,
                UpdateCustomerRequest {
                    role: Some(Role::Admin),
                    is_active: Some(false),
                    city: Some("Paris".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.role, Role::Admin);
        assert!(!updated.is_active);
        assert_eq!(updated.city, "Paris");
        assert_eq!(updated.first_name, "Jane");
        assert!(updated.updated_at >= created.updated_at);
    }

    #[tokio::test]
    async fn test_empty_phone_clears_number() {
        let (service, _) = service();
        let created = service.create(create_request("jane@x.com")).await.unwrap();
        assert!(created.phone.is_some());

        let kept = service
            .update_profile(created.id, UpdateProfileRequest::default())
            .await
            .unwrap();
        assert_eq!(kept.phone.as_deref(), Some("0600000000"));

        let cleared = service
            .update_profile(
                created.id,
                UpdateProfileRequest {
                    phone: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(cleared.phone, None);
    }

    #[tokio::test]
    async fn test_profile_update_rehashes_password() {
        let (service, store) = service();
        let created = service.create(create_request("jane@x.com")).await.unwrap();
        let before = store.find_by_id(created.id).await.unwrap().unwrap();

        service
            .update_profile(
                created.id,
                UpdateProfileRequest {
                    password: Some("rotated-secret".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let after = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_ne!(before.password_hash, after.password_hash);
        assert!(passwords()
            .verify_password("rotated-secret", &after.password_hash)
            .unwrap());
        assert_eq!(after.role, before.role);
    }

    #[tokio::test]
    async fn test_update_email_collision() {
        let (service, _) = service();
        service.create(create_request("one@x.com")).await.unwrap();
        let two = service.create(create_request("two@x.com")).await.unwrap();

        let result = service
            .update_profile(
                two.id,
                UpdateProfileRequest {
                    email: Some("one@x.com".to_string()),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(AppError::DuplicateAccount)));
    }

    #[tokio::test]
    async fn test_missing_customer() {
        let (service, _) = service();

        assert!(matches!(service.get(99).await, Err(AppError::NotFound(_))));
        assert!(matches!(
            service.update(99, UpdateCustomerRequest::default()).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(service.remove(99).await, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove() {
        let (service, _) = service();
        let created = service.create(create_request("jane@x.com")).await.unwrap();

        service.remove(created.id).await.unwrap();
        assert!(matches!(
            service.get(created.id).await,
            Err(AppError::NotFound(_))
        ));
        assert_eq!(service.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut store = MockCustomerStore::new();
        store
            .expect_find_all()
            .returning(|| Err(AppError::Database("disk full".to_string())));

        let service = CustomerService::new(Arc::new(store), passwords());
        assert!(matches!(service.list().await, Err(AppError::Database(_))));
    }
}
