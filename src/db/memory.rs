use crate::db::traits::CustomerStore;
use crate::types::{AppError, Customer, CustomerChanges, NewCustomer, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;

#[derive(Default)]
struct Inner {
    last_id: i64,
    customers: BTreeMap<i64, Customer>,
}

/// Customer store kept in process memory.
///
/// Uniqueness checks and writes happen under a single write lock, so two
/// concurrent registrations for the same email cannot both succeed.
#[derive(Default)]
pub struct InMemoryStore {
    inner: RwLock<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        let inner = self.inner.read();
        Ok(inner
            .customers
            .values()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>> {
        Ok(self.inner.read().customers.get(&id).cloned())
    }

    async fn find_all(&self) -> Result<Vec<Customer>> {
        Ok(self.inner.read().customers.values().cloned().collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.inner.read().customers.len() as u64)
    }

    async fn create(&self, customer: NewCustomer) -> Result<Customer> {
        let mut inner = self.inner.write();

        if inner.customers.values().any(|c| c.email == customer.email) {
            return Err(AppError::DuplicateAccount);
        }

        inner.last_id += 1;
        let now = Utc::now();
        let record = Customer {
            id: inner.last_id,
            first_name: customer.first_name,
            last_name: customer.last_name,
            email: customer.email,
            password_hash: customer.password_hash,
            phone: customer.phone,
            role: customer.role,
            address: customer.address,
            city: customer.city,
            postal_code: customer.postal_code,
            country: customer.country,
            customer_type: customer.customer_type,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        inner.customers.insert(record.id, record.clone());

        Ok(record)
    }

    async fn update(&self, id: i64, changes: CustomerChanges) -> Result<Customer> {
        let mut inner = self.inner.write();

        if let Some(email) = &changes.email {
            if inner
                .customers
                .values()
                .any(|c| c.id != id && &c.email == email)
            {
                return Err(AppError::DuplicateAccount);
            }
        }

        let customer = inner
            .customers
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))?;
        changes.apply_to(customer);

        Ok(customer.clone())
    }

    async fn remove(&self, id: i64) -> Result<()> {
        self.inner
            .write()
            .customers
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
    }
}
