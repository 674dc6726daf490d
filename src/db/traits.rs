//! Database abstraction traits
//!
//! This module provides the `CustomerStore` trait that abstracts over the
//! customer persistence backends (in-process map, in-memory SQLite,
//! file-based SQLite, remote Turso).
//!
//! # Example
//!
//! ```rust,ignore
//! use customer_hub::db::DatabaseProvider;
//!
//! // Use in-memory SQLite (default for development/testing)
//! let store = DatabaseProvider::Memory.create_store().await?;
//!
//! // Use file-based SQLite
//! let store = DatabaseProvider::SQLite { path: "data/customers.db".into() }
//!     .create_store()
//!     .await?;
//! ```

use crate::types::{Customer, CustomerChanges, NewCustomer, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Database provider configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DatabaseProvider {
    /// In-memory SQLite database (ephemeral, lost on restart)
    #[default]
    Memory,
    /// Plain in-process map, no SQL involved
    InProcess,
    /// File-based SQLite database
    SQLite {
        /// Path to the SQLite database file
        path: String,
    },
    /// Remote Turso database (requires network access)
    #[cfg(feature = "turso")]
    Turso {
        /// The Turso database URL (e.g., `libsql://your-db.turso.io`)
        url: String,
        /// Authentication token for the Turso database
        auth_token: String,
    },
}

impl DatabaseProvider {
    /// Create a customer store from this provider configuration
    pub async fn create_store(&self) -> Result<Arc<dyn CustomerStore>> {
        match self {
            DatabaseProvider::Memory => {
                let store = super::turso::TursoStore::new_memory().await?;
                Ok(Arc::new(store))
            }
            DatabaseProvider::InProcess => Ok(Arc::new(super::memory::InMemoryStore::new())),
            DatabaseProvider::SQLite { path } => {
                let store = super::turso::TursoStore::new_local(path).await?;
                Ok(Arc::new(store))
            }
            #[cfg(feature = "turso")]
            DatabaseProvider::Turso { url, auth_token } => {
                let store =
                    super::turso::TursoStore::new_remote(url.clone(), auth_token.clone()).await?;
                Ok(Arc::new(store))
            }
        }
    }

    /// Maps a `[database] url` value onto a provider.
    ///
    /// `:memory:` selects in-memory SQLite, `memory` the plain map store,
    /// anything else is treated as a SQLite file path.
    pub fn from_url(url: &str) -> Self {
        match url {
            "" | ":memory:" => DatabaseProvider::Memory,
            "memory" => DatabaseProvider::InProcess,
            path => DatabaseProvider::SQLite {
                path: path.to_string(),
            },
        }
    }
}

/// Persistence contract for customer accounts.
///
/// Email uniqueness is enforced here, not by callers: `create` and `update`
/// fail with [`AppError::DuplicateAccount`](crate::types::AppError::DuplicateAccount)
/// when another account already owns the email.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Exact, case-sensitive lookup by email
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>>;

    /// Lookup by id regardless of activation state
    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>>;

    /// Lookup by id that only matches active accounts
    async fn find_active_by_id(&self, id: i64) -> Result<Option<Customer>> {
        Ok(self.find_by_id(id).await?.filter(|c| c.is_active))
    }

    /// All customers ordered by id
    async fn find_all(&self) -> Result<Vec<Customer>>;

    /// Number of stored customers
    async fn count(&self) -> Result<u64>;

    /// Insert a new, active customer
    async fn create(&self, customer: NewCustomer) -> Result<Customer>;

    /// Apply a partial update; `NotFound` when the id is unknown
    async fn update(&self, id: i64, changes: CustomerChanges) -> Result<Customer>;

    /// Delete a customer; `NotFound` when the id is unknown
    async fn remove(&self, id: i64) -> Result<()>;
}
