use crate::db::traits::CustomerStore;
use crate::types::{AppError, Customer, CustomerChanges, NewCustomer, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use libsql::{Builder, Connection, Database, Row, Value};

const CUSTOMER_COLUMNS: &str = "id, first_name, last_name, email, password_hash, phone, role, \
     address, city, postal_code, country, customer_type, is_active, created_at, updated_at";

/// Customer store backed by libsql (SQLite locally, Turso remotely).
///
/// A single connection is held for the lifetime of the store so that an
/// in-memory database keeps its contents between calls.
pub struct TursoStore {
    _db: Database,
    conn: Connection,
}

impl TursoStore {
    /// Opens (or creates) a SQLite database file.
    pub async fn new_local(path: &str) -> Result<Self> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() && path != ":memory:" {
                std::fs::create_dir_all(parent).map_err(|e| {
                    AppError::Database(format!("Failed to create {}: {}", parent.display(), e))
                })?;
            }
        }

        let db = Builder::new_local(path)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to open database: {}", e)))?;

        Self::from_database(db).await
    }

    /// Ephemeral database that lives as long as the store.
    pub async fn new_memory() -> Result<Self> {
        Self::new_local(":memory:").await
    }

    #[cfg(feature = "turso")]
    pub async fn new_remote(url: String, auth_token: String) -> Result<Self> {
        let db = Builder::new_remote(url, auth_token)
            .build()
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect to Turso: {}", e)))?;

        Self::from_database(db).await
    }

    async fn from_database(db: Database) -> Result<Self> {
        let conn = db
            .connect()
            .map_err(|e| AppError::Database(format!("Failed to get connection: {}", e)))?;

        let store = Self { _db: db, conn };
        store.initialize_schema().await?;

        Ok(store)
    }

    async fn initialize_schema(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS customers (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    first_name TEXT NOT NULL DEFAULT '',
                    last_name TEXT NOT NULL DEFAULT '',
                    email TEXT NOT NULL UNIQUE,
                    password_hash TEXT NOT NULL,
                    phone TEXT,
                    role TEXT NOT NULL DEFAULT 'customer',
                    address TEXT NOT NULL DEFAULT '',
                    city TEXT NOT NULL DEFAULT '',
                    postal_code TEXT NOT NULL DEFAULT '',
                    country TEXT NOT NULL DEFAULT '',
                    customer_type TEXT NOT NULL DEFAULT 'individual',
                    is_active INTEGER NOT NULL DEFAULT 1,
                    created_at INTEGER NOT NULL,
                    updated_at INTEGER NOT NULL
                )",
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to create customers table: {}", e)))?;

        Ok(())
    }

    async fn query_one(
        &self,
        sql: &str,
        params: impl libsql::params::IntoParams,
    ) -> Result<Option<Customer>> {
        let mut rows = self.conn.query(sql, params).await.map_err(write_error)?;

        match rows.next().await.map_err(write_error)? {
            Some(row) => Ok(Some(customer_from_row(&row)?)),
            None => Ok(None),
        }
    }
}

/// Maps driver errors, singling out the email uniqueness constraint.
fn write_error(e: libsql::Error) -> AppError {
    let message = e.to_string();
    if message.contains("UNIQUE constraint failed") {
        AppError::DuplicateAccount
    } else {
        AppError::Database(message)
    }
}

fn db_err(e: libsql::Error) -> AppError {
    AppError::Database(e.to_string())
}

fn timestamp(millis: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| AppError::Database(format!("Invalid timestamp: {}", millis)))
}

fn customer_from_row(row: &Row) -> Result<Customer> {
    let phone = match row.get_value(5).map_err(db_err)? {
        Value::Text(phone) => Some(phone),
        _ => None,
    };
    let role: String = row.get(6).map_err(db_err)?;
    let customer_type: String = row.get(11).map_err(db_err)?;

    Ok(Customer {
        id: row.get(0).map_err(db_err)?,
        first_name: row.get(1).map_err(db_err)?,
        last_name: row.get(2).map_err(db_err)?,
        email: row.get(3).map_err(db_err)?,
        password_hash: row.get(4).map_err(db_err)?,
        phone,
        role: role.parse()?,
        address: row.get(7).map_err(db_err)?,
        city: row.get(8).map_err(db_err)?,
        postal_code: row.get(9).map_err(db_err)?,
        country: row.get(10).map_err(db_err)?,
        customer_type: customer_type.parse()?,
        is_active: row.get::<i64>(12).map_err(db_err)? != 0,
        created_at: timestamp(row.get(13).map_err(db_err)?)?,
        updated_at: timestamp(row.get(14).map_err(db_err)?)?,
    })
}

#[async_trait]
impl CustomerStore for TursoStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Customer>> {
        self.query_one(
            &format!("SELECT {} FROM customers WHERE email = ?", CUSTOMER_COLUMNS),
            [email],
        )
        .await
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Customer>> {
        self.query_one(
            &format!("SELECT {} FROM customers WHERE id = ?", CUSTOMER_COLUMNS),
            [id],
        )
        .await
    }

    async fn find_active_by_id(&self, id: i64) -> Result<Option<Customer>> {
        self.query_one(
            &format!(
                "SELECT {} FROM customers WHERE id = ? AND is_active = 1",
                CUSTOMER_COLUMNS
            ),
            [id],
        )
        .await
    }

    async fn find_all(&self) -> Result<Vec<Customer>> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT {} FROM customers ORDER BY id ASC", CUSTOMER_COLUMNS),
                (),
            )
            .await
            .map_err(|e| AppError::Database(format!("Failed to query customers: {}", e)))?;

        let mut customers = Vec::new();
        while let Some(row) = rows.next().await.map_err(db_err)? {
            customers.push(customer_from_row(&row)?);
        }

        Ok(customers)
    }

    async fn count(&self) -> Result<u64> {
        let mut rows = self
            .conn
            .query("SELECT COUNT(*) FROM customers", ())
            .await
            .map_err(|e| AppError::Database(format!("Failed to count customers: {}", e)))?;

        match rows.next().await.map_err(db_err)? {
            Some(row) => Ok(row.get::<i64>(0).map_err(db_err)? as u64),
            None => Ok(0),
        }
    }

    async fn create(&self, customer: NewCustomer) -> Result<Customer> {
        let now = Utc::now().timestamp_millis();

        self.query_one(
            &format!(
                "INSERT INTO customers (first_name, last_name, email, password_hash, phone, role,
                    address, city, postal_code, country, customer_type, is_active, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)
                 RETURNING {}",
                CUSTOMER_COLUMNS
            ),
            libsql::params![
                customer.first_name,
                customer.last_name,
                customer.email,
                customer.password_hash,
                customer.phone,
                customer.role.as_str(),
                customer.address,
                customer.city,
                customer.postal_code,
                customer.country,
                customer.customer_type.as_str(),
                now,
                now,
            ],
        )
        .await?
        .ok_or_else(|| AppError::Database("Insert returned no row".to_string()))
    }

    async fn update(&self, id: i64, changes: CustomerChanges) -> Result<Customer> {
        let CustomerChanges {
            first_name,
            last_name,
            email,
            password_hash,
            phone,
            role,
            address,
            city,
            postal_code,
            country,
            customer_type,
            is_active,
        } = changes;

        // Only present columns are written, in one statement
        let mut assignments: Vec<(&str, Value)> = Vec::new();
        let text_columns = [
            ("first_name", first_name),
            ("last_name", last_name),
            ("email", email),
            ("password_hash", password_hash),
            ("address", address),
            ("city", city),
            ("postal_code", postal_code),
            ("country", country),
        ];
        for (column, value) in text_columns {
            if let Some(value) = value {
                assignments.push((column, Value::Text(value)));
            }
        }
        if let Some(phone) = phone {
            assignments.push(("phone", phone.map_or(Value::Null, Value::Text)));
        }
        if let Some(role) = role {
            assignments.push(("role", Value::Text(role.as_str().to_string())));
        }
        if let Some(customer_type) = customer_type {
            assignments.push((
                "customer_type",
                Value::Text(customer_type.as_str().to_string()),
            ));
        }
        if let Some(is_active) = is_active {
            assignments.push(("is_active", Value::Integer(is_active as i64)));
        }
        assignments.push(("updated_at", Value::Integer(Utc::now().timestamp_millis())));

        let set_clause = assignments
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect::<Vec<_>>()
            .join(", ");
        let mut params: Vec<Value> = assignments.into_iter().map(|(_, value)| value).collect();
        params.push(Value::Integer(id));

        self.query_one(
            &format!(
                "UPDATE customers SET {} WHERE id = ? RETURNING {}",
                set_clause, CUSTOMER_COLUMNS
            ),
            params,
        )
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Customer {} not found", id)))
    }

    async fn remove(&self, id: i64) -> Result<()> {
        let affected = self
            .conn
            .execute("DELETE FROM customers WHERE id = ?", [id])
            .await
            .map_err(|e| AppError::Database(format!("Failed to delete customer: {}", e)))?;

        if affected == 0 {
            return Err(AppError::NotFound(format!("Customer {} not found", id)));
        }

        Ok(())
    }
}
