//! Customer persistence.
//!
//! - **Turso/SQLite** ([`TursoStore`]): relational store used by the server,
//!   either file-backed or in-memory
//! - **In-process** ([`InMemoryStore`]): plain map behind a lock, handy for tests
//!
//! Both implement [`CustomerStore`]; [`DatabaseProvider`] picks one from the
//! `[database]` configuration section.

pub mod memory;
pub mod traits;
pub mod turso;

pub use memory::InMemoryStore;
pub use traits::{CustomerStore, DatabaseProvider};
pub use turso::TursoStore;

#[cfg(test)]
pub use traits::MockCustomerStore;
