//! Record store for the Lifeline emergency call log.
//!
//! Calls are appended to a single `emergency_calls` table in `PostgreSQL`
//! and read back newest first. An in-memory backend with the same
//! contract exists for tests and database-less runs.
//!
//! ```text
//! CallStore (enum dispatch)
//!     |
//!     +-- Postgres --> PgCallStore --> emergency_calls
//!     |
//!     +-- Memory ----> MemoryCallStore
//! ```
//!
//! # Modules
//!
//! - [`store`] -- [`CallStore`], the backend-agnostic entry point
//! - [`call_store`] -- `PostgreSQL` queries and row mapping
//! - [`memory`] -- In-process backend
//! - [`postgres`] -- Connection pool, configuration, migrations
//! - [`error`] -- Shared error types

pub mod call_store;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

// Re-export primary types for convenience.
pub use call_store::{CallRow, PgCallStore};
pub use error::DbError;
pub use memory::MemoryCallStore;
pub use postgres::{PostgresConfig, PostgresPool};
pub use store::CallStore;
