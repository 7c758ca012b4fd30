//! Error types for the record store.
//!
//! All errors are propagated via [`DbError`] which wraps the underlying
//! [`sqlx`] and [`validator`] errors.

/// Errors that can occur in the record store.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// The record violates a field constraint and was not stored.
    #[error("validation failed: {0}")]
    Validation(#[from] validator::ValidationErrors),

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}
