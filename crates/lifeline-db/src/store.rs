//! Backend-agnostic record store.
//!
//! Uses enum dispatch instead of trait objects because async methods
//! are not dyn-compatible in Rust.

use lifeline_types::{CallFilter, EmergencyCall, NewEmergencyCall};

use crate::call_store::PgCallStore;
use crate::error::DbError;
use crate::memory::MemoryCallStore;

/// Durable (or in-process) storage of emergency call records.
#[derive(Debug, Clone)]
pub enum CallStore {
    /// Rows in the `emergency_calls` table.
    Postgres(PgCallStore),
    /// Records held in process memory.
    Memory(MemoryCallStore),
}

impl CallStore {
    /// Store backed by a fresh, empty [`MemoryCallStore`].
    pub fn memory() -> Self {
        Self::Memory(MemoryCallStore::new())
    }

    /// Log one call. The store assigns its `id` and `timestamp`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] for a blank or oversized phone
    /// number, or a backend error if the write fails.
    pub async fn create(&self, call: &NewEmergencyCall) -> Result<EmergencyCall, DbError> {
        let record = match self {
            Self::Postgres(store) => store.create(call).await?,
            Self::Memory(store) => store.create(call).await?,
        };

        tracing::info!(
            call_id = %record.id,
            call_success = record.call_success,
            authenticated = record.user.is_some(),
            backend = self.name(),
            "Emergency call logged"
        );

        Ok(record)
    }

    /// Every stored call ordered by `timestamp` descending.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the read fails.
    pub async fn list_all(&self) -> Result<Vec<EmergencyCall>, DbError> {
        let calls = match self {
            Self::Postgres(store) => store.list_all().await?,
            Self::Memory(store) => store.list_all().await,
        };
        tracing::debug!(count = calls.len(), backend = self.name(), "Listed call history");
        Ok(calls)
    }

    /// Calls matching `filter`, in the same order as [`Self::list_all`].
    ///
    /// # Errors
    ///
    /// Returns a backend error if the read fails.
    pub async fn list_filtered(&self, filter: &CallFilter) -> Result<Vec<EmergencyCall>, DbError> {
        let calls = match self {
            Self::Postgres(store) => store.list_filtered(filter).await?,
            Self::Memory(store) => store.list_filtered(filter).await,
        };
        tracing::debug!(
            count = calls.len(),
            call_success = ?filter.call_success,
            since = ?filter.since,
            until = ?filter.until,
            backend = self.name(),
            "Listed filtered call history"
        );
        Ok(calls)
    }

    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns a backend error if the store cannot be reached.
    pub async fn ping(&self) -> Result<(), DbError> {
        match self {
            Self::Postgres(store) => store.ping().await,
            Self::Memory(_) => Ok(()),
        }
    }

    /// Human-readable backend name for logging.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Postgres(_) => "postgres",
            Self::Memory(_) => "memory",
        }
    }
}

impl From<PgCallStore> for CallStore {
    fn from(store: PgCallStore) -> Self {
        Self::Postgres(store)
    }
}

impl From<MemoryCallStore> for CallStore {
    fn from(store: MemoryCallStore) -> Self {
        Self::Memory(store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_backend_round_trip() {
        let store = CallStore::memory();
        assert_eq!(store.name(), "memory");
        assert!(store.ping().await.is_ok());

        let created = store
            .create(&NewEmergencyCall::new("911").with_coordinates(Some(37.0), Some(-122.0)))
            .await
            .ok();
        let listed = store.list_all().await.unwrap_or_default();

        assert_eq!(listed.len(), 1);
        assert_eq!(listed.first(), created.as_ref());
    }

    #[tokio::test]
    async fn filtered_listing_dispatches_to_backend() {
        let store = CallStore::memory();
        let _ = store.create(&NewEmergencyCall::new("911").with_success(true)).await;
        let _ = store.create(&NewEmergencyCall::new("112")).await;

        let failed = CallFilter {
            call_success: Some(false),
            ..CallFilter::default()
        };
        let listed = store.list_filtered(&failed).await.unwrap_or_default();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed.first().map(|c| c.phone_number.as_str()), Some("112"));
    }

    #[tokio::test]
    async fn validation_failure_propagates() {
        let store = CallStore::memory();
        let result = store.create(&NewEmergencyCall::new("")).await;
        assert!(matches!(result, Err(DbError::Validation(_))));
        assert!(store.list_all().await.unwrap_or_default().is_empty());
    }
}
