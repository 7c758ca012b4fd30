//! In-process call store.
//!
//! Keeps records in insertion order behind a [`RwLock`]. Timestamps are
//! clamped so they never go backwards, which makes insertion order and
//! timestamp order agree even if the wall clock steps back.

use std::sync::Arc;

use chrono::Utc;
use lifeline_types::{CallFilter, CallId, EmergencyCall, NewEmergencyCall, Validate};
use tokio::sync::RwLock;

use crate::error::DbError;

/// Call store held entirely in memory. Clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryCallStore {
    calls: Arc<RwLock<Vec<EmergencyCall>>>,
}

impl MemoryCallStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one call record.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] if the phone number is blank or too
    /// long.
    pub async fn create(&self, call: &NewEmergencyCall) -> Result<EmergencyCall, DbError> {
        call.validate()?;

        let mut calls = self.calls.write().await;
        let now = Utc::now();
        let timestamp = calls.last().map_or(now, |last| last.timestamp.max(now));
        let record = call.clone().into_record(CallId::new(), timestamp);
        calls.push(record.clone());
        Ok(record)
    }

    /// Every stored call, newest first.
    pub async fn list_all(&self) -> Vec<EmergencyCall> {
        self.calls.read().await.iter().rev().cloned().collect()
    }

    /// Calls matching `filter`, newest first.
    pub async fn list_filtered(&self, filter: &CallFilter) -> Vec<EmergencyCall> {
        self.calls
            .read()
            .await
            .iter()
            .rev()
            .filter(|call| filter.matches(call))
            .cloned()
            .collect()
    }

    /// Number of stored calls.
    pub async fn len(&self) -> usize {
        self.calls.read().await.len()
    }

    /// Whether the store holds no calls.
    pub async fn is_empty(&self) -> bool {
        self.calls.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use lifeline_types::UserId;

    use super::*;

    #[tokio::test]
    async fn create_assigns_id_and_timestamp() {
        let store = MemoryCallStore::new();
        let before = Utc::now();
        let call = store
            .create(&NewEmergencyCall::new("911").with_success(true))
            .await;
        let call = call.ok();

        assert!(call.as_ref().is_some_and(|c| c.timestamp >= before));
        assert_eq!(call.as_ref().map(|c| c.phone_number.as_str()), Some("911"));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn invalid_call_is_not_stored() {
        let store = MemoryCallStore::new();
        let result = store.create(&NewEmergencyCall::new("1".repeat(21))).await;
        assert!(matches!(result, Err(DbError::Validation(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn list_is_newest_first_with_unique_ids() {
        let store = MemoryCallStore::new();
        let mut created = Vec::new();
        for n in 0..10 {
            let call = NewEmergencyCall::new(format!("555-{n:04}"));
            if let Ok(record) = store.create(&call).await {
                created.push(record);
            }
        }
        assert_eq!(created.len(), 10);

        for pair in created.windows(2) {
            if let [older, newer] = pair {
                assert!(older.timestamp <= newer.timestamp);
                assert_ne!(older.id, newer.id);
            }
        }

        let listed = store.list_all().await;
        for pair in listed.windows(2) {
            if let [newer, older] = pair {
                assert!(newer.timestamp >= older.timestamp);
            }
        }
        assert_eq!(listed.first().map(|c| c.id), created.last().map(|c| c.id));
    }

    #[tokio::test]
    async fn user_reference_is_kept() {
        let store = MemoryCallStore::new();
        let user = UserId::new();
        let record = store
            .create(&NewEmergencyCall::new("112").with_user(Some(user)))
            .await
            .ok();
        assert_eq!(record.and_then(|r| r.user), Some(user));
    }

    #[tokio::test]
    async fn filtered_list_keeps_order_and_drops_non_matches() {
        let store = MemoryCallStore::new();
        for (number, success) in [("100", true), ("200", false), ("300", true)] {
            let _ = store
                .create(&NewEmergencyCall::new(number).with_success(success))
                .await;
        }

        let successful = CallFilter {
            call_success: Some(true),
            ..CallFilter::default()
        };
        let numbers: Vec<String> = store
            .list_filtered(&successful)
            .await
            .into_iter()
            .map(|c| c.phone_number)
            .collect();
        assert_eq!(numbers, vec!["300", "100"]);

        let future = CallFilter {
            since: Some(Utc::now() + chrono::TimeDelta::hours(1)),
            ..CallFilter::default()
        };
        assert!(store.list_filtered(&future).await.is_empty());
    }

    #[tokio::test]
    async fn clones_share_records() {
        let store = MemoryCallStore::new();
        let other = store.clone();
        let _ = store.create(&NewEmergencyCall::new("000")).await;
        assert_eq!(other.list_all().await.len(), 1);
    }
}
