//! `PostgreSQL` persistence for emergency call records.
//!
//! Rows are mapped to and from [`EmergencyCall`] explicitly through
//! [`CallRow`]; the domain type never derives database traits itself.

use chrono::{DateTime, Utc};
use lifeline_types::{CallFilter, CallId, EmergencyCall, NewEmergencyCall, UserId, Validate};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::DbError;

/// Operations on the `emergency_calls` table.
#[derive(Debug, Clone)]
pub struct PgCallStore {
    pool: PgPool,
}

impl PgCallStore {
    /// Create a call store on top of a connection pool.
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert one call record.
    ///
    /// The ID is generated here; the creation timestamp comes from the
    /// column default so every row is stamped by the database clock.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Validation`] if the phone number is blank or too
    /// long, or [`DbError::Postgres`] if the insert fails.
    pub async fn create(&self, call: &NewEmergencyCall) -> Result<EmergencyCall, DbError> {
        call.validate()?;

        let id = CallId::new();
        let row = sqlx::query_as::<_, CallRow>(
            r#"INSERT INTO emergency_calls (id, user_id, phone_number, call_success, latitude, longitude)
              VALUES ($1, $2, $3, $4, $5, $6)
              RETURNING id, user_id, phone_number, call_success, "timestamp", latitude, longitude"#,
        )
        .bind(id.into_inner())
        .bind(call.user.map(UserId::into_inner))
        .bind(&call.phone_number)
        .bind(call.call_success)
        .bind(call.latitude)
        .bind(call.longitude)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    /// Every stored call, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_all(&self) -> Result<Vec<EmergencyCall>, DbError> {
        let rows = sqlx::query_as::<_, CallRow>(
            r#"SELECT id, user_id, phone_number, call_success, "timestamp", latitude, longitude
              FROM emergency_calls
              ORDER BY "timestamp" DESC, id DESC"#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(EmergencyCall::from).collect())
    }

    /// Calls matching `filter`, newest first.
    ///
    /// Unset filter fields bind as `NULL` and drop out of the predicate.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_filtered(&self, filter: &CallFilter) -> Result<Vec<EmergencyCall>, DbError> {
        let rows = sqlx::query_as::<_, CallRow>(
            r#"SELECT id, user_id, phone_number, call_success, "timestamp", latitude, longitude
              FROM emergency_calls
              WHERE ($1::BOOLEAN IS NULL OR call_success = $1)
                AND ($2::TIMESTAMPTZ IS NULL OR "timestamp" >= $2)
                AND ($3::TIMESTAMPTZ IS NULL OR "timestamp" < $3)
              ORDER BY "timestamp" DESC, id DESC"#,
        )
        .bind(filter.call_success)
        .bind(filter.since)
        .bind(filter.until)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(EmergencyCall::from).collect())
    }

    /// Round-trip a trivial query to confirm the database is reachable.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn ping(&self) -> Result<(), DbError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// A row from the `emergency_calls` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CallRow {
    /// Call UUID.
    pub id: Uuid,
    /// Account UUID, if the caller was authenticated.
    pub user_id: Option<Uuid>,
    /// Dialed number.
    pub phone_number: String,
    /// Whether the call went through.
    pub call_success: bool,
    /// Creation time assigned by the database.
    pub timestamp: DateTime<Utc>,
    /// Caller latitude.
    pub latitude: Option<f64>,
    /// Caller longitude.
    pub longitude: Option<f64>,
}

impl From<CallRow> for EmergencyCall {
    fn from(row: CallRow) -> Self {
        Self {
            id: CallId::from(row.id),
            user: row.user_id.map(UserId::from),
            phone_number: row.phone_number,
            call_success: row.call_success,
            timestamp: row.timestamp,
            latitude: row.latitude,
            longitude: row.longitude,
        }
    }
}
