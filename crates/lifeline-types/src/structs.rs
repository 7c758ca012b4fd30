//! Call record structs.
//!
//! [`EmergencyCall`] is the stored record returned by the call history.
//! [`NewEmergencyCall`] is what the store accepts for insertion; the
//! store assigns the `id` and `timestamp` itself.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::{Validate, ValidationError};

use crate::ids::{CallId, UserId};

/// Maximum length of a phone number, in characters.
pub const PHONE_NUMBER_MAX_LEN: usize = 20;

/// Message reported for an empty or whitespace-only phone number.
pub const BLANK_MESSAGE: &str = "This field may not be blank.";

/// Message reported for a phone number over [`PHONE_NUMBER_MAX_LEN`].
pub const MAX_LENGTH_MESSAGE: &str = "Ensure this field has no more than 20 characters.";

/// Reject empty and whitespace-only strings.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message(Cow::Borrowed(BLANK_MESSAGE)));
    }
    Ok(())
}

/// A logged emergency call attempt.
///
/// Records are append-only: the system never updates or deletes them.
/// The optional `user` is a weak reference to the caller's account and is
/// never serialized back to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EmergencyCall {
    /// Server-assigned identifier.
    pub id: CallId,
    /// Account that placed the call, if the caller was authenticated.
    #[serde(skip)]
    #[ts(skip)]
    pub user: Option<UserId>,
    /// Number that was dialed.
    pub phone_number: String,
    /// Whether the call went through.
    pub call_success: bool,
    /// When the record was created. Assigned once by the store.
    pub timestamp: DateTime<Utc>,
    /// Caller latitude, if known.
    pub latitude: Option<f64>,
    /// Caller longitude, if known.
    pub longitude: Option<f64>,
}

impl core::fmt::Display for EmergencyCall {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Emergency call to {} at {}",
            self.phone_number,
            self.timestamp.to_rfc3339()
        )
    }
}

/// Fields accepted by the store when logging a call.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct NewEmergencyCall {
    /// Account that placed the call, if any.
    pub user: Option<UserId>,
    /// Number that was dialed.
    #[validate(
        custom(function = "not_blank"),
        length(max = 20, message = "Ensure this field has no more than 20 characters.")
    )]
    pub phone_number: String,
    /// Whether the call went through.
    pub call_success: bool,
    /// Caller latitude, if known.
    pub latitude: Option<f64>,
    /// Caller longitude, if known.
    pub longitude: Option<f64>,
}

impl NewEmergencyCall {
    /// Anonymous, unsuccessful call to `phone_number` with no coordinates.
    pub fn new(phone_number: impl Into<String>) -> Self {
        Self {
            user: None,
            phone_number: phone_number.into(),
            call_success: false,
            latitude: None,
            longitude: None,
        }
    }

    /// Attach the caller's account.
    #[must_use]
    pub const fn with_user(mut self, user: Option<UserId>) -> Self {
        self.user = user;
        self
    }

    /// Set the success flag.
    #[must_use]
    pub const fn with_success(mut self, call_success: bool) -> Self {
        self.call_success = call_success;
        self
    }

    /// Set the caller coordinates. Either may be absent.
    #[must_use]
    pub const fn with_coordinates(mut self, latitude: Option<f64>, longitude: Option<f64>) -> Self {
        self.latitude = latitude;
        self.longitude = longitude;
        self
    }

    /// Materialize the stored record once the store has picked an ID and
    /// creation time.
    pub fn into_record(self, id: CallId, timestamp: DateTime<Utc>) -> EmergencyCall {
        EmergencyCall {
            id,
            user: self.user,
            phone_number: self.phone_number,
            call_success: self.call_success,
            timestamp,
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_number_length_bounds() {
        assert!(NewEmergencyCall::new("911").validate().is_ok());
        let longest = "1".repeat(PHONE_NUMBER_MAX_LEN);
        assert!(NewEmergencyCall::new(longest.clone()).validate().is_ok());
        assert!(NewEmergencyCall::new(format!("{longest}1")).validate().is_err());
        assert!(NewEmergencyCall::new("").validate().is_err());
        assert!(NewEmergencyCall::new("  ").validate().is_err());
    }

    #[test]
    fn blank_and_oversized_numbers_have_distinct_messages() {
        let message = |number: String| {
            NewEmergencyCall::new(number)
                .validate()
                .err()
                .and_then(|errors| {
                    errors
                        .field_errors()
                        .get("phone_number")
                        .and_then(|errs| errs.first())
                        .and_then(|e| e.message.clone())
                })
                .map(|m| m.to_string())
        };

        assert_eq!(message(String::new()), Some(BLANK_MESSAGE.to_owned()));
        assert_eq!(message("9".repeat(21)), Some(MAX_LENGTH_MESSAGE.to_owned()));
    }

    #[test]
    fn phone_number_length_counts_characters_not_bytes() {
        // 20 two-byte characters.
        let number = "\u{0661}".repeat(20);
        assert!(NewEmergencyCall::new(number).validate().is_ok());
    }

    #[test]
    fn record_json_shape_hides_user() {
        let record = NewEmergencyCall::new("911")
            .with_user(Some(UserId::new()))
            .with_success(true)
            .into_record(CallId::new(), Utc::now());

        let json = serde_json::to_value(&record).ok();
        let mut keys: Vec<String> = json
            .as_ref()
            .and_then(serde_json::Value::as_object)
            .map(|obj| obj.keys().cloned().collect())
            .unwrap_or_default();
        keys.sort();

        assert_eq!(
            keys,
            vec![
                "call_success",
                "id",
                "latitude",
                "longitude",
                "phone_number",
                "timestamp"
            ]
        );
    }

    #[test]
    fn missing_coordinates_serialize_as_null() {
        let record = NewEmergencyCall::new("112").into_record(CallId::new(), Utc::now());
        let json = serde_json::to_value(&record).unwrap_or_default();
        assert_eq!(json.get("latitude"), Some(&serde_json::Value::Null));
        assert_eq!(json.get("longitude"), Some(&serde_json::Value::Null));
    }

    #[test]
    fn display_names_number_and_time() {
        let record = NewEmergencyCall::new("999").into_record(CallId::new(), Utc::now());
        let shown = record.to_string();
        assert!(shown.starts_with("Emergency call to 999 at "));
    }
}
