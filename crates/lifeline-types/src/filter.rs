//! Filters for the operator view of the call history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::structs::EmergencyCall;

/// Narrows the call history. Unset fields match everything.
///
/// The time window is half-open: `since <= timestamp < until`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CallFilter {
    /// Only calls with this outcome.
    pub call_success: Option<bool>,
    /// Only calls logged at or after this instant.
    pub since: Option<DateTime<Utc>>,
    /// Only calls logged before this instant.
    pub until: Option<DateTime<Utc>>,
}

impl CallFilter {
    /// Whether `call` passes every set condition.
    pub fn matches(&self, call: &EmergencyCall) -> bool {
        self.call_success.is_none_or(|wanted| call.call_success == wanted)
            && self.since.is_none_or(|since| call.timestamp >= since)
            && self.until.is_none_or(|until| call.timestamp < until)
    }
}
