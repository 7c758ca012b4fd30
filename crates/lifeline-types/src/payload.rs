//! Inbound payload for logging a call, and its validation rules.
//!
//! [`CallPayload`] is what clients send. Bodies are read field by field
//! from raw JSON with [`CallPayload::from_json`], so a bad value surfaces
//! as an error keyed by that field instead of a whole-body failure, and
//! the loose encodings form-based clients produce (`911` for a phone
//! number, `"true"` for a flag, `"37.5"` for a coordinate) are accepted.
//! [`CallPayload::into_new_call`] produces the [`NewEmergencyCall`] the
//! store accepts.

use std::borrow::Cow;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::ids::UserId;
use crate::structs::{NewEmergencyCall, not_blank};

/// Message reported when `phone_number` is absent.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Message reported when a non-nullable field is sent as `null`.
pub const NULL_MESSAGE: &str = "This field may not be null.";

/// Message reported when `phone_number` is not a string or number.
pub const INVALID_STRING_MESSAGE: &str = "Not a valid string.";

/// Message reported when `call_success` is not a recognizable boolean.
pub const INVALID_BOOLEAN_MESSAGE: &str = "Must be a valid boolean.";

/// Message reported when a coordinate is not a finite number.
pub const INVALID_NUMBER_MESSAGE: &str = "A valid number is required.";

/// Key for errors about the body as a whole rather than one field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Field name -> list of human-readable messages.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

const TRUE_STRINGS: [&str; 14] = [
    "t", "T", "y", "Y", "yes", "Yes", "YES", "true", "True", "TRUE", "on", "On", "ON", "1",
];

const FALSE_STRINGS: [&str; 14] = [
    "f", "F", "n", "N", "no", "No", "NO", "false", "False", "FALSE", "off", "Off", "OFF", "0",
];

/// Client-supplied fields for a new call.
///
/// The caller's identity is deliberately absent: it comes from the
/// request's authentication context, never from the body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct CallPayload {
    /// Number that was dialed. Required.
    #[validate(
        required(message = "This field is required."),
        custom(function = "not_blank"),
        length(max = 20, message = "Ensure this field has no more than 20 characters.")
    )]
    pub phone_number: Option<String>,
    /// Whether the call went through. Defaults to `false`.
    pub call_success: Option<bool>,
    /// Caller latitude.
    pub latitude: Option<f64>,
    /// Caller longitude.
    pub longitude: Option<f64>,
}

impl CallPayload {
    /// Read and validate a payload from a decoded JSON body.
    ///
    /// Every field is checked, so one response reports all problems. A
    /// body that is not a JSON object fails under [`NON_FIELD_ERRORS`].
    /// Keys other than the four payload fields are ignored.
    pub fn from_json(body: &Value) -> Result<Self, FieldErrors> {
        let Value::Object(fields) = body else {
            return Err(FieldErrors::from([(
                NON_FIELD_ERRORS.to_owned(),
                vec![format!(
                    "Invalid data. Expected a dictionary, but got {}.",
                    json_type_name(body)
                )],
            )]));
        };

        let mut errors = FieldErrors::new();
        let payload = Self {
            phone_number: read_field(fields, "phone_number", &mut errors, coerce_string),
            call_success: read_field(fields, "call_success", &mut errors, coerce_bool),
            latitude: read_field(fields, "latitude", &mut errors, coerce_number),
            longitude: read_field(fields, "longitude", &mut errors, coerce_number),
        }
        .normalized();

        // A field that failed to decode keeps its decode error.
        if let Err(invalid) = payload.validate() {
            for (field, messages) in field_errors(&invalid) {
                errors.entry(field).or_insert(messages);
            }
        }

        if errors.is_empty() {
            Ok(payload)
        } else {
            Err(errors)
        }
    }

    /// Trim surrounding whitespace from the phone number.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        self.phone_number = self.phone_number.map(|number| number.trim().to_owned());
        self
    }

    /// Validate the payload and turn it into a store insertion.
    ///
    /// `user` is the identity resolved from the request, if any.
    pub fn into_new_call(self, user: Option<UserId>) -> Result<NewEmergencyCall, ValidationErrors> {
        let payload = self.normalized();
        payload.validate()?;

        let Some(phone_number) = payload.phone_number else {
            return Err(required_error("phone_number"));
        };

        Ok(NewEmergencyCall::new(phone_number)
            .with_user(user)
            .with_success(payload.call_success.unwrap_or(false))
            .with_coordinates(payload.latitude, payload.longitude))
    }
}

/// Flatten [`ValidationErrors`] into a field -> messages map.
///
/// Errors without a custom message fall back to their code.
pub fn field_errors(errors: &ValidationErrors) -> FieldErrors {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map_or_else(|| e.code.to_string(), ToString::to_string)
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Decode one field, recording its error under `name` on failure.
fn read_field<T>(
    fields: &Map<String, Value>,
    name: &str,
    errors: &mut FieldErrors,
    coerce: fn(&Value) -> Result<Option<T>, &'static str>,
) -> Option<T> {
    let value = fields.get(name)?;
    match coerce(value) {
        Ok(decoded) => decoded,
        Err(message) => {
            errors.insert(name.to_owned(), vec![message.to_owned()]);
            None
        }
    }
}

fn coerce_string(value: &Value) -> Result<Option<String>, &'static str> {
    match value {
        Value::String(s) => Ok(Some(s.clone())),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Null => Err(NULL_MESSAGE),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => Err(INVALID_STRING_MESSAGE),
    }
}

fn coerce_bool(value: &Value) -> Result<Option<bool>, &'static str> {
    match value {
        Value::Bool(b) => Ok(Some(*b)),
        Value::Number(n) => match n.as_u64() {
            Some(1) => Ok(Some(true)),
            Some(0) => Ok(Some(false)),
            _ => Err(INVALID_BOOLEAN_MESSAGE),
        },
        Value::String(s) if TRUE_STRINGS.contains(&s.as_str()) => Ok(Some(true)),
        Value::String(s) if FALSE_STRINGS.contains(&s.as_str()) => Ok(Some(false)),
        Value::Null => Err(NULL_MESSAGE),
        Value::String(_) | Value::Array(_) | Value::Object(_) => Err(INVALID_BOOLEAN_MESSAGE),
    }
}

fn coerce_number(value: &Value) -> Result<Option<f64>, &'static str> {
    let number = match value {
        Value::Null => return Ok(None),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        Value::Bool(_) | Value::Array(_) | Value::Object(_) => None,
    };
    match number {
        Some(n) if n.is_finite() => Ok(Some(n)),
        _ => Err(INVALID_NUMBER_MESSAGE),
    }
}

const fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "str",
        Value::Array(_) => "list",
        Value::Object(_) => "dict",
    }
}

fn required_error(field: &'static str) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    errors.add(
        field,
        ValidationError::new("required").with_message(Cow::Borrowed(REQUIRED_MESSAGE)),
    );
    errors
}
