//! Shared type definitions for the Lifeline emergency call log.
//!
//! This crate is the single source of truth for the record shape used by
//! the store and the HTTP layer. Types flow downstream to `TypeScript`
//! via `ts-rs` for client applications.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe UUID wrappers for call and account identifiers
//! - [`structs`] -- The stored call record and the store insertion type
//! - [`payload`] -- Client payload, validation rules, field-level errors
//! - [`filter`] -- Operator history filters

pub mod filter;
pub mod ids;
pub mod payload;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use ids::{CallId, UserId};
pub use filter::CallFilter;
pub use payload::{
    CallPayload, FieldErrors, INVALID_BOOLEAN_MESSAGE, INVALID_NUMBER_MESSAGE,
    INVALID_STRING_MESSAGE, NON_FIELD_ERRORS, NULL_MESSAGE, REQUIRED_MESSAGE, field_errors,
};
pub use structs::{
    BLANK_MESSAGE, EmergencyCall, MAX_LENGTH_MESSAGE, NewEmergencyCall, PHONE_NUMBER_MAX_LEN,
};
pub use validator::{Validate, ValidationErrors};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // ts-rs generates TypeScript bindings when types with
        // #[ts(export)] are used. The files are written to the
        // `bindings/` directory relative to the crate root.
        use ts_rs::TS;

        let _ = crate::ids::CallId::export_all();
        let _ = crate::ids::UserId::export_all();
        let _ = crate::structs::EmergencyCall::export_all();
        let _ = crate::payload::CallPayload::export_all();
        let _ = crate::filter::CallFilter::export_all();
    }
}
