//! Shared validation helpers for inbound HTTP adapters.
//!
//! Request DTOs keep every field optional so a missing value is reported as
//! `missing required field: <name>` rather than a serde parse failure.

use serde_json::json;

use crate::domain::{CredentialsValidationError, Error};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidValue,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidValue => "invalid_value",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

pub(crate) const NICKNAME: FieldName = FieldName::new("nickname");
pub(crate) const USER_NAME: FieldName = FieldName::new("user_name");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const PASSWORD_CONFIRM: FieldName = FieldName::new("password_confirm");

fn field_error(field: &str, message: String, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field,
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    field_error(
        field,
        format!("missing required field: {field}"),
        ErrorCode::MissingField,
    )
}

/// Unwrap a required request field.
pub(crate) fn require(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// Map credential validation failures to a field-scoped `invalid_request`.
pub(crate) fn credentials_error(error: CredentialsValidationError) -> Error {
    field_error(error.field(), error.to_string(), ErrorCode::InvalidValue)
}
