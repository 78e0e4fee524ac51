//! Uniform JSON response envelope.
//!
//! Every endpoint answers with HTTP 200 and a body of the form
//! `{code, message, data?, details?, trace_id?}`. `code == 0` means success;
//! failures carry a numeric category derived from [`ErrorCode`].

use actix_web::body::BoxBody;
use actix_web::{HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Error, ErrorCode};

/// Envelope code for successful responses.
pub const SUCCESS_CODE: i32 = 0;
/// Envelope code shared by validation failures and conflicts.
pub const PARAMETER_ERROR_CODE: i32 = 40001;
/// Message returned in place of internal error details.
pub const REDACTED_MESSAGE: &str = "Internal server error";

/// Numeric envelope code for a domain error category.
///
/// # Examples
/// ```
/// use accounts::domain::ErrorCode;
/// use accounts::inbound::http::envelope::envelope_code;
///
/// assert_eq!(envelope_code(ErrorCode::Conflict), 40001);
/// assert_eq!(envelope_code(ErrorCode::Unauthorized), 401);
/// ```
pub fn envelope_code(code: ErrorCode) -> i32 {
    match code {
        ErrorCode::InvalidRequest | ErrorCode::Conflict => PARAMETER_ERROR_CODE,
        ErrorCode::Unauthorized => 401,
        ErrorCode::Forbidden => 403,
        ErrorCode::ServiceUnavailable => 50001,
        ErrorCode::InternalError => 50000,
    }
}

/// Response body shared by every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl<T> Envelope<T> {
    /// Successful envelope carrying `data`.
    pub fn success(data: T) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: "ok".to_owned(),
            data: Some(data),
            details: None,
            trace_id: None,
        }
    }

    /// Successful envelope with a message and no data.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            code: SUCCESS_CODE,
            message: message.into(),
            data: None,
            details: None,
            trace_id: None,
        }
    }

    /// Failure envelope for `error`; internal errors lose message and details.
    pub fn from_error(error: &Error) -> Self {
        let internal = matches!(error.code(), ErrorCode::InternalError);
        let (message, details) = if internal {
            (REDACTED_MESSAGE.to_owned(), None)
        } else {
            (error.message().to_owned(), error.details().cloned())
        };
        Self {
            code: envelope_code(error.code()),
            message,
            data: None,
            details,
            trace_id: error.trace_id().map(str::to_owned),
        }
    }
}

impl<T: Serialize> Responder for Envelope<T> {
    type Body = BoxBody;

    fn respond_to(self, _req: &HttpRequest) -> HttpResponse<Self::Body> {
        HttpResponse::Ok().json(self)
    }
}
