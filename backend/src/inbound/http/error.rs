//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while letting Actix
//! handlers turn domain failures into the shared JSON envelope. Failures are
//! reported in the envelope `code`; the HTTP status is always `200 OK`.

use actix_web::error::{JsonPayloadError, UrlencodedError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;
use tracing::{error, warn};

use super::envelope::Envelope;
use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const UNSUPPORTED_CONTENT_TYPE_MESSAGE: &str =
    "request body must be application/json or application/x-www-form-urlencoded";

fn log_failure(error: &Error) {
    match error.code() {
        ErrorCode::InternalError | ErrorCode::ServiceUnavailable => error!(
            code = error.code().as_str(),
            message = error.message(),
            "request failed"
        ),
        _ => warn!(
            code = error.code().as_str(),
            message = error.message(),
            "request rejected"
        ),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse {
        log_failure(self);
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        builder.json(Envelope::<()>::from_error(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak implementation details to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("Internal server error")
    }
}

/// Error handler for [`actix_web::web::JsonConfig`].
///
/// Malformed or mistyped JSON bodies become `invalid_request` envelopes
/// instead of Actix's default plain-text 400.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let (message, code) = match &err {
        JsonPayloadError::ContentType => (
            UNSUPPORTED_CONTENT_TYPE_MESSAGE.to_owned(),
            "unsupported_content_type",
        ),
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            ("request body is too large".to_owned(), "payload_too_large")
        }
        JsonPayloadError::Deserialize(source) => {
            (format!("invalid request body: {source}"), "invalid_body")
        }
        _ => ("invalid request body".to_owned(), "invalid_body"),
    };
    body_error(message, code)
}

/// Error handler for [`actix_web::web::FormConfig`].
pub fn form_error_handler(err: UrlencodedError, _req: &HttpRequest) -> actix_web::Error {
    let (message, code) = match &err {
        UrlencodedError::ContentType => (
            UNSUPPORTED_CONTENT_TYPE_MESSAGE.to_owned(),
            "unsupported_content_type",
        ),
        UrlencodedError::Overflow { .. } => {
            ("request body is too large".to_owned(), "payload_too_large")
        }
        UrlencodedError::Parse(source) => {
            (format!("invalid request body: {source}"), "invalid_body")
        }
        _ => ("invalid request body".to_owned(), "invalid_body"),
    };
    body_error(message, code)
}

fn body_error(message: String, code: &str) -> actix_web::Error {
    Error::invalid_request(message)
        .with_details(json!({ "code": code }))
        .into()
}
