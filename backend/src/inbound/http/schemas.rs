//! OpenAPI schema definitions for the response envelope.
//!
//! [`super::envelope::Envelope`] is generic; utoipa gets one concrete
//! wrapper per payload so the documented shapes match the wire format.

use utoipa::ToSchema;

use super::users::UserResponse;

/// Envelope whose `data` is a user on success.
#[derive(ToSchema)]
#[schema(as = UserEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserEnvelopeSchema {
    /// `0` on success; otherwise 40001, 401, 403, 50000 or 50001.
    #[schema(example = 0)]
    code: i32,
    #[schema(example = "ok")]
    message: String,
    /// Present only when `code` is `0`.
    data: Option<UserResponse>,
    /// Field-level failure information.
    details: Option<serde_json::Value>,
    /// Correlation identifier, also sent in the `trace-id` header.
    trace_id: Option<String>,
}

/// Envelope that never carries `data`.
#[derive(ToSchema)]
#[schema(as = EmptyEnvelope)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct EmptyEnvelopeSchema {
    #[schema(example = 0)]
    code: i32,
    #[schema(example = "logged out")]
    message: String,
    details: Option<serde_json::Value>,
    trace_id: Option<String>,
}
