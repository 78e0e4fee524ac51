//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the account endpoints, the health probes, the
//! envelope schemas and the session cookie security scheme. Swagger UI serves
//! it in debug builds and `cargo run --bin openapi-dump` prints it.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{EmptyEnvelopeSchema, UserEnvelopeSchema};
use crate::inbound::http::session_config::DEFAULT_COOKIE_NAME;
use crate::inbound::http::users::{LoginRequest, RegisterRequest, UserResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                DEFAULT_COOKIE_NAME,
                "Session token issued by POST /api/v1/user/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Account service API",
        description = "Registration, login and session-backed identity. Every account endpoint answers HTTP 200 with a {code, message, data} envelope."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::register,
        crate::inbound::http::users::login,
        crate::inbound::http::users::me,
        crate::inbound::http::users::logout,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserEnvelopeSchema,
        EmptyEnvelopeSchema,
        UserResponse,
        RegisterRequest,
        LoginRequest
    )),
    tags(
        (name = "user", description = "Account registration and sessions"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
