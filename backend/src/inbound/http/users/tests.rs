//! Handler tests for the user account endpoints.

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use std::sync::Arc;

use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::{Value, json};

use super::*;
use crate::domain::ports::{
    MockLoginService, MockRegistrationService, MockSessionStore, SessionStoreError,
    UserRepository,
};
use crate::domain::{SessionAttributes, SessionService, UserName};
use crate::inbound::http::session_config::SessionCookieConfig;
use crate::inbound::http::test_utils::{
    ANN_PASSWORD, TestContext, ann_account, app_for, seeded_token,
};

const FORM: &str = "application/x-www-form-urlencoded";

fn register_body(password_confirm: &str) -> Value {
    json!({
        "nickname": "Bob",
        "user_name": "bob_smith",
        "password": "password1",
        "password_confirm": password_confirm,
    })
}

fn session_cookie(res: &ServiceResponse) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
}

async fn envelope(res: ServiceResponse) -> Envelope<Value> {
    assert_eq!(res.status(), actix_web::http::StatusCode::OK);
    actix_test::read_body_json(res).await
}

#[rstest]
#[actix_web::test]
async fn register_creates_account_without_logging_in() {
    let ctx = TestContext::new();
    let app = actix_test::init_service(ctx.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/register")
            .set_json(register_body("password1"))
            .to_request(),
    )
    .await;

    assert!(session_cookie(&res).is_none());
    let body = envelope(res).await;
    assert_eq!(body.code, 0);
    let data = body.data.expect("user data");
    assert_eq!(data["user_name"], "bob_smith");
    assert_eq!(data["nickname"], "Bob");
    assert_eq!(data["status"], "active");
    assert!(data.get("password_digest").is_none());
    assert!(ctx.store.is_empty().await);
}

#[rstest]
#[actix_web::test]
async fn register_rejects_mismatched_confirmation_without_creating_user() {
    let ctx = TestContext::new();
    let app = actix_test::init_service(ctx.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/register")
            .set_json(register_body("password2"))
            .to_request(),
    )
    .await;

    let body = envelope(res).await;
    assert_eq!(body.code, 40001);
    assert!(body.data.is_none());
    let exists = ctx
        .users
        .user_name_exists(&UserName::new("bob_smith").expect("user name"))
        .await
        .expect("lookup");
    assert!(!exists);
}

#[rstest]
#[case(json!({"nickname": "Bob", "password": "password1", "password_confirm": "password1"}), "user_name", "missing required field: user_name")]
#[case(json!({"user_name": "bob_smith", "password": "password1", "password_confirm": "password1"}), "nickname", "missing required field: nickname")]
#[case(json!({"nickname": "Bob", "user_name": "bob_smith", "password": "password1"}), "password_confirm", "missing required field: password_confirm")]
#[actix_web::test]
async fn register_reports_missing_fields(
    #[case] payload: Value,
    #[case] field: &str,
    #[case] message: &str,
) {
    let ctx = TestContext::new();
    let app = actix_test::init_service(ctx.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/register")
            .set_json(payload)
            .to_request(),
    )
    .await;

    let body = envelope(res).await;
    assert_eq!(body.code, 40001);
    assert_eq!(body.message, message);
    assert_eq!(
        body.details,
        Some(json!({"field": field, "code": "missing_field"}))
    );
}

#[rstest]
#[actix_web::test]
async fn register_rejects_taken_nickname() {
    let ctx = TestContext::new();
    ctx.users.seed(ann_account()).await;
    let app = actix_test::init_service(ctx.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/register")
            .set_json(json!({
                "nickname": "Ann",
                "user_name": "another_ann",
                "password": "password1",
                "password_confirm": "password1",
            }))
            .to_request(),
    )
    .await;

    let body = envelope(res).await;
    assert_eq!(body.code, 40001);
    assert_eq!(body.message, "nickname already registered");
}

#[rstest]
#[actix_web::test]
async fn malformed_json_is_a_parameter_error() {
    let ctx = TestContext::new();
    let app = actix_test::init_service(ctx.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/login")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"user_name\": 7")
            .to_request(),
    )
    .await;

    let body = envelope(res).await;
    assert_eq!(body.code, 40001);
}

#[rstest]
#[actix_web::test]
async fn login_issues_cookie_that_resolves_to_the_user() {
    let ctx = TestContext::new();
    ctx.users.seed(ann_account()).await;
    let app = actix_test::init_service(ctx.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/login")
            .set_json(json!({"user_name": "ann_lee", "password": ANN_PASSWORD}))
            .to_request(),
    )
    .await;

    let cookie = session_cookie(&res).expect("session cookie issued");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    let body = envelope(res).await;
    assert_eq!(body.code, 0);
    assert_eq!(body.data.expect("user")["nickname"], "Ann");

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/user/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    let body = envelope(res).await;
    assert_eq!(body.code, 0);
    assert_eq!(body.data.expect("user")["id"], 42);
}

#[rstest]
#[case("ann_lee", "wrong-password")]
#[case("nobody_here", ANN_PASSWORD)]
#[actix_web::test]
async fn login_failures_share_one_message(#[case] user_name: &str, #[case] password: &str) {
    let ctx = TestContext::new();
    ctx.users.seed(ann_account()).await;
    let app = actix_test::init_service(ctx.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/login")
            .set_json(json!({"user_name": user_name, "password": password}))
            .to_request(),
    )
    .await;

    assert!(session_cookie(&res).is_none());
    let body = envelope(res).await;
    assert_eq!(body.code, 401);
    assert_eq!(body.message, "invalid user name or password");
    assert!(body.data.is_none());
}

#[rstest]
#[actix_web::test]
async fn login_replaces_a_previous_session_token() {
    let ctx = TestContext::new();
    ctx.users.seed(ann_account()).await;
    ctx.seed_session(&seeded_token(), 42).await;
    let app = actix_test::init_service(ctx.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/login")
            .cookie(Cookie::new("session", "abc123"))
            .set_json(json!({"user_name": "ann_lee", "password": ANN_PASSWORD}))
            .to_request(),
    )
    .await;

    let cookie = session_cookie(&res).expect("session cookie issued");
    assert_ne!(cookie.value(), "abc123");
    assert_eq!(ctx.store.len().await, 1);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/user/me")
            .cookie(Cookie::new("session", "abc123"))
            .to_request(),
    )
    .await;
    assert_eq!(envelope(res).await.code, 401);
}

#[rstest]
#[actix_web::test]
async fn me_returns_seeded_session_user() {
    let ctx = TestContext::new();
    ctx.users.seed(ann_account()).await;
    ctx.seed_session(&seeded_token(), 42).await;
    let app = actix_test::init_service(ctx.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/user/me")
            .cookie(Cookie::new("session", "abc123"))
            .to_request(),
    )
    .await;

    let body = envelope(res).await;
    assert_eq!(body.code, 0);
    let data = body.data.expect("user");
    assert_eq!(data["nickname"], "Ann");
    assert_eq!(data["created_at"], 1_700_000_000);
}

#[rstest]
#[case(None)]
#[case(Some("unknown-token"))]
#[actix_web::test]
async fn me_without_live_session_is_unauthenticated(#[case] token: Option<&'static str>) {
    let ctx = TestContext::new();
    let app = actix_test::init_service(ctx.app()).await;

    let mut req = actix_test::TestRequest::get().uri("/api/v1/user/me");
    if let Some(token) = token {
        req = req.cookie(Cookie::new("session", token));
    }
    let body = envelope(actix_test::call_service(&app, req.to_request()).await).await;

    assert_eq!(body.code, 401);
    assert_eq!(body.message, "login required");
    assert!(body.data.is_none());
}

#[rstest]
#[actix_web::test]
async fn logout_clears_session_and_expires_cookie() {
    let ctx = TestContext::new();
    ctx.users.seed(ann_account()).await;
    ctx.seed_session(&seeded_token(), 42).await;
    let app = actix_test::init_service(ctx.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/user/logout")
            .cookie(Cookie::new("session", "abc123"))
            .to_request(),
    )
    .await;

    let removal = session_cookie(&res).expect("removal cookie");
    assert_eq!(removal.value(), "");
    let body = envelope(res).await;
    assert_eq!(body.code, 0);
    assert_eq!(body.message, "logged out");
    assert!(ctx.store.is_empty().await);

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/user/me")
            .cookie(Cookie::new("session", "abc123"))
            .to_request(),
    )
    .await;
    let body = envelope(res).await;
    assert_eq!(body.code, 401);
    assert!(body.data.is_none());
}

#[rstest]
#[actix_web::test]
async fn logout_without_session_is_unauthenticated() {
    let ctx = TestContext::new();
    let app = actix_test::init_service(ctx.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get().uri("/api/v1/user/logout").to_request(),
    )
    .await;

    assert!(session_cookie(&res).is_none());
    assert_eq!(envelope(res).await.code, 401);
}

#[rstest]
#[actix_web::test]
async fn form_bodies_register_and_log_in() {
    let ctx = TestContext::new();
    let app = actix_test::init_service(ctx.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/register")
            .insert_header(("content-type", FORM))
            .set_payload("nickname=Ann&user_name=ann_lee&password=password1&password_confirm=password1")
            .to_request(),
    )
    .await;
    let body = envelope(res).await;
    assert_eq!(body.code, 0);
    assert_eq!(body.data.expect("user")["user_name"], "ann_lee");

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/login")
            .insert_header(("content-type", FORM))
            .set_payload("user_name=ann_lee&password=password1")
            .to_request(),
    )
    .await;
    assert!(session_cookie(&res).is_some());
    assert_eq!(envelope(res).await.code, 0);
}

#[rstest]
#[actix_web::test]
async fn unsupported_content_type_is_a_parameter_error() {
    let ctx = TestContext::new();
    let app = actix_test::init_service(ctx.app()).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri("/api/v1/user/login")
            .insert_header(("content-type", "text/plain"))
            .set_payload("user_name=ann_lee")
            .to_request(),
    )
    .await;

    let body = envelope(res).await;
    assert_eq!(body.code, 40001);
    assert_eq!(body.details, Some(json!({"code": "unsupported_content_type"})));
}

fn state_without_services(ctx: &TestContext) -> HttpState {
    let mut login_service = MockLoginService::new();
    login_service.expect_authenticate().times(0);
    let mut registration = MockRegistrationService::new();
    registration.expect_register().times(0);
    HttpState::new(
        Arc::new(login_service),
        Arc::new(registration),
        ctx.state.sessions.clone(),
        SessionCookieConfig::default().with_secure(false),
    )
}

#[rstest]
#[case("/api/v1/user/register", "application/json", r#"{"nickname":"Ann","password":"password1","password_confirm":"password1"}"#)]
#[case("/api/v1/user/register", FORM, "nickname=Ann&user_name=ann_lee&password=password1")]
#[case("/api/v1/user/login", "application/json", r#"{"user_name":"ann_lee"}"#)]
#[case("/api/v1/user/login", FORM, "password=password1")]
#[actix_web::test]
async fn missing_parameters_never_reach_the_services(
    #[case] uri: &'static str,
    #[case] content_type: &'static str,
    #[case] payload: &'static str,
) {
    let ctx = TestContext::new();
    let app = actix_test::init_service(app_for(state_without_services(&ctx))).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(uri)
            .insert_header(("content-type", content_type))
            .set_payload(payload)
            .to_request(),
    )
    .await;

    assert!(session_cookie(&res).is_none());
    let body = envelope(res).await;
    assert_eq!(body.code, 40001);
    assert!(body.message.starts_with("missing required field"));
    assert!(ctx.store.is_empty().await);
}

#[rstest]
#[actix_web::test]
async fn logout_reports_commit_failure_without_clearing_cookie() {
    let ctx = TestContext::new();
    ctx.users.seed(ann_account()).await;
    let mut store = MockSessionStore::new();
    store.expect_load().returning(|_| {
        Ok(Some(
            [("user_id", "42")].into_iter().collect::<SessionAttributes>(),
        ))
    });
    store
        .expect_delete()
        .times(1)
        .returning(|_| Err(SessionStoreError::connection("down")));
    let state = HttpState::new(
        ctx.state.login.clone(),
        ctx.state.registration.clone(),
        SessionService::new(Arc::new(store), ctx.users.clone()),
        SessionCookieConfig::default().with_secure(false),
    );
    let app = actix_test::init_service(app_for(state)).await;

    let res = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/user/logout")
            .cookie(Cookie::new("session", "abc123"))
            .to_request(),
    )
    .await;

    assert!(session_cookie(&res).is_none());
    let body = envelope(res).await;
    assert_eq!(body.code, 50001);
    assert!(body.data.is_none());
    assert_ne!(body.message, "logged out");
}
