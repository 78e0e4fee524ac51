//! End-to-end account flows through the full router with in-memory adapters.

use std::sync::Arc;

use accounts::Trace;
use accounts::domain::{
    AccountService, DEFAULT_SESSION_TTL, SessionAttributes, SessionService, SessionToken,
    TRACE_ID_HEADER,
};
use accounts::inbound::http::routes;
use accounts::inbound::http::session_config::SessionCookieConfig;
use accounts::inbound::http::state::HttpState;
use accounts::outbound::crypto::Argon2PasswordHasher;
use accounts::outbound::memory::{InMemorySessionStore, InMemoryUserRepository};
use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::{App, test, web};
use rstest::{fixture, rstest};
use rstest_bdd_macros::{given, then};
use serde_json::{Value, json};

struct World {
    store: Arc<InMemorySessionStore>,
    state: HttpState,
}

#[fixture]
fn world() -> World {
    let users = Arc::new(InMemoryUserRepository::default());
    let store = Arc::new(InMemorySessionStore::default());
    let accounts = Arc::new(AccountService::new(
        users.clone(),
        Arc::new(Argon2PasswordHasher::new()),
    ));
    let sessions = SessionService::new(store.clone(), users);
    let state = HttpState::new(
        accounts.clone(),
        accounts,
        sessions,
        SessionCookieConfig::default().with_secure(false),
    );
    World { store, state }
}

macro_rules! init_app {
    ($world:expr) => {
        test::init_service(
            App::new()
                .wrap(Trace)
                .app_data(web::Data::new($world.state.clone()))
                .configure(routes::configure),
        )
        .await
    };
}

fn session_cookie(res: &ServiceResponse) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
}

#[given("a registration request for Ann")]
fn a_registration_request_for_ann() -> Value {
    json!({
        "nickname": "Ann",
        "user_name": "ann_lee",
        "password": "password1",
        "password_confirm": "password1",
    })
}

#[then("the envelope is unauthenticated")]
fn the_envelope_is_unauthenticated(body: Value) {
    assert_eq!(body["code"], 401);
    assert_eq!(body["message"], "login required");
    assert!(body.get("data").is_none());
}

#[rstest]
#[actix_web::test]
async fn register_login_me_logout(world: World) {
    let app = init_app!(world);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/user/register")
            .set_json(a_registration_request_for_ann())
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], 0);
    let id = body["data"]["id"].clone();

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/user/login")
            .set_json(json!({"user_name": "ann_lee", "password": "password1"}))
            .to_request(),
    )
    .await;
    assert!(res.headers().contains_key(TRACE_ID_HEADER));
    let cookie = session_cookie(&res).expect("login sets the session cookie");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["id"], id);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/user/me")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["nickname"], "Ann");

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/user/logout")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"code": 0, "message": "logged out"}));

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/user/me")
            .cookie(cookie)
            .to_request(),
    )
    .await;
    the_envelope_is_unauthenticated(test::read_body_json(res).await);
}

#[rstest]
#[actix_web::test]
async fn seeded_session_resolves_until_logout(world: World) {
    let app = init_app!(world);
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/user/register")
            .set_json(a_registration_request_for_ann())
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    let id = body["data"]["id"].as_u64().expect("numeric id");

    let token = SessionToken::new("abc123").expect("token");
    let attributes: SessionAttributes = [("user_id", id.to_string())].into_iter().collect();
    world
        .store
        .insert(token, attributes, DEFAULT_SESSION_TTL)
        .await;

    for _ in 0..2 {
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/v1/user/me")
                .cookie(Cookie::new("session", "abc123"))
                .to_request(),
        )
        .await;
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["nickname"], "Ann");
    }

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/user/logout")
            .cookie(Cookie::new("session", "abc123"))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], 0);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/user/me")
            .cookie(Cookie::new("session", "abc123"))
            .to_request(),
    )
    .await;
    the_envelope_is_unauthenticated(test::read_body_json(res).await);
}

#[rstest]
#[actix_web::test]
async fn mismatched_confirmation_creates_nothing(world: World) {
    let app = init_app!(world);
    let mut request = a_registration_request_for_ann();
    request["password_confirm"] = json!("password2");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/user/register")
            .set_json(request)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], 40001);
    assert!(body.get("data").is_none());

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/user/login")
            .set_json(json!({"user_name": "ann_lee", "password": "password1"}))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], 401);
}

#[rstest]
#[actix_web::test]
async fn missing_parameter_short_circuits(world: World) {
    let app = init_app!(world);

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/user/login")
            .set_json(json!({"password": "password1"}))
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;

    assert_eq!(body["code"], 40001);
    assert_eq!(body["message"], "missing required field: user_name");
    assert!(world.store.is_empty().await);
}
