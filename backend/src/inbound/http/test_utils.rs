//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, test as actix_test, web};
use chrono::TimeDelta;
use serde_json::{Value, json};

use crate::inbound::http::routes::configure_api;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryBlogStore;
use crate::outbound::security::{Argon2PasswordHasher, JwtSessionTokens};

pub(crate) const TEST_SIGNING_KEY: &[u8] = b"test-signing-key-test-signing-key";
pub(crate) const TEST_PASSWORD: &str = "correct horse";

/// HTTP state over a fresh in-memory store with cheap Argon2 costs.
pub(crate) fn memory_state() -> HttpState {
    let hasher = Argon2PasswordHasher::with_costs(1024, 1, 1).expect("valid argon2 costs");
    let tokens = JwtSessionTokens::new(
        TEST_SIGNING_KEY,
        TimeDelta::hours(1),
        Arc::new(mockable::DefaultClock),
    );
    HttpState::from_store(
        Arc::new(InMemoryBlogStore::new()),
        Arc::new(hasher),
        Arc::new(tokens),
    )
}

/// App with the full `/api/v1` surface mounted over `state`.
pub(crate) fn test_app(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .service(web::scope("/api/v1").configure(configure_api))
}

/// Register `username` and return a bearer token for them.
pub(crate) async fn register_and_login(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    username: &str,
) -> String {
    let email = format!("{username}@example.com");
    let register = actix_test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({"username": username, "email": email, "password": TEST_PASSWORD}))
        .to_request();
    let response = actix_test::call_service(app, register).await;
    assert!(response.status().is_success(), "registration failed");

    let login = actix_test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({"email": email, "password": TEST_PASSWORD}))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(app, login).await;
    body.get("token")
        .and_then(Value::as_str)
        .expect("login returns a token")
        .to_owned()
}

/// `Authorization` header carrying `token`.
pub(crate) fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}
