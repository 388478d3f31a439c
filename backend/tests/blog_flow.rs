//! End-to-end walk through registration, posting, commenting and ownership
//! checks over the in-memory store.

use std::sync::Arc;

use actix_http::Request;
use actix_web::{
    App,
    body::BoxBody,
    dev::{Service, ServiceResponse},
    http::StatusCode,
    test::{self, TestRequest},
    web,
};
use blog_backend::Trace;
use blog_backend::inbound::http::routes::configure_api;
use blog_backend::inbound::http::state::HttpState;
use blog_backend::outbound::memory::InMemoryBlogStore;
use blog_backend::outbound::security::{Argon2PasswordHasher, JwtSessionTokens};
use chrono::TimeDelta;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const SIGNING_KEY: &[u8] = b"integration-signing-key-0123456789";

#[fixture]
fn state() -> HttpState {
    let hasher = Argon2PasswordHasher::with_costs(1024, 1, 1).expect("valid argon2 costs");
    let tokens = JwtSessionTokens::new(
        SIGNING_KEY,
        TimeDelta::minutes(30),
        Arc::new(mockable::DefaultClock),
    );
    HttpState::from_store(
        Arc::new(InMemoryBlogStore::new()),
        Arc::new(hasher),
        Arc::new(tokens),
    )
}

async fn init_app(
    state: HttpState,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await
}

async fn send(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
    request: TestRequest,
) -> (StatusCode, Value) {
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let body: Value = test::read_body_json(response).await;
    (status, body)
}

async fn signed_up(
    app: &impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
    username: &str,
    email: &str,
) -> String {
    let (status, _) = send(
        app,
        TestRequest::post().uri("/api/v1/auth/register").set_json(json!({
            "username": username,
            "email": email,
            "password": "hunter2hunter2"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({"email": email, "password": "hunter2hunter2"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body.get("token")
        .and_then(Value::as_str)
        .expect("token in login response")
        .to_owned()
}

fn authorised(request: TestRequest, token: &str) -> TestRequest {
    request.insert_header(("Authorization", format!("Bearer {token}")))
}

#[rstest]
#[actix_web::test]
async fn owners_control_their_posts_and_comments_keep_count(state: HttpState) {
    let app = init_app(state).await;
    let alice = signed_up(&app, "alice", "a@x.com").await;

    let (status, post) = send(
        &app,
        authorised(TestRequest::post().uri("/api/v1/posts"), &alice)
            .set_json(json!({"title": "Hi there", "content": "Hello world"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(post.get("id").and_then(Value::as_i64), Some(1));

    let (status, _) = send(
        &app,
        authorised(TestRequest::post().uri("/api/v1/comments"), &alice)
            .set_json(json!({"postId": 1, "content": "nice"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, fetched) = send(&app, TestRequest::get().uri("/api/v1/posts/1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched.get("commentCount").and_then(Value::as_u64), Some(1));

    let bob = signed_up(&app, "bob", "b@x.com").await;
    let (status, body) = send(
        &app,
        authorised(TestRequest::put().uri("/api/v1/posts/1"), &bob)
            .set_json(json!({"title": "Mine now", "content": "Overwritten"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body.get("code").and_then(Value::as_str), Some("forbidden"));

    let (status, body) = send(
        &app,
        authorised(TestRequest::delete().uri("/api/v1/posts/1"), &alice),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.get("id").and_then(Value::as_i64), Some(1));

    let (status, _) = send(&app, TestRequest::get().uri("/api/v1/posts/1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[rstest]
#[actix_web::test]
async fn error_responses_carry_trace_id(state: HttpState) {
    let app = init_app(state).await;

    let response = test::call_service(
        &app,
        TestRequest::post()
            .uri("/api/v1/posts")
            .set_json(json!({"title": "Hi there", "content": "Hello world"}))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let header = response
        .headers()
        .get("trace-id")
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace-id header");
    let body: Value = test::read_body_json(response).await;
    assert_eq!(body.get("traceId").and_then(Value::as_str), Some(header.as_str()));
}
