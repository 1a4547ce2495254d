//! Shared fixtures for HTTP integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use agenda_api::config::ServerConfig;
use agenda_api::router::build_app_router;
use agenda_api::state::AppState;
use agenda_core::clock::FixedClock;
use agenda_core::config::UsersDomainConfig;
use agenda_db::MemTransactionManager;
use agenda_events::SlotPublisher;
use axum::body::Body;
use axum::http::{header, Method, Request, Response, StatusCode};
use axum::Router;
use chrono::{TimeZone, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse";

/// Build a test `ServerConfig` with safe defaults and in-memory storage.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        database_url: None,
        keep_alive_secs: 2,
        users: UsersDomainConfig::default(),
    }
}

/// The router plus the handles tests need to observe or steer it.
pub struct TestApp {
    pub router: Router,
    pub publisher: Arc<SlotPublisher>,
    pub clock: Arc<FixedClock>,
}

impl TestApp {
    /// A fresh clone of the router for one `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }
}

/// Build the full application router over a fresh in-memory store.
///
/// Goes through [`build_app_router`] so tests exercise the same middleware
/// stack as production. The publisher has no heartbeat task.
pub fn build_test_app() -> TestApp {
    let trx = Arc::new(MemTransactionManager::new());
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2024, 9, 30, 8, 0, 0).unwrap(),
    ));
    let publisher = Arc::new(SlotPublisher::new(trx.clone(), clock.clone()));

    let config = test_config();
    let state = AppState::new(
        config.clone(),
        None,
        trx,
        clock.clone(),
        publisher.clone(),
    );

    TestApp {
        router: build_app_router(state, &config),
        publisher,
        clock,
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, token: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert a problem+json response and return its body.
pub async fn assert_problem(response: Response<Body>, status: StatusCode, id: &str) -> Value {
    assert_eq!(response.status(), status);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/problem+json"
    );
    let json = body_json(response).await;
    assert_eq!(json["title"], id);
    assert_eq!(json["type"], format!("/problems/{id}"));
    json
}

// ---------------------------------------------------------------------------
// Domain helpers
// ---------------------------------------------------------------------------

pub fn email_of(name: &str) -> String {
    format!("{}@example.com", name.to_lowercase())
}

/// Register `name` and return the new user's id.
pub async fn register(app: Router, name: &str) -> i64 {
    let body = json!({ "name": name, "email": email_of(name), "password": PASSWORD });
    let response = post_json(app, "/api/users", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    location.rsplit('/').next().unwrap().parse().unwrap()
}

/// Log `name` in and return the bearer token.
pub async fn login(app: Router, name: &str) -> String {
    let body = json!({ "email": email_of(name), "password": PASSWORD });
    let response = post_json(app, "/api/users/token", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Register and log in `name`; returns `(user_id, token)`.
pub async fn sign_up(test: &TestApp, name: &str) -> (i64, String) {
    let id = register(test.app(), name).await;
    let token = login(test.app(), name).await;
    (id, token)
}

/// Create an event owned by the token's user and return its id.
pub async fn create_event(test: &TestApp, token: &str, selection_type: &str) -> i64 {
    let body = json!({
        "title": "Team sync",
        "description": "Weekly",
        "selectionType": selection_type,
    });
    let response = post_json_auth(test.app(), "/api/events", token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await.as_i64().unwrap()
}

/// Create a slot in `event_id` and return its id.
pub async fn create_slot(test: &TestApp, token: &str, event_id: i64, start: &str) -> i64 {
    let body = json!({ "startTime": start, "durationInMinutes": 30 });
    let uri = format!("/api/events/{event_id}/timeslots");
    let response = post_json_auth(test.app(), &uri, token, body).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"].as_i64().unwrap()
}

pub fn participants_uri(event_id: i64, slot_id: i64) -> String {
    format!("/api/events/{event_id}/timeslots/{slot_id}/participants")
}
