//! HTTP-level tests for registration, login, logout and `/api/me`.

mod common;

use axum::http::{header, StatusCode};
use chrono::Duration;
use common::{
    assert_problem, body_json, email_of, get, get_auth, login, post_auth, post_json, register,
    sign_up, PASSWORD,
};
use serde_json::json;

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_returns_created_with_location() {
    let test = common::build_test_app();
    let body = json!({ "name": "Alice", "email": "alice@example.com", "password": PASSWORD });

    let response = post_json(test.app(), "/api/users", body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/api/users/"));
}

#[tokio::test]
async fn register_duplicate_email_is_conflict() {
    let test = common::build_test_app();
    register(test.app(), "Alice").await;

    let body = json!({ "name": "Other", "email": email_of("Alice"), "password": PASSWORD });
    let response = post_json(test.app(), "/api/users", body).await;

    assert_problem(response, StatusCode::CONFLICT, "email-already-in-use").await;
}

#[tokio::test]
async fn register_short_password_is_insecure() {
    let test = common::build_test_app();
    let body = json!({ "name": "Alice", "email": "alice@example.com", "password": "1234" });

    let response = post_json(test.app(), "/api/users", body).await;

    assert_problem(response, StatusCode::BAD_REQUEST, "insecure-password").await;
}

#[tokio::test]
async fn malformed_body_is_invalid_request_content() {
    let test = common::build_test_app();
    let body = json!({ "name": "Alice" });

    let response = post_json(test.app(), "/api/users", body).await;

    assert_problem(response, StatusCode::BAD_REQUEST, "invalid-request-content").await;
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_returns_token_and_expiration() {
    let test = common::build_test_app();
    register(test.app(), "Alice").await;

    let body = json!({ "email": email_of("Alice"), "password": PASSWORD });
    let response = post_json(test.app(), "/api/users/token", body).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(!json["token"].as_str().unwrap().is_empty());
    // Rolling window (60 min) ends before the absolute one (24 h).
    assert_eq!(json["expiration"], "2024-09-30T09:00:00Z");
}

#[tokio::test]
async fn login_with_wrong_password_is_rejected() {
    let test = common::build_test_app();
    register(test.app(), "Alice").await;

    let body = json!({ "email": email_of("Alice"), "password": "not-the-password" });
    let response = post_json(test.app(), "/api/users/token", body).await;

    assert_problem(response, StatusCode::UNAUTHORIZED, "user-or-password-are-invalid").await;
}

#[tokio::test]
async fn login_with_unknown_email_looks_like_wrong_password() {
    let test = common::build_test_app();

    let body = json!({ "email": "nobody@example.com", "password": PASSWORD });
    let response = post_json(test.app(), "/api/users/token", body).await;

    assert_problem(response, StatusCode::UNAUTHORIZED, "user-or-password-are-invalid").await;
}

// ---------------------------------------------------------------------------
// Authenticated endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn me_returns_current_user() {
    let test = common::build_test_app();
    let (id, token) = sign_up(&test, "Alice").await;

    let response = get_auth(test.app(), "/api/me", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json, json!({ "id": id, "name": "Alice", "email": "alice@example.com" }));
}

#[tokio::test]
async fn me_without_token_is_unauthorized() {
    let test = common::build_test_app();

    let response = get(test.app(), "/api/me").await;

    assert_eq!(response.headers()[header::WWW_AUTHENTICATE], "bearer");
    assert_problem(response, StatusCode::UNAUTHORIZED, "unauthorized").await;
}

#[tokio::test]
async fn me_with_unknown_token_is_unauthorized() {
    let test = common::build_test_app();

    let response = get_auth(test.app(), "/api/me", "not-a-real-token").await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_revokes_the_token() {
    let test = common::build_test_app();
    let (_, token) = sign_up(&test, "Alice").await;

    let response = post_auth(test.app(), "/api/logout", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(test.app(), "/api/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn idle_token_expires_after_rolling_window() {
    let test = common::build_test_app();
    let (_, token) = sign_up(&test, "Alice").await;

    test.clock.advance(Duration::minutes(59));
    let response = get_auth(test.app(), "/api/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    // The previous use refreshed the window.
    test.clock.advance(Duration::minutes(59));
    let response = get_auth(test.app(), "/api/me", &token).await;
    assert_eq!(response.status(), StatusCode::OK);

    test.clock.advance(Duration::minutes(61));
    let response = get_auth(test.app(), "/api/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn oldest_token_is_evicted_past_the_limit() {
    let test = common::build_test_app();
    register(test.app(), "Alice").await;

    let mut tokens = Vec::new();
    for _ in 0..4 {
        tokens.push(login(test.app(), "Alice").await);
        test.clock.advance(Duration::seconds(1));
    }

    let response = get_auth(test.app(), "/api/me", &tokens[0]).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    for token in &tokens[1..] {
        let response = get_auth(test.app(), "/api/me", token).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
