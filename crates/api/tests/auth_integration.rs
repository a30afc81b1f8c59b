//! Integration tests for login, logout and session handling.

mod common;

use axum::http::{Method, StatusCode};
use common::{empty_request, json_request, parse_body, test_config, TestApp, TestOfficer};
use domain::models::NewOfficer;
use report_assistant_api::services::{CredentialError, CredentialService};
use serde_json::json;

#[tokio::test]
async fn test_login_success_returns_session_and_report_id() {
    let app = TestApp::new().await;
    let officer = TestOfficer::new("1001");
    app.provision(&officer).await;

    let body = app.login(&officer).await;

    assert_eq!(body["sessionToken"].as_str().unwrap().len(), 64);
    assert_eq!(body["officer"]["badgeNumber"], "1001");
    assert_eq!(body["officer"]["fullName"], officer.full_name);
    assert_eq!(body["officer"]["email"], officer.email);
    assert!(body["officer"].get("passwordHash").is_none());
    assert!(!body["reportId"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_badge_look_the_same() {
    let app = TestApp::new().await;
    app.provision(&TestOfficer::new("1001")).await;

    let wrong_password = app
        .send(json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({ "badgeNumber": "1001", "password": "nope" }),
        ))
        .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_password = parse_body(wrong_password).await;

    let unknown_badge = app
        .send(json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({ "badgeNumber": "9999", "password": "testpass" }),
        ))
        .await;
    assert_eq!(unknown_badge.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(wrong_password, parse_body(unknown_badge).await);
}

#[tokio::test]
async fn test_login_requires_fields() {
    let app = TestApp::new().await;

    let response = app
        .send(json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({ "badgeNumber": "", "password": "" }),
        ))
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = parse_body(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_each_login_reserves_a_new_report_id() {
    let app = TestApp::new().await;
    let officer = TestOfficer::new("1001");
    app.provision(&officer).await;

    let first = app.login(&officer).await;
    let second = app.login(&officer).await;

    assert_ne!(first["reportId"], second["reportId"]);
    assert_ne!(first["sessionToken"], second["sessionToken"]);
}

#[tokio::test]
async fn test_report_requires_session_token() {
    let app = TestApp::new().await;

    let missing = app
        .send(empty_request(Method::GET, "/api/v1/report", None))
        .await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let bogus = app
        .send(empty_request(Method::GET, "/api/v1/report", Some("not-a-token")))
        .await;
    assert_eq!(bogus.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_discards_session_without_logging() {
    let app = TestApp::new().await;
    let officer = TestOfficer::new("1001");
    app.provision(&officer).await;
    let login = app.login(&officer).await;
    let token = login["sessionToken"].as_str().unwrap();
    let report_id = login["reportId"].as_str().unwrap();

    let response = app
        .send(empty_request(Method::POST, "/api/v1/auth/logout", Some(token)))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let after = app
        .send(empty_request(Method::GET, "/api/v1/report", Some(token)))
        .await;
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
    assert!(app.audit_rows(report_id).await.is_empty());
}

#[tokio::test]
async fn test_session_expires_after_idle_timeout() {
    let app = TestApp::with_config(test_config(&[("session.idle_timeout_secs", "0")])).await;
    let officer = TestOfficer::new("1001");
    app.provision(&officer).await;
    let token = app.token(&officer).await;

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let response = app
        .send(empty_request(Method::GET, "/api/v1/report", Some(&token)))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_attempts_are_throttled_per_badge() {
    let app = TestApp::with_config(test_config(&[(
        "security.login_attempts_per_minute",
        "2",
    )]))
    .await;
    app.provision(&TestOfficer::new("1001")).await;

    let attempt = |badge: &'static str| {
        json_request(
            Method::POST,
            "/api/v1/auth/login",
            None,
            json!({ "badgeNumber": badge, "password": "wrong" }),
        )
    };

    assert_eq!(app.send(attempt("1001")).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.send(attempt("1001")).await.status(), StatusCode::UNAUTHORIZED);

    let throttled = app.send(attempt("1001")).await;
    assert_eq!(throttled.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(throttled.headers().contains_key("retry-after"));

    // Other badges have their own budget.
    assert_eq!(app.send(attempt("2002")).await.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_duplicate_badge_is_rejected_and_original_kept() {
    let app = TestApp::new().await;
    let original = TestOfficer::new("1001");
    app.provision(&original).await;

    let result = CredentialService::new(app.pool.clone())
        .provision(NewOfficer {
            badge_number: "1001".to_string(),
            full_name: "Someone Else".to_string(),
            email: "else@example.com".to_string(),
            password: "otherpass".to_string(),
        })
        .await;
    assert!(matches!(result, Err(CredentialError::AlreadyExists(_))));

    // The original password still works.
    let body = app.login(&original).await;
    assert_eq!(body["officer"]["fullName"], original.full_name);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new().await;

    let health = app.send(empty_request(Method::GET, "/api/health", None)).await;
    assert_eq!(health.status(), StatusCode::OK);
    assert_eq!(
        health.headers()["cache-control"],
        "no-store",
        "security headers apply to every route"
    );
    let body = parse_body(health).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"]["connected"], true);
    assert_eq!(body["emailDelivery"], "console");

    let live = app
        .send(empty_request(Method::GET, "/api/health/live", None))
        .await;
    assert_eq!(live.status(), StatusCode::OK);

    let ready = app
        .send(empty_request(Method::GET, "/api/health/ready", None))
        .await;
    assert_eq!(ready.status(), StatusCode::OK);
}
