//! Shared fixtures for integration tests.
//!
//! Every test gets its own in-memory database, a mock generator and a mock
//! notifier, so tests run in parallel without any external services.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request},
    response::Response,
    Router,
};
use domain::models::NewOfficer;
use domain::services::{DraftGenerator, MockDraftGenerator, MockReportNotifier, ReportNotifier};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use report_assistant_api::{
    app::{create_app, AppState},
    config::Config,
    services::CredentialService,
};
use serde_json::Value;
use sqlx::SqlitePool;
use tower::ServiceExt;

pub const BOUNDARY: &str = "report-assistant-test-boundary";

/// An officer provisioned into the test database.
#[derive(Debug, Clone)]
pub struct TestOfficer {
    pub badge_number: String,
    pub full_name: String,
    pub email: String,
    pub password: String,
}

impl TestOfficer {
    pub fn new(badge_number: &str) -> Self {
        Self {
            badge_number: badge_number.to_string(),
            full_name: Name().fake(),
            email: SafeEmail().fake(),
            password: "testpass".to_string(),
        }
    }
}

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub generator: Arc<MockDraftGenerator>,
    pub notifier: Arc<MockReportNotifier>,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_config(test_config(&[])).await
    }

    pub async fn with_config(config: Config) -> Self {
        let notifier = Arc::new(MockReportNotifier::new());
        Self::build(config, Arc::clone(&notifier), notifier).await
    }

    /// Uses `delivery` for finalized reports instead of the recording mock.
    pub async fn with_notifier(config: Config, delivery: Arc<dyn ReportNotifier>) -> Self {
        Self::build(config, Arc::new(MockReportNotifier::new()), delivery).await
    }

    async fn build(
        config: Config,
        notifier: Arc<MockReportNotifier>,
        delivery: Arc<dyn ReportNotifier>,
    ) -> Self {
        let pool = persistence::db::create_memory_pool()
            .await
            .expect("Failed to create test database");
        persistence::db::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        let generator = Arc::new(MockDraftGenerator::new());
        let state = AppState::new(
            config,
            pool.clone(),
            generator.clone() as Arc<dyn DraftGenerator>,
            delivery,
        );

        Self {
            router: create_app(state),
            pool,
            generator,
            notifier,
        }
    }

    pub async fn provision(&self, officer: &TestOfficer) {
        CredentialService::new(self.pool.clone())
            .provision(NewOfficer {
                badge_number: officer.badge_number.clone(),
                full_name: officer.full_name.clone(),
                email: officer.email.clone(),
                password: officer.password.clone(),
            })
            .await
            .expect("Failed to provision officer");
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Logs in and returns the login response body.
    pub async fn login(&self, officer: &TestOfficer) -> Value {
        let response = self
            .send(json_request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                serde_json::json!({
                    "badgeNumber": officer.badge_number,
                    "password": officer.password,
                }),
            ))
            .await;
        assert_eq!(response.status(), 200, "login failed");
        parse_body(response).await
    }

    /// Logs in and returns the session token.
    pub async fn token(&self, officer: &TestOfficer) -> String {
        self.login(officer).await["sessionToken"]
            .as_str()
            .unwrap()
            .to_string()
    }

    pub async fn audit_rows(&self, report_id: &str) -> Vec<(i64, String, Option<String>)> {
        sqlx::query_as(
            "SELECT log_id, change_type, change_detail FROM audit_log
             WHERE report_id = ? ORDER BY log_id",
        )
        .bind(report_id)
        .fetch_all(&self.pool)
        .await
        .unwrap()
    }
}

pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    Config::load_for_test(overrides).expect("Failed to build test config")
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

pub fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

/// Multipart request with one file part per `(field, file_name, bytes)`.
pub fn multipart_request(uri: &str, token: &str, files: &[(&str, &str, &[u8])]) -> Request<Body> {
    let mut body = Vec::new();
    for (field, file_name, data) in files {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                field, file_name
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body))
        .unwrap()
}

pub async fn parse_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}
