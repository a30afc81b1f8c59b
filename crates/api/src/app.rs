use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use domain::services::{DraftGenerator, ReportNotifier};
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::middleware::{
    metrics_handler, metrics_middleware, security_headers_middleware, trace_id,
};
use crate::routes::{audit_logs, auth, health, reports};
use crate::services::{CredentialService, LoginThrottle, ReportService, SessionStore};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<Config>,
    pub credentials: CredentialService,
    pub reports: ReportService,
    pub sessions: Arc<SessionStore>,
    pub login_throttle: Option<Arc<LoginThrottle>>,
}

impl AppState {
    pub fn new(
        config: Config,
        pool: SqlitePool,
        generator: Arc<dyn DraftGenerator>,
        notifier: Arc<dyn ReportNotifier>,
    ) -> Self {
        let config = Arc::new(config);
        let sessions = Arc::new(SessionStore::new(Duration::from_secs(
            config.session.idle_timeout_secs,
        )));

        let reports = ReportService::new(
            pool.clone(),
            Arc::clone(&sessions),
            generator,
            notifier,
            config.limits.max_evidence_files,
        )
        .with_delivery_timeout(Duration::from_secs(config.email.send_timeout_secs));

        Self {
            credentials: CredentialService::new(pool.clone()),
            login_throttle: LoginThrottle::new(config.security.login_attempts_per_minute)
                .map(Arc::new),
            pool,
            config,
            reports,
            sessions,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    let config = Arc::clone(&state.config);

    let cors = if config.security.cors_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    let timeout = TimeoutLayer::new(Duration::from_secs(config.server.request_timeout_secs));

    // Generation calls are bounded by the generator's own timeout, which is
    // far longer than a normal request. Finalize is bounded by the email
    // delivery timeout.
    let untimed_routes = Router::new()
        .route(
            "/api/v1/report/draft",
            post(reports::generate_draft)
                .merge(put(reports::save_draft).layer(timeout.clone())),
        )
        .route("/api/v1/report/corrections", post(reports::apply_correction))
        .route("/api/v1/report/finalize", post(reports::finalize));

    let session_routes = Router::new()
        .route("/api/v1/auth/login", post(auth::login))
        .route("/api/v1/auth/logout", post(auth::logout))
        .route("/api/v1/report", get(reports::get_report))
        .route(
            "/api/v1/reports/:report_id/audit-log",
            get(audit_logs::get_audit_trail),
        )
        .layer(timeout);

    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(untimed_routes)
        // Global middleware (bottom layers run first)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            security_headers_middleware,
        ))
        .layer(DefaultBodyLimit::max(config.server.max_body_size))
        .layer(RequestBodyLimitLayer::new(config.server.max_body_size))
        .layer(CompressionLayer::new())
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .layer(cors)
        .with_state(state)
}
