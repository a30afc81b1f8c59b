//! Officer login and logout.

use axum::{extract::State, http::StatusCode, Json};
use domain::models::OfficerIdentity;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OfficerSession;

/// Request body for login.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, max = 32, message = "Badge number is required"))]
    pub badge_number: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Response body for a successful login.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub session_token: String,
    pub officer: OfficerIdentity,
    /// Report id reserved for this session.
    pub report_id: String,
}

/// Verifies credentials and opens a report session.
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    request.validate()?;
    let badge_number = request.badge_number.trim();

    if let Some(throttle) = &state.login_throttle {
        if let Err(retry_after_secs) = throttle.check(badge_number) {
            warn!(badge_number = %badge_number, "Login attempts throttled");
            metrics::counter!("login_attempts_total", "outcome" => "throttled").increment(1);
            return Err(ApiError::RateLimited { retry_after_secs });
        }
    }

    let officer = match state.credentials.verify(badge_number, &request.password).await {
        Ok(officer) => officer,
        Err(e) => {
            metrics::counter!("login_attempts_total", "outcome" => "rejected").increment(1);
            return Err(e.into());
        }
    };

    let (session_token, report_id) = state.reports.start_session(officer.clone()).await?;
    metrics::counter!("login_attempts_total", "outcome" => "accepted").increment(1);
    info!(badge_number = %officer.badge_number, report_id = %report_id, "Officer logged in");

    Ok(Json(LoginResponse {
        session_token,
        officer,
        report_id,
    }))
}

/// Ends the session. Anything not finalized is discarded without a log entry.
///
/// POST /api/v1/auth/logout
pub async fn logout(State(state): State<AppState>, session: OfficerSession) -> StatusCode {
    let report_id = session.handle.lock().await.report_id().to_string();
    state.reports.end_session(&session.token);
    info!(report_id = %report_id, "Officer logged out");
    StatusCode::NO_CONTENT
}
