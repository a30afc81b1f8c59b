//! Audit trail reads.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::AuditLogEntry;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OfficerSession;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditTrailResponse {
    pub report_id: String,
    pub entries: Vec<AuditLogEntry>,
}

/// Lists the caller's own entries for a report, oldest first.
///
/// Reports the caller never touched are indistinguishable from unknown ones.
///
/// GET /api/v1/reports/:report_id/audit-log
pub async fn get_audit_trail(
    State(state): State<AppState>,
    session: OfficerSession,
    Path(report_id): Path<String>,
) -> Result<Json<AuditTrailResponse>, ApiError> {
    let badge_number = session.handle.lock().await.officer().badge_number.clone();
    let entries = state.reports.audit_trail(&badge_number, &report_id).await?;

    Ok(Json(AuditTrailResponse { report_id, entries }))
}
