//! Report lifecycle routes for the caller's own session.

use axum::{
    extract::{Multipart, State},
    Json,
};
use domain::models::{EvidenceFile, ReportState};
use domain::services::DeliveryOutcome;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::OfficerSession;
use crate::services::reports::{DraftOutcome, EditOutcome, ReportError, SessionView};

/// Multipart field carrying evidence for the initial draft.
pub const EVIDENCE_FIELD: &str = "files";

/// Multipart field carrying a spoken correction.
pub const AUDIO_FIELD: &str = "audio";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
    pub report_id: String,
    pub log_id: i64,
    pub state: ReportState,
    pub draft: String,
}

impl From<DraftOutcome> for DraftResponse {
    fn from(outcome: DraftOutcome) -> Self {
        Self {
            report_id: outcome.report_id,
            log_id: outcome.log_id,
            state: ReportState::DraftReady,
            draft: outcome.draft,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EditDraftRequest {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditDraftResponse {
    pub changed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_id: Option<i64>,
}

impl From<EditOutcome> for EditDraftResponse {
    fn from(outcome: EditOutcome) -> Self {
        Self {
            changed: outcome.changed,
            log_id: outcome.log_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizeResponse {
    pub report_id: String,
    pub log_id: i64,
    /// `sent`, `skipped` or `failed`.
    pub email: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_error: Option<String>,
}

/// GET /api/v1/report
pub async fn get_report(
    State(state): State<AppState>,
    session: OfficerSession,
) -> Json<SessionView> {
    Json(state.reports.view(&session.handle).await)
}

/// Generates the initial draft from uploaded evidence.
///
/// POST /api/v1/report/draft
pub async fn generate_draft(
    State(state): State<AppState>,
    session: OfficerSession,
    multipart: Multipart,
) -> Result<Json<DraftResponse>, ApiError> {
    let max_files = state.config.limits.max_evidence_files;
    let uploads = read_uploads(multipart, EVIDENCE_FIELD, max_files).await?;

    let evidence = uploads
        .into_iter()
        .map(|(name, data)| EvidenceFile::new(name, data))
        .collect::<Result<Vec<_>, _>>()
        .map_err(ReportError::from)?;

    let outcome = state
        .reports
        .generate_initial_draft(session.handle, evidence)
        .await?;
    Ok(Json(outcome.into()))
}

/// Replaces the draft with officer-edited text.
///
/// PUT /api/v1/report/draft
pub async fn save_draft(
    State(state): State<AppState>,
    session: OfficerSession,
    Json(request): Json<EditDraftRequest>,
) -> Result<Json<EditDraftResponse>, ApiError> {
    let outcome = state
        .reports
        .save_manual_edit(session.handle, request.text)
        .await?;
    Ok(Json(outcome.into()))
}

/// Revises the draft from a recorded spoken correction.
///
/// POST /api/v1/report/corrections
pub async fn apply_correction(
    State(state): State<AppState>,
    session: OfficerSession,
    multipart: Multipart,
) -> Result<Json<DraftResponse>, ApiError> {
    let mut uploads = read_uploads(multipart, AUDIO_FIELD, 1).await?;
    let (name, data) = uploads
        .pop()
        .ok_or_else(|| ApiError::Validation("An audio recording is required".to_string()))?;
    let audio = EvidenceFile::audio(name, data).map_err(ReportError::from)?;

    let outcome = state
        .reports
        .apply_audio_correction(session.handle, audio)
        .await?;
    Ok(Json(outcome.into()))
}

/// Affirms the current draft and ends the session.
///
/// POST /api/v1/report/finalize
pub async fn finalize(
    State(state): State<AppState>,
    session: OfficerSession,
) -> Result<Json<FinalizeResponse>, ApiError> {
    let outcome = state
        .reports
        .finalize(session.token, session.handle)
        .await?;

    let email_error = match &outcome.email {
        DeliveryOutcome::Failed(reason) => Some(reason.clone()),
        _ => None,
    };

    Ok(Json(FinalizeResponse {
        report_id: outcome.report_id,
        log_id: outcome.log_id,
        email: outcome.email.as_str(),
        email_error,
    }))
}

/// Buffers every file part named `field`, rejecting more than `limit`.
/// Parts under other names are skipped.
async fn read_uploads(
    mut multipart: Multipart,
    field: &str,
    limit: usize,
) -> Result<Vec<(String, Vec<u8>)>, ApiError> {
    let mut uploads = Vec::new();

    while let Some(part) = multipart.next_field().await? {
        if part.name() != Some(field) {
            debug!(field = ?part.name(), "Skipping unexpected multipart field");
            continue;
        }
        if uploads.len() == limit {
            return Err(ReportError::TooManyFiles(limit).into());
        }

        let name = part
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::Validation(format!("Field '{}' must be a file", field)))?;
        let data = part.bytes().await?;
        uploads.push((name, data.to_vec()));
    }

    Ok(uploads)
}
