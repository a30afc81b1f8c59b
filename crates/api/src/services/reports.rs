//! Report lifecycle orchestration.
//!
//! Ties one officer's session to the draft generator, the audit log and the
//! notifier. Every transition that writes to the audit log runs in its own
//! task: once started it completes even if the HTTP client goes away, so the
//! session and the log never disagree.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use domain::models::{
    AuditLogEntry, EvidenceError, EvidenceFile, OfficerIdentity, ReportChange, ReportSession,
    ReportState, TransitionError,
};
use domain::services::{
    audio_correction_instructions, initial_draft_instructions, DeliveryOutcome, DraftGenerator,
    FinalizedReport, GenerationError, ReportNotifier,
};
use persistence::repositories::AuditLogRepository;
use serde::Serialize;
use shared::crypto::generate_report_id;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

use super::sessions::{SessionHandle, SessionStore};

/// Draws of a fresh report id before giving up.
const MAX_REPORT_ID_ATTEMPTS: usize = 8;

const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Evidence(#[from] EvidenceError),

    #[error("At least one evidence file is required")]
    NoEvidence,

    #[error("At most {0} evidence files can be submitted at once")]
    TooManyFiles(usize),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("Report {0} not found")]
    ReportNotFound(String),

    #[error("Could not allocate a unique report id")]
    ReportIdExhausted,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Snapshot of a session as shown to its officer.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    pub report_id: String,
    pub officer: OfficerIdentity,
    pub state: ReportState,
    pub draft_generated: bool,
    pub current_draft: String,
}

impl From<&ReportSession> for SessionView {
    fn from(session: &ReportSession) -> Self {
        Self {
            report_id: session.report_id().to_string(),
            officer: session.officer().clone(),
            state: session.state(),
            draft_generated: session.draft_generated(),
            current_draft: session.current_draft().to_string(),
        }
    }
}

/// A draft produced by the generator and recorded in the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftOutcome {
    pub report_id: String,
    pub log_id: i64,
    pub draft: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditOutcome {
    pub changed: bool,
    pub log_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizeOutcome {
    pub report_id: String,
    pub log_id: i64,
    pub email: DeliveryOutcome,
}

#[derive(Clone)]
pub struct ReportService {
    audit: AuditLogRepository,
    sessions: Arc<SessionStore>,
    generator: Arc<dyn DraftGenerator>,
    notifier: Arc<dyn ReportNotifier>,
    max_evidence_files: usize,
    delivery_timeout: Duration,
}

impl ReportService {
    pub fn new(
        pool: SqlitePool,
        sessions: Arc<SessionStore>,
        generator: Arc<dyn DraftGenerator>,
        notifier: Arc<dyn ReportNotifier>,
        max_evidence_files: usize,
    ) -> Self {
        Self {
            audit: AuditLogRepository::new(pool),
            sessions,
            generator,
            notifier,
            max_evidence_files,
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }

    /// Bounds the email sent on finalize. A slower send counts as failed.
    pub fn with_delivery_timeout(mut self, delivery_timeout: Duration) -> Self {
        self.delivery_timeout = delivery_timeout;
        self
    }

    /// Opens a session with a report id unused by the log and by every live
    /// session. Returns the bearer token and the report id.
    pub async fn start_session(
        &self,
        officer: OfficerIdentity,
    ) -> Result<(String, String), ReportError> {
        let purged = self.sessions.purge_expired();
        if purged > 0 {
            info!(purged, "Purged idle sessions");
        }

        for _ in 0..MAX_REPORT_ID_ATTEMPTS {
            let report_id = generate_report_id();
            if self.sessions.holds_report(&report_id) || self.audit.report_exists(&report_id).await? {
                warn!(report_id = %report_id, "Report id collision, drawing again");
                continue;
            }

            info!(
                badge_number = %officer.badge_number,
                report_id = %report_id,
                "Report session started"
            );
            let token = self
                .sessions
                .insert(ReportSession::new(report_id.clone(), officer));
            return Ok((token, report_id));
        }

        Err(ReportError::ReportIdExhausted)
    }

    /// Destroys a session without logging anything.
    pub fn end_session(&self, token: &str) -> bool {
        self.sessions.remove(token)
    }

    pub fn session(&self, token: &str) -> Option<SessionHandle> {
        self.sessions.get(token)
    }

    pub async fn view(&self, handle: &SessionHandle) -> SessionView {
        SessionView::from(&*handle.lock().await)
    }

    /// Generates the first draft from all submitted evidence.
    pub async fn generate_initial_draft(
        &self,
        handle: SessionHandle,
        evidence: Vec<EvidenceFile>,
    ) -> Result<DraftOutcome, ReportError> {
        if evidence.is_empty() {
            return Err(ReportError::NoEvidence);
        }
        if evidence.len() > self.max_evidence_files {
            return Err(ReportError::TooManyFiles(self.max_evidence_files));
        }

        let service = self.clone();
        detached(async move { service.run_initial_draft(handle, evidence).await }).await
    }

    async fn run_initial_draft(
        &self,
        handle: SessionHandle,
        evidence: Vec<EvidenceFile>,
    ) -> Result<DraftOutcome, ReportError> {
        let (report_id, officer) = {
            let mut session = handle.lock().await;
            session.begin_initial_draft()?;
            (session.report_id().to_string(), session.officer().clone())
        };

        let instructions = initial_draft_instructions(&officer);
        let draft = match self.generator.generate(&evidence, &instructions).await {
            Ok(draft) => draft,
            Err(e) => {
                handle.lock().await.abort_pending();
                metrics::counter!("report_generation_failures_total", "stage" => "initial_draft")
                    .increment(1);
                return Err(e.into());
            }
        };

        let change = ReportChange::InitialDraft {
            draft: draft.clone(),
        };
        let log_id = match self.record(&report_id, &officer.badge_number, &change).await {
            Ok(log_id) => log_id,
            Err(e) => {
                handle.lock().await.abort_pending();
                return Err(e);
            }
        };

        handle.lock().await.complete_initial_draft(draft.clone())?;
        metrics::counter!("report_drafts_generated_total").increment(1);
        info!(
            report_id = %report_id,
            log_id,
            files = evidence.len(),
            "Initial draft generated"
        );

        Ok(DraftOutcome {
            report_id,
            log_id,
            draft,
        })
    }

    /// Merges a spoken correction into the current draft.
    pub async fn apply_audio_correction(
        &self,
        handle: SessionHandle,
        audio: EvidenceFile,
    ) -> Result<DraftOutcome, ReportError> {
        let service = self.clone();
        detached(async move { service.run_audio_correction(handle, audio).await }).await
    }

    async fn run_audio_correction(
        &self,
        handle: SessionHandle,
        audio: EvidenceFile,
    ) -> Result<DraftOutcome, ReportError> {
        let (report_id, badge_number, current_draft) = {
            let mut session = handle.lock().await;
            let current_draft = session.begin_correction()?;
            (
                session.report_id().to_string(),
                session.officer().badge_number.clone(),
                current_draft,
            )
        };

        let instructions = audio_correction_instructions(&current_draft);
        let revised = match self
            .generator
            .generate(std::slice::from_ref(&audio), &instructions)
            .await
        {
            Ok(revised) => revised,
            Err(e) => {
                handle.lock().await.abort_pending();
                metrics::counter!("report_generation_failures_total", "stage" => "audio_correction")
                    .increment(1);
                return Err(e.into());
            }
        };

        let change = ReportChange::AudioCorrection {
            file_name: audio.file_name().to_string(),
        };
        let log_id = match self.record(&report_id, &badge_number, &change).await {
            Ok(log_id) => log_id,
            Err(e) => {
                handle.lock().await.abort_pending();
                return Err(e);
            }
        };

        handle.lock().await.complete_correction(revised.clone())?;
        info!(report_id = %report_id, log_id, file = %audio.file_name(), "Audio correction applied");

        Ok(DraftOutcome {
            report_id,
            log_id,
            draft: revised,
        })
    }

    /// Saves manually edited text. Identical text records nothing.
    pub async fn save_manual_edit(
        &self,
        handle: SessionHandle,
        text: String,
    ) -> Result<EditOutcome, ReportError> {
        let service = self.clone();
        detached(async move {
            let mut session = handle.lock().await;
            if !session.edit_changes_draft(&text)? {
                return Ok(EditOutcome {
                    changed: false,
                    log_id: None,
                });
            }

            let report_id = session.report_id().to_string();
            let badge_number = session.officer().badge_number.clone();
            let log_id = service
                .record(&report_id, &badge_number, &ReportChange::ManualEdit)
                .await?;
            session.apply_manual_edit(text)?;

            Ok::<_, ReportError>(EditOutcome {
                changed: true,
                log_id: Some(log_id),
            })
        })
        .await
    }

    /// Affirms the current draft, ends the session, then emails a copy.
    ///
    /// The affirmation is durable before the session is destroyed; a failed
    /// email only shows up in the returned outcome.
    pub async fn finalize(
        &self,
        token: String,
        handle: SessionHandle,
    ) -> Result<FinalizeOutcome, ReportError> {
        let service = self.clone();
        detached(async move {
            let report = {
                let mut session = handle.lock().await;
                let report_text = session.final_text()?.to_string();
                let officer = session.officer().clone();
                let report_id = session.report_id().to_string();

                let change = ReportChange::FinalAffirmation {
                    report: report_text.clone(),
                };
                let log_id = service
                    .record(&report_id, &officer.badge_number, &change)
                    .await?;
                session.mark_finalized()?;

                FinalizedReport {
                    recipient_email: officer.email,
                    officer_name: officer.full_name,
                    report_id,
                    report_text,
                    log_id,
                }
            };

            service.sessions.remove(&token);
            metrics::counter!("reports_finalized_total").increment(1);
            info!(report_id = %report.report_id, log_id = report.log_id, "Report finalized");

            let email = service.deliver(&report).await;
            if email.is_success() {
                info!(report_id = %report.report_id, "Finalized report delivered");
            } else {
                warn!(
                    report_id = %report.report_id,
                    outcome = email.as_str(),
                    "Finalized report not delivered"
                );
            }

            Ok::<_, ReportError>(FinalizeOutcome {
                report_id: report.report_id,
                log_id: report.log_id,
                email,
            })
        })
        .await
    }

    /// The caller's own entries for a report, oldest first.
    pub async fn audit_trail(
        &self,
        badge_number: &str,
        report_id: &str,
    ) -> Result<Vec<AuditLogEntry>, ReportError> {
        let entries = self
            .audit
            .list_for_report_by_officer(report_id, badge_number)
            .await?;
        if entries.is_empty() {
            return Err(ReportError::ReportNotFound(report_id.to_string()));
        }
        Ok(entries)
    }

    async fn deliver(&self, report: &FinalizedReport) -> DeliveryOutcome {
        match tokio::time::timeout(self.delivery_timeout, self.notifier.send(report)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                metrics::counter!("report_emails_total", "outcome" => "timed_out").increment(1);
                DeliveryOutcome::Failed(format!(
                    "Email delivery timed out after {:?}",
                    self.delivery_timeout
                ))
            }
        }
    }

    async fn record(
        &self,
        report_id: &str,
        badge_number: &str,
        change: &ReportChange,
    ) -> Result<i64, ReportError> {
        let log_id = self.audit.record(report_id, badge_number, change).await?;
        metrics::counter!(
            "report_audit_entries_total",
            "change_type" => change.change_type().as_str()
        )
        .increment(1);
        Ok(log_id)
    }
}

/// Runs a transition to completion regardless of the caller being dropped.
async fn detached<T, F>(future: F) -> Result<T, ReportError>
where
    T: Send + 'static,
    F: Future<Output = Result<T, ReportError>> + Send + 'static,
{
    tokio::spawn(future)
        .await
        .map_err(|e| ReportError::Internal(format!("report task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::models::{ChangePayload, ChangeType, MANUAL_EDIT_MARKER};
    use domain::services::{MockDraftGenerator, MockReportNotifier};
    use persistence::db::{create_memory_pool, run_migrations};
    use std::time::Duration;

    struct Harness {
        service: ReportService,
        generator: Arc<MockDraftGenerator>,
        notifier: Arc<MockReportNotifier>,
        audit: AuditLogRepository,
    }

    async fn harness() -> Harness {
        let pool = create_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();

        let generator = Arc::new(MockDraftGenerator::new());
        let notifier = Arc::new(MockReportNotifier::new());
        let service = ReportService::new(
            pool.clone(),
            Arc::new(SessionStore::new(Duration::from_secs(3600))),
            generator.clone(),
            notifier.clone(),
            3,
        );

        Harness {
            service,
            generator,
            notifier,
            audit: AuditLogRepository::new(pool),
        }
    }

    async fn count_of(
        audit: &AuditLogRepository,
        report_id: &str,
        change_type: ChangeType,
    ) -> usize {
        audit
            .list_for_report(report_id)
            .await
            .unwrap()
            .iter()
            .filter(|entry| entry.change_type == change_type)
            .count()
    }

    fn officer() -> OfficerIdentity {
        OfficerIdentity {
            badge_number: "1001".to_string(),
            full_name: "John R. Smith".to_string(),
            email: "john.smith@police.gov".to_string(),
        }
    }

    fn file(name: &str) -> EvidenceFile {
        EvidenceFile::new(name, vec![1, 2, 3]).unwrap()
    }

    #[tokio::test]
    async fn test_full_lifecycle() {
        let h = harness().await;
        let (token, report_id) = h.service.start_session(officer()).await.unwrap();
        let handle = h.service.session(&token).unwrap();

        let draft = h
            .service
            .generate_initial_draft(handle.clone(), vec![file("scene.jpg")])
            .await
            .unwrap();
        assert_eq!(draft.report_id, report_id);
        assert!(draft.draft.contains("scene.jpg"));
        assert!(h.generator.calls()[0]
            .instructions
            .contains("John R. Smith with Badge Number 1001"));

        let edit = h
            .service
            .save_manual_edit(handle.clone(), "Edited report".to_string())
            .await
            .unwrap();
        assert!(edit.changed);

        let finalized = h.service.finalize(token.clone(), handle).await.unwrap();
        assert_eq!(finalized.email, DeliveryOutcome::Sent);
        assert!(h.service.session(&token).is_none());

        let entries = h.audit.list_for_report(&report_id).await.unwrap();
        let types: Vec<ChangeType> = entries.iter().map(|e| e.change_type).collect();
        assert_eq!(
            types,
            vec![
                ChangeType::InitialDraft,
                ChangeType::ManualEdit,
                ChangeType::FinalAffirmation
            ]
        );
        assert_eq!(entries[1].detail, ChangePayload::MarkerOnly(MANUAL_EDIT_MARKER.into()));
        assert_eq!(
            entries[2].detail,
            ChangePayload::FullSnapshot("Edited report".into())
        );
        assert_eq!(finalized.log_id, entries[2].log_id);

        let sent = h.notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].log_id, finalized.log_id);
        assert_eq!(sent[0].report_text, "Edited report");
    }

    #[tokio::test]
    async fn test_generation_failure_logs_nothing() {
        let h = harness().await;
        let (token, report_id) = h.service.start_session(officer()).await.unwrap();
        let handle = h.service.session(&token).unwrap();

        h.generator
            .push_response(Err(GenerationError::Request("quota exhausted".into())));
        let err = h
            .service
            .generate_initial_draft(handle.clone(), vec![file("scene.jpg")])
            .await
            .unwrap_err();
        assert!(matches!(err, ReportError::Generation(_)));

        let view = h.service.view(&handle).await;
        assert_eq!(view.state, ReportState::NoReport);
        assert!(!view.draft_generated);
        assert!(h.audit.list_for_report(&report_id).await.unwrap().is_empty());

        // The officer can try again.
        h.service
            .generate_initial_draft(handle, vec![file("scene.jpg")])
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_identical_edit_is_not_logged() {
        let h = harness().await;
        let (token, report_id) = h.service.start_session(officer()).await.unwrap();
        let handle = h.service.session(&token).unwrap();

        h.generator.push_response(Ok("Draft text".into()));
        h.service
            .generate_initial_draft(handle.clone(), vec![file("scene.jpg")])
            .await
            .unwrap();

        let edit = h
            .service
            .save_manual_edit(handle, "Draft text".to_string())
            .await
            .unwrap();
        assert_eq!(
            edit,
            EditOutcome {
                changed: false,
                log_id: None
            }
        );
        assert_eq!(count_of(&h.audit, &report_id, ChangeType::ManualEdit).await, 0);
    }

    #[tokio::test]
    async fn test_audio_correction_replaces_draft() {
        let h = harness().await;
        let (token, report_id) = h.service.start_session(officer()).await.unwrap();
        let handle = h.service.session(&token).unwrap();

        h.generator.push_response(Ok("First draft".into()));
        h.generator.push_response(Ok("Revised draft".into()));
        h.service
            .generate_initial_draft(handle.clone(), vec![file("bodycam.mp4")])
            .await
            .unwrap();

        let audio = EvidenceFile::audio("fix.wav", vec![1]).unwrap();
        let revised = h
            .service
            .apply_audio_correction(handle.clone(), audio)
            .await
            .unwrap();
        assert_eq!(revised.draft, "Revised draft");
        assert_eq!(h.service.view(&handle).await.current_draft, "Revised draft");

        let call = &h.generator.calls()[1];
        assert_eq!(call.file_names, vec!["fix.wav"]);
        assert!(call.instructions.contains("First draft"));

        let entries = h.audit.list_for_report(&report_id).await.unwrap();
        assert_eq!(
            entries[1].detail,
            ChangePayload::MarkerOnly("Correction audio: fix.wav".into())
        );
    }

    #[tokio::test]
    async fn test_failed_correction_keeps_draft() {
        let h = harness().await;
        let (token, report_id) = h.service.start_session(officer()).await.unwrap();
        let handle = h.service.session(&token).unwrap();

        h.generator.push_response(Ok("First draft".into()));
        h.generator.push_response(Err(GenerationError::Timeout(300)));
        h.service
            .generate_initial_draft(handle.clone(), vec![file("bodycam.mp4")])
            .await
            .unwrap();

        let audio = EvidenceFile::audio("fix.mp3", vec![1]).unwrap();
        assert!(h
            .service
            .apply_audio_correction(handle.clone(), audio)
            .await
            .is_err());

        let view = h.service.view(&handle).await;
        assert_eq!(view.state, ReportState::DraftReady);
        assert_eq!(view.current_draft, "First draft");
        assert_eq!(h.audit.list_for_report(&report_id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_second_initial_draft_rejected() {
        let h = harness().await;
        let (token, _) = h.service.start_session(officer()).await.unwrap();
        let handle = h.service.session(&token).unwrap();

        h.service
            .generate_initial_draft(handle.clone(), vec![file("a.png")])
            .await
            .unwrap();
        let err = h
            .service
            .generate_initial_draft(handle, vec![file("b.png")])
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReportError::Transition(TransitionError::DraftAlreadyGenerated)
        ));
    }

    #[tokio::test]
    async fn test_evidence_count_limits() {
        let h = harness().await;
        let (token, _) = h.service.start_session(officer()).await.unwrap();
        let handle = h.service.session(&token).unwrap();

        assert!(matches!(
            h.service
                .generate_initial_draft(handle.clone(), vec![])
                .await,
            Err(ReportError::NoEvidence)
        ));

        let too_many = (0..4).map(|i| file(&format!("{i}.jpg"))).collect();
        assert!(matches!(
            h.service.generate_initial_draft(handle, too_many).await,
            Err(ReportError::TooManyFiles(3))
        ));
        assert!(h.generator.calls().is_empty());
    }

    #[tokio::test]
    async fn test_finalize_twice_appends_once() {
        let h = harness().await;
        let (token, report_id) = h.service.start_session(officer()).await.unwrap();
        let handle = h.service.session(&token).unwrap();
        h.service
            .generate_initial_draft(handle.clone(), vec![file("a.png")])
            .await
            .unwrap();

        h.service
            .finalize(token.clone(), handle.clone())
            .await
            .unwrap();
        let err = h.service.finalize(token, handle).await.unwrap_err();
        assert!(matches!(
            err,
            ReportError::Transition(TransitionError::AlreadyFinalized)
        ));
        assert_eq!(
            count_of(&h.audit, &report_id, ChangeType::FinalAffirmation).await,
            1
        );
    }

    #[tokio::test]
    async fn test_failed_email_does_not_block_finalize() {
        let pool = create_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        let service = ReportService::new(
            pool.clone(),
            Arc::new(SessionStore::new(Duration::from_secs(3600))),
            Arc::new(MockDraftGenerator::new()),
            Arc::new(MockReportNotifier::failing()),
            3,
        );

        let (token, report_id) = service.start_session(officer()).await.unwrap();
        let handle = service.session(&token).unwrap();
        service
            .generate_initial_draft(handle.clone(), vec![file("a.png")])
            .await
            .unwrap();

        let outcome = service.finalize(token.clone(), handle).await.unwrap();
        assert!(matches!(outcome.email, DeliveryOutcome::Failed(_)));
        assert!(service.session(&token).is_none());
        let audit = AuditLogRepository::new(pool);
        assert_eq!(
            count_of(&audit, &report_id, ChangeType::FinalAffirmation).await,
            1
        );
    }

    /// Never completes a send within any reasonable bound.
    struct StalledNotifier;

    #[async_trait::async_trait]
    impl ReportNotifier for StalledNotifier {
        async fn send(&self, _report: &FinalizedReport) -> DeliveryOutcome {
            tokio::time::sleep(Duration::from_secs(600)).await;
            DeliveryOutcome::Sent
        }
    }

    #[tokio::test]
    async fn test_stalled_email_is_reported_as_failed_delivery() {
        let pool = create_memory_pool().await.unwrap();
        run_migrations(&pool).await.unwrap();
        let service = ReportService::new(
            pool.clone(),
            Arc::new(SessionStore::new(Duration::from_secs(3600))),
            Arc::new(MockDraftGenerator::new()),
            Arc::new(StalledNotifier),
            3,
        )
        .with_delivery_timeout(Duration::from_millis(50));

        let (token, report_id) = service.start_session(officer()).await.unwrap();
        let handle = service.session(&token).unwrap();
        service
            .generate_initial_draft(handle.clone(), vec![file("a.png")])
            .await
            .unwrap();

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            service.finalize(token.clone(), handle),
        )
        .await
        .expect("finalize must not wait on the mail server")
        .unwrap();

        match outcome.email {
            DeliveryOutcome::Failed(reason) => assert!(reason.contains("timed out")),
            other => panic!("expected failed delivery, got {:?}", other),
        }
        assert_eq!(outcome.report_id, report_id);
        assert!(service.session(&token).is_none());

        let entries = AuditLogRepository::new(pool)
            .list_for_report(&report_id)
            .await
            .unwrap();
        assert_eq!(entries.last().map(|e| e.log_id), Some(outcome.log_id));
        assert_eq!(
            entries.last().map(|e| e.change_type),
            Some(ChangeType::FinalAffirmation)
        );
    }

    #[tokio::test]
    async fn test_new_session_gets_new_report_id() {
        let h = harness().await;
        let (first_token, first_id) = h.service.start_session(officer()).await.unwrap();
        assert!(h.service.end_session(&first_token));

        let (_, second_id) = h.service.start_session(officer()).await.unwrap();
        assert_ne!(first_id, second_id);
        assert_eq!(second_id.len(), 8);
    }

    #[tokio::test]
    async fn test_audit_trail_only_shows_own_entries() {
        let h = harness().await;
        let (token, report_id) = h.service.start_session(officer()).await.unwrap();
        let handle = h.service.session(&token).unwrap();
        h.service
            .generate_initial_draft(handle, vec![file("a.png")])
            .await
            .unwrap();

        let own = h.service.audit_trail("1001", &report_id).await.unwrap();
        assert_eq!(own.len(), 1);

        assert!(matches!(
            h.service.audit_trail("2002", &report_id).await,
            Err(ReportError::ReportNotFound(_))
        ));
    }
}
