//! In-progress report session and its state machine.

use serde::Serialize;
use thiserror::Error;

use super::officer::OfficerIdentity;

/// Lifecycle state of a report within one authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportState {
    /// Logged in, no draft yet.
    NoReport,
    /// Initial draft generation in flight.
    DraftPending,
    /// A draft exists and can be edited, corrected or finalized.
    DraftReady,
    /// An audio correction is being merged into the draft.
    CorrectionPending,
    /// Affirmed and logged. The session is being torn down.
    Finalized,
}

impl ReportState {
    pub fn draft_generated(&self) -> bool {
        matches!(
            self,
            ReportState::DraftReady | ReportState::CorrectionPending | ReportState::Finalized
        )
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, ReportState::DraftPending | ReportState::CorrectionPending)
    }
}

/// Rejected state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("A draft has already been generated for this report")]
    DraftAlreadyGenerated,

    #[error("No draft has been generated yet")]
    NoDraft,

    #[error("A generation request is already in progress for this report")]
    GenerationInProgress,

    #[error("This report has already been finalized")]
    AlreadyFinalized,
}

/// Transient state of one officer's report. Never persisted; the audit trail
/// is the only durable record.
#[derive(Debug, Clone)]
pub struct ReportSession {
    report_id: String,
    officer: OfficerIdentity,
    current_draft: String,
    state: ReportState,
}

impl ReportSession {
    pub fn new(report_id: impl Into<String>, officer: OfficerIdentity) -> Self {
        Self {
            report_id: report_id.into(),
            officer,
            current_draft: String::new(),
            state: ReportState::NoReport,
        }
    }

    pub fn report_id(&self) -> &str {
        &self.report_id
    }

    pub fn officer(&self) -> &OfficerIdentity {
        &self.officer
    }

    pub fn current_draft(&self) -> &str {
        &self.current_draft
    }

    pub fn state(&self) -> ReportState {
        self.state
    }

    pub fn draft_generated(&self) -> bool {
        self.state.draft_generated()
    }

    /// NoReport -> DraftPending.
    pub fn begin_initial_draft(&mut self) -> Result<(), TransitionError> {
        match self.state {
            ReportState::NoReport => {
                self.state = ReportState::DraftPending;
                Ok(())
            }
            ReportState::DraftReady => Err(TransitionError::DraftAlreadyGenerated),
            ReportState::DraftPending | ReportState::CorrectionPending => {
                Err(TransitionError::GenerationInProgress)
            }
            ReportState::Finalized => Err(TransitionError::AlreadyFinalized),
        }
    }

    /// DraftPending -> DraftReady.
    pub fn complete_initial_draft(&mut self, draft: String) -> Result<(), TransitionError> {
        if self.state != ReportState::DraftPending {
            return Err(TransitionError::NoDraft);
        }
        self.current_draft = draft;
        self.state = ReportState::DraftReady;
        Ok(())
    }

    /// DraftReady -> CorrectionPending. Returns the draft the correction is
    /// merged into.
    pub fn begin_correction(&mut self) -> Result<String, TransitionError> {
        self.ensure_ready()?;
        self.state = ReportState::CorrectionPending;
        Ok(self.current_draft.clone())
    }

    /// CorrectionPending -> DraftReady with the revised text.
    pub fn complete_correction(&mut self, revised: String) -> Result<(), TransitionError> {
        if self.state != ReportState::CorrectionPending {
            return Err(TransitionError::NoDraft);
        }
        self.current_draft = revised;
        self.state = ReportState::DraftReady;
        Ok(())
    }

    /// Undoes a pending transition, leaving the draft untouched.
    pub fn abort_pending(&mut self) {
        self.state = match self.state {
            ReportState::DraftPending => ReportState::NoReport,
            ReportState::CorrectionPending => ReportState::DraftReady,
            other => other,
        };
    }

    /// Whether `text` would change the draft. Identical text is not an edit.
    pub fn edit_changes_draft(&self, text: &str) -> Result<bool, TransitionError> {
        self.ensure_ready()?;
        Ok(self.current_draft != text)
    }

    /// DraftReady -> DraftReady with manually edited text.
    pub fn apply_manual_edit(&mut self, text: String) -> Result<(), TransitionError> {
        self.ensure_ready()?;
        self.current_draft = text;
        Ok(())
    }

    /// The text to affirm, if the report can be finalized.
    pub fn final_text(&self) -> Result<&str, TransitionError> {
        self.ensure_ready()?;
        Ok(&self.current_draft)
    }

    /// DraftReady -> Finalized, once the affirmation has been logged.
    pub fn mark_finalized(&mut self) -> Result<(), TransitionError> {
        self.ensure_ready()?;
        self.state = ReportState::Finalized;
        Ok(())
    }

    fn ensure_ready(&self) -> Result<(), TransitionError> {
        match self.state {
            ReportState::DraftReady => Ok(()),
            ReportState::NoReport => Err(TransitionError::NoDraft),
            ReportState::DraftPending | ReportState::CorrectionPending => {
                Err(TransitionError::GenerationInProgress)
            }
            ReportState::Finalized => Err(TransitionError::AlreadyFinalized),
        }
    }
}
