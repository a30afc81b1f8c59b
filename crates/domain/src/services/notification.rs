//! Finalized report notification.
//!
//! Provides the message format and the abstraction used to deliver a copy of
//! an affirmed report to the officer.

use std::sync::Mutex;

use chrono::NaiveDateTime;

use crate::models::TIMESTAMP_FORMAT;

/// Result of a delivery attempt. Never an error: finalization does not
/// depend on the email arriving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// Message was handed to the mail server.
    Sent,
    /// Mail credentials are not configured.
    Skipped,
    /// Delivery failed (but was non-blocking).
    Failed(String),
}

impl DeliveryOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, DeliveryOutcome::Sent)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryOutcome::Sent => "sent",
            DeliveryOutcome::Skipped => "skipped",
            DeliveryOutcome::Failed(_) => "failed",
        }
    }
}

/// Everything the notification embeds about an affirmed report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedReport {
    pub recipient_email: String,
    pub officer_name: String,
    pub report_id: String,
    pub report_text: String,
    /// Audit log id of the final affirmation, quoted as provenance.
    pub log_id: i64,
}

impl FinalizedReport {
    pub fn subject(&self) -> String {
        format!("FINALIZED Incident Report - ID: {}", self.report_id)
    }

    /// Plain-text body stamped with the send time.
    pub fn body(&self, sent_at: NaiveDateTime) -> String {
        format!(
            r#"Dear Officer {name},

This is the FINALIZED version of Incident Report {report_id} that you affirmed.

--------------------------------------------------
{report_text}
--------------------------------------------------

Administrative Notes:
- Final Audit Log ID: {log_id}
- Sent Date: {sent_at}

Please save this email for your records. This is an automated message.
"#,
            name = self.officer_name,
            report_id = self.report_id,
            report_text = self.report_text,
            log_id = self.log_id,
            sent_at = sent_at.format(TIMESTAMP_FORMAT),
        )
    }
}

/// Delivers finalized reports.
#[async_trait::async_trait]
pub trait ReportNotifier: Send + Sync {
    async fn send(&self, report: &FinalizedReport) -> DeliveryOutcome;
}

/// Mock notifier for development and testing.
///
/// Records reports instead of sending them.
#[derive(Debug, Default)]
pub struct MockReportNotifier {
    /// Whether to simulate failures for testing.
    pub simulate_failure: bool,
    sent: Mutex<Vec<FinalizedReport>>,
}

impl MockReportNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            sent: Mutex::default(),
        }
    }

    pub fn sent(&self) -> Vec<FinalizedReport> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl ReportNotifier for MockReportNotifier {
    async fn send(&self, report: &FinalizedReport) -> DeliveryOutcome {
        if self.simulate_failure {
            tracing::warn!(
                report_id = %report.report_id,
                "Mock report notifier simulating failure"
            );
            return DeliveryOutcome::Failed("Simulated failure".to_string());
        }

        tracing::info!(
            report_id = %report.report_id,
            to = %report.recipient_email,
            log_id = report.log_id,
            "Mock: Would send finalized report"
        );

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(report.clone());
        }
        DeliveryOutcome::Sent
    }
}
