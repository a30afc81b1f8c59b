//! Email delivery of finalized reports.
//!
//! Supports two providers:
//! - `smtp`: STARTTLS submission with the configured account as sender
//! - `console`: Logs the message instead of sending (development)

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use domain::services::{DeliveryOutcome, FinalizedReport, ReportNotifier};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::{error, info, warn};

use crate::config::EmailConfig;

/// Errors that can occur while building or sending a message.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Message(String),

    #[error("Failed to send email: {0}")]
    SendFailed(String),
}

/// Sends finalized report copies to the affirming officer.
#[derive(Clone)]
pub struct EmailNotifier {
    config: Arc<EmailConfig>,
}

impl EmailNotifier {
    pub fn new(config: EmailConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    fn build_message(&self, report: &FinalizedReport) -> Result<Message, EmailError> {
        let sender: Address = self
            .config
            .smtp_username
            .trim()
            .parse()
            .map_err(|_| EmailError::InvalidAddress(self.config.smtp_username.clone()))?;
        let recipient: Address = report
            .recipient_email
            .parse()
            .map_err(|_| EmailError::InvalidAddress(report.recipient_email.clone()))?;

        Message::builder()
            .from(Mailbox::new(Some(self.config.sender_name.clone()), sender))
            .to(Mailbox::new(Some(report.officer_name.clone()), recipient))
            .subject(report.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(report.body(Utc::now().naive_utc()))
            .map_err(|e| EmailError::Message(e.to_string()))
    }

    async fn send_smtp(&self, report: &FinalizedReport) -> Result<(), EmailError> {
        let message = self.build_message(report)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)
            .map_err(|e| EmailError::SendFailed(e.to_string()))?
            .port(self.config.smtp_port)
            .timeout(Some(Duration::from_secs(self.config.send_timeout_secs)))
            .credentials(Credentials::new(
                self.config.smtp_username.trim().to_string(),
                self.config.smtp_password.clone(),
            ))
            .build();

        transport
            .send(message)
            .await
            .map_err(|e| EmailError::SendFailed(e.to_string()))?;
        Ok(())
    }

    fn send_console(&self, report: &FinalizedReport) {
        info!(
            to = %report.recipient_email,
            subject = %report.subject(),
            from_name = %self.config.sender_name,
            log_id = report.log_id,
            "Finalized report email (console provider)"
        );
        info!(body = %report.body(Utc::now().naive_utc()), "Finalized report email body");
    }
}

#[async_trait::async_trait]
impl ReportNotifier for EmailNotifier {
    async fn send(&self, report: &FinalizedReport) -> DeliveryOutcome {
        let outcome = if self.config.provider == "console" {
            self.send_console(report);
            DeliveryOutcome::Sent
        } else if !self.config.has_credentials() {
            warn!(
                report_id = %report.report_id,
                "SMTP credentials not configured, skipping finalized report email"
            );
            DeliveryOutcome::Skipped
        } else {
            match self.send_smtp(report).await {
                Ok(()) => {
                    info!(
                        report_id = %report.report_id,
                        to = %report.recipient_email,
                        "Finalized report emailed"
                    );
                    DeliveryOutcome::Sent
                }
                Err(e) => {
                    error!(
                        report_id = %report.report_id,
                        to = %report.recipient_email,
                        error = %e,
                        "Failed to email finalized report"
                    );
                    DeliveryOutcome::Failed(e.to_string())
                }
            }
        };

        metrics::counter!("report_emails_total", "outcome" => outcome.as_str()).increment(1);
        outcome
    }
}
