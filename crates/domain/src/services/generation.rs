//! Draft generation port.
//!
//! A generator takes evidence plus an instruction and returns report text.
//! Each call is stateless from the caller's side: anything staged remotely is
//! released before the call returns.

use std::collections::VecDeque;
use std::sync::Mutex;

use thiserror::Error;

use crate::models::EvidenceFile;

/// Errors surfaced by a draft generator. None of them are retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    #[error("Draft generation is not configured")]
    NotConfigured,

    #[error("Failed to stage evidence file {file}: {reason}")]
    Upload { file: String, reason: String },

    #[error("Evidence file {0} could not be processed by the model service")]
    Processing(String),

    #[error("Generation request failed: {0}")]
    Request(String),

    #[error("Generation timed out after {0}s")]
    Timeout(u64),

    #[error("Evidence file {file} was still processing after {attempts} status checks")]
    NotActivated { file: String, attempts: u32 },

    #[error("Model service rejected the request: {0}")]
    Rejected(String),

    #[error("Model returned no text")]
    EmptyResponse,
}

/// Submits evidence and instructions to a generative model.
#[async_trait::async_trait]
pub trait DraftGenerator: Send + Sync {
    async fn generate(
        &self,
        evidence: &[EvidenceFile],
        instructions: &str,
    ) -> Result<String, GenerationError>;
}

/// A recorded call to [`MockDraftGenerator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationCall {
    pub file_names: Vec<String>,
    pub instructions: String,
}

/// Generator for development and testing.
///
/// Replies with queued responses in order, then falls back to a canned draft
/// that lists the evidence it was given.
#[derive(Debug, Default)]
pub struct MockDraftGenerator {
    responses: Mutex<VecDeque<Result<String, GenerationError>>>,
    calls: Mutex<Vec<GenerationCall>>,
}

impl MockDraftGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the result for a future call.
    pub fn push_response(&self, response: Result<String, GenerationError>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(response);
        }
    }

    /// Calls received so far.
    pub fn calls(&self) -> Vec<GenerationCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl DraftGenerator for MockDraftGenerator {
    async fn generate(
        &self,
        evidence: &[EvidenceFile],
        instructions: &str,
    ) -> Result<String, GenerationError> {
        let file_names: Vec<String> = evidence.iter().map(|f| f.file_name().to_string()).collect();

        tracing::info!(
            files = ?file_names,
            instructions_len = instructions.len(),
            "Mock: generating draft"
        );

        if let Ok(mut calls) = self.calls.lock() {
            calls.push(GenerationCall {
                file_names: file_names.clone(),
                instructions: instructions.to_string(),
            });
        }

        let queued = self.responses.lock().ok().and_then(|mut r| r.pop_front());
        match queued {
            Some(response) => response,
            None => Ok(format!(
                "INCIDENT REPORT (generated from {} evidence file(s): {})",
                file_names.len(),
                file_names.join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn evidence(name: &str) -> EvidenceFile {
        EvidenceFile::new(name, vec![1, 2, 3]).unwrap()
    }

    #[tokio::test]
    async fn test_mock_default_response_lists_files() {
        let generator = MockDraftGenerator::new();
        let text = generator
            .generate(&[evidence("a.jpg"), evidence("b.wav")], "write it")
            .await
            .unwrap();
        assert!(text.contains("a.jpg, b.wav"));

        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].instructions, "write it");
        assert_eq!(calls[0].file_names, vec!["a.jpg", "b.wav"]);
    }

    #[tokio::test]
    async fn test_mock_queued_responses_in_order() {
        let generator = MockDraftGenerator::new();
        generator.push_response(Err(GenerationError::Timeout(300)));
        generator.push_response(Ok("second".to_string()));

        let first = generator.generate(&[evidence("a.png")], "x").await;
        assert_eq!(first, Err(GenerationError::Timeout(300)));

        let second = generator.generate(&[evidence("a.png")], "x").await;
        assert_eq!(second.unwrap(), "second");
    }

    #[test]
    fn test_error_messages() {
        let err = GenerationError::Upload {
            file: "clip.mp4".to_string(),
            reason: "quota exceeded".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Failed to stage evidence file clip.mp4: quota exceeded"
        );
        assert_eq!(
            GenerationError::Timeout(300).to_string(),
            "Generation timed out after 300s"
        );
        assert_eq!(
            GenerationError::NotActivated {
                file: "clip.mp4".to_string(),
                attempts: 90
            }
            .to_string(),
            "Evidence file clip.mp4 was still processing after 90 status checks"
        );
    }
}
