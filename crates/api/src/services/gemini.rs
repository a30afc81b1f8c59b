//! Gemini REST client for draft generation.
//!
//! A generate call stages every evidence file through the Files API, waits
//! for each to become `ACTIVE`, issues one `generateContent` request that
//! references the staged files, and deletes every staged file before
//! returning. Nothing is retried.

use std::time::Duration;

use domain::models::EvidenceFile;
use domain::services::{DraftGenerator, GenerationError};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::config::GenerationConfig;

const API_KEY_HEADER: &str = "x-goog-api-key";
const UPLOAD_URL_HEADER: &str = "x-goog-upload-url";

/// Draft generator backed by the Gemini API.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    timeout_secs: u64,
    poll_interval: Duration,
    max_poll_attempts: u32,
}

/// A file staged with the Files API.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RemoteFile {
    /// Resource name, `files/{id}`.
    name: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    state: FileState,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum FileState {
    #[default]
    StateUnspecified,
    Processing,
    Active,
    Failed,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    file: RemoteFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<Content>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

impl GeminiClient {
    pub fn new(config: &GenerationConfig) -> Result<Self, GenerationError> {
        if config.api_key.trim().is_empty() {
            return Err(GenerationError::NotConfigured);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GenerationError::Request(e.to_string()))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout_secs: config.timeout_secs,
            poll_interval: Duration::from_millis(config.poll_interval_ms),
            max_poll_attempts: config.max_poll_attempts,
        })
    }

    /// Uploads, waits for activation, and generates. Every file that reached
    /// the service is pushed onto `staged` so the caller can release it.
    async fn stage_and_generate(
        &self,
        evidence: &[EvidenceFile],
        instructions: &str,
        staged: &mut Vec<RemoteFile>,
    ) -> Result<String, GenerationError> {
        for file in evidence {
            let remote = self.upload(file).await?;
            staged.push(remote);
        }

        let mut active = Vec::with_capacity(staged.len());
        for (remote, file) in staged.iter().zip(evidence) {
            active.push(self.wait_until_active(remote.clone(), file.file_name()).await?);
        }

        self.generate_content(&active, instructions).await
    }

    async fn upload(&self, file: &EvidenceFile) -> Result<RemoteFile, GenerationError> {
        let upload_error = |reason: String| GenerationError::Upload {
            file: file.file_name().to_string(),
            reason,
        };

        let start = self
            .http
            .post(format!("{}/upload/v1beta/files", self.base_url))
            .header(API_KEY_HEADER, &self.api_key)
            .header("X-Goog-Upload-Protocol", "resumable")
            .header("X-Goog-Upload-Command", "start")
            .header("X-Goog-Upload-Header-Content-Length", file.size().to_string())
            .header("X-Goog-Upload-Header-Content-Type", file.mime_type())
            .json(&json!({ "file": { "display_name": file.file_name() } }))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !start.status().is_success() {
            return Err(upload_error(error_message(start).await));
        }

        let upload_url = start
            .headers()
            .get(UPLOAD_URL_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| upload_error("missing upload session URL".to_string()))?;

        let finish = self
            .http
            .post(upload_url)
            .header("X-Goog-Upload-Offset", "0")
            .header("X-Goog-Upload-Command", "upload, finalize")
            .body(file.data().to_vec())
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !finish.status().is_success() {
            return Err(upload_error(error_message(finish).await));
        }

        let uploaded: UploadResponse = finish
            .json()
            .await
            .map_err(|e| upload_error(format!("malformed upload response: {}", e)))?;

        debug!(
            file = %file.file_name(),
            remote = %uploaded.file.name,
            bytes = file.size(),
            "Evidence staged"
        );
        Ok(uploaded.file)
    }

    async fn wait_until_active(
        &self,
        mut remote: RemoteFile,
        file_name: &str,
    ) -> Result<RemoteFile, GenerationError> {
        let mut attempts = 0;
        loop {
            match remote.state {
                FileState::Active => return Ok(remote),
                FileState::Failed => {
                    return Err(GenerationError::Processing(file_name.to_string()))
                }
                _ => {}
            }

            if attempts >= self.max_poll_attempts {
                return Err(GenerationError::NotActivated {
                    file: file_name.to_string(),
                    attempts,
                });
            }
            attempts += 1;
            tokio::time::sleep(self.poll_interval).await;

            let response = self
                .http
                .get(format!("{}/v1beta/{}", self.base_url, remote.name))
                .header(API_KEY_HEADER, &self.api_key)
                .send()
                .await
                .map_err(|e| self.transport_error(e))?;

            if !response.status().is_success() {
                return Err(GenerationError::Rejected(error_message(response).await));
            }

            remote = response
                .json()
                .await
                .map_err(|e| GenerationError::Request(format!("malformed file status: {}", e)))?;
        }
    }

    async fn generate_content(
        &self,
        files: &[RemoteFile],
        instructions: &str,
    ) -> Result<String, GenerationError> {
        let mut parts: Vec<serde_json::Value> = files
            .iter()
            .map(|f| {
                json!({
                    "fileData": { "mimeType": f.mime_type, "fileUri": f.uri }
                })
            })
            .collect();
        parts.push(json!({ "text": instructions }));

        let response = self
            .http
            .post(format!(
                "{}/v1beta/models/{}:generateContent",
                self.base_url, self.model
            ))
            .header(API_KEY_HEADER, &self.api_key)
            .json(&json!({ "contents": [{ "role": "user", "parts": parts }] }))
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !response.status().is_success() {
            return Err(GenerationError::Rejected(error_message(response).await));
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::Request(format!("malformed response: {}", e)))?;

        extract_text(body)
    }

    /// Best effort; a leftover staged file expires on the service side.
    async fn delete(&self, remote: &RemoteFile) {
        let result = self
            .http
            .delete(format!("{}/v1beta/{}", self.base_url, remote.name))
            .header(API_KEY_HEADER, &self.api_key)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                debug!(remote = %remote.name, "Staged evidence deleted");
            }
            Ok(response) => {
                warn!(remote = %remote.name, status = %response.status(), "Failed to delete staged evidence");
            }
            Err(e) => {
                warn!(remote = %remote.name, error = %e, "Failed to delete staged evidence");
            }
        }
    }

    fn transport_error(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout(self.timeout_secs)
        } else {
            GenerationError::Request(err.to_string())
        }
    }
}

#[async_trait::async_trait]
impl DraftGenerator for GeminiClient {
    async fn generate(
        &self,
        evidence: &[EvidenceFile],
        instructions: &str,
    ) -> Result<String, GenerationError> {
        let mut staged = Vec::with_capacity(evidence.len());
        let result = self
            .stage_and_generate(evidence, instructions, &mut staged)
            .await;

        for remote in &staged {
            self.delete(remote).await;
        }

        match &result {
            Ok(text) => info!(
                model = %self.model,
                files = evidence.len(),
                chars = text.len(),
                "Draft generated"
            ),
            Err(e) => warn!(model = %self.model, files = evidence.len(), error = %e, "Draft generation failed"),
        }
        result
    }
}

/// Concatenates the text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String, GenerationError> {
    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(GenerationError::Rejected(format!("prompt blocked: {}", reason)));
    }

    let Some(candidate) = response.candidates.into_iter().next() else {
        return Err(GenerationError::EmptyResponse);
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return match candidate.finish_reason.as_deref() {
            Some(reason) if reason != "STOP" => Err(GenerationError::Rejected(format!(
                "generation stopped: {}",
                reason
            ))),
            _ => Err(GenerationError::EmptyResponse),
        };
    }

    Ok(text)
}

async fn error_message(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
        .map(|envelope| envelope.error.message)
        .unwrap_or(body);
    format!("{}: {}", status, message)
}
