//! OpenAI Whisper API client.

use std::fs;
use std::path::Path;

use reqwest::blocking::multipart;

use super::{SpeechClient, TranscribeError};

/// Default API endpoint root.
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Blocking client for the `/audio/transcriptions` endpoint.
///
/// One request per call, no retries. The pipeline runs on a worker
/// thread, so the upload may block for as long as it takes; the default
/// reqwest timeout is disabled for that reason.
pub struct WhisperClient {
    http: reqwest::blocking::Client,
    api_key: Option<String>,
    base_url: String,
}

impl WhisperClient {
    /// Create a client with the given credential (may be absent).
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Create a client against a non-default endpoint root.
    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(None)
            .build()
            .expect("failed to build HTTP client");

        Self {
            http,
            api_key,
            base_url: base_url.into(),
        }
    }

    /// Replace the credential.
    pub fn set_api_key(&mut self, api_key: Option<String>) {
        self.api_key = api_key;
    }

    /// Whether a non-empty credential is configured.
    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    fn api_key(&self) -> Result<&str, TranscribeError> {
        self.api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(TranscribeError::MissingApiKey)
    }
}

impl SpeechClient for WhisperClient {
    fn transcribe_file(&self, path: &Path, model: &str) -> Result<String, TranscribeError> {
        let api_key = self.api_key()?;

        let bytes = fs::read(path).map_err(|source| TranscribeError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string());

        let form = multipart::Form::new()
            .text("model", model.to_string())
            .text("response_format", "text")
            .part("file", multipart::Part::bytes(bytes).file_name(file_name));

        let url = format!("{}/audio/transcriptions", self.base_url);
        tracing::debug!(model, file = %path.display(), "sending audio to transcription API");

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .map_err(|e| TranscribeError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .unwrap_or_else(|_| "unknown error".to_string());
            let detail = extract_api_error(&body);

            return Err(match status.as_u16() {
                400 => TranscribeError::BadInput { detail },
                401 => TranscribeError::AuthFailed { detail },
                code => TranscribeError::Service {
                    status: code,
                    detail,
                },
            });
        }

        let transcript = response
            .text()
            .map_err(|e| TranscribeError::Network(e.to_string()))?;

        tracing::debug!(chars = transcript.len(), "transcription completed");

        Ok(transcript.trim().to_string())
    }
}

/// Pull the human-readable message out of an API error body.
///
/// The API wraps errors as `{"error": {"message": ...}}`; anything else
/// is returned verbatim.
fn extract_api_error(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(|m| m.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| body.trim().to_string())
}
