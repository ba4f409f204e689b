//! Remote speech-to-text client.
//!
//! The pipeline talks to the service through the [`SpeechClient`] trait;
//! [`WhisperClient`] is the OpenAI-backed implementation. Remote
//! failures are categorized so the pipeline can surface distinct
//! user-facing messages while retaining the underlying detail.

mod client;

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub use client::{WhisperClient, DEFAULT_BASE_URL};

/// Errors from the remote transcription service.
#[derive(Error, Debug)]
pub enum TranscribeError {
    /// No credential configured; reported before any network call.
    #[error("OpenAI API key not set. Please enter your API key in the settings.")]
    MissingApiKey,

    /// The service rejected the upload (HTTP 400).
    #[error("Invalid file format or file is corrupted. Details: {detail}")]
    BadInput { detail: String },

    /// The credential was rejected (HTTP 401).
    #[error("Invalid API key. Details: {detail}")]
    AuthFailed { detail: String },

    /// Any other service-reported failure.
    #[error("Transcription service error (status {status}): {detail}")]
    Service { status: u16, detail: String },

    /// The request never got a response.
    #[error("Error during transcription: {0}")]
    Network(String),

    /// The local file could not be read for upload.
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A client that can transcribe one media file per call.
pub trait SpeechClient: Send + Sync {
    /// Transcribe the file at `path` with the given model, returning the
    /// plain transcript text.
    fn transcribe_file(&self, path: &Path, model: &str) -> Result<String, TranscribeError>;
}
