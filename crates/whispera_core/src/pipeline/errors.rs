//! Error type for the transcription pipeline.
//!
//! Every failure is recovered at the pipeline boundary into one of
//! these variants; the `Display` text is the user-facing message.

use std::io;

use thiserror::Error;

use crate::media::MediaError;
use crate::transcribe::TranscribeError;

/// Tagged failure of a `process()` call.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// No file was selected.
    #[error("Please select an audio or video file.")]
    MissingInput,

    /// The selected file does not exist.
    #[error("File not found. Please select a valid file: {path}")]
    FileNotFound { path: String },

    /// The file extension is not on the allow-list.
    #[error("Unsupported file format '{extension}'. Supported formats: {supported}")]
    UnsupportedFormat {
        extension: String,
        supported: String,
    },

    /// Splitting was required but ffmpeg could not be found.
    #[error(
        "ffmpeg is not installed or not found.\n\n\
         To enable automatic file splitting, please install ffmpeg:\n\n\
         Option 1 (Recommended): download it from https://ffmpeg.org/download.html\n\
           - extract it and add it to PATH, or\n\
           - place the ffmpeg executable next to this application\n\n\
         Option 2: use a package manager (apt, brew, choco, winget)\n\n\
         After installing, restart the application."
    )]
    ToolUnavailable,

    /// Duration probing or chunk export failed.
    #[error("Error splitting audio file: {source}")]
    SplitFailed {
        #[source]
        source: MediaError,
    },

    /// The remote service reported a failure (categorized).
    #[error(transparent)]
    Transcription(#[from] TranscribeError),

    /// File I/O failed outside the media tool.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl PipelineError {
    /// Create a file-not-found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// Create an unsupported-format error.
    pub fn unsupported_format(extension: impl Into<String>, supported: &[&str]) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
            supported: supported.join(", "),
        }
    }

    /// Create a split-failed error.
    pub fn split_failed(source: MediaError) -> Self {
        Self::SplitFailed { source }
    }

    /// Create an I/O error with context.
    pub fn io_error(operation: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            operation: operation.into(),
            source,
        }
    }
}
