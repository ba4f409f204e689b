//! Pipeline orchestration.
//!
//! Control flow: preconditions -> size gate -> split plan -> chunk
//! export -> per-chunk transcription -> combine -> cleanup. Chunks are
//! exported and transcribed strictly sequentially in index order; the
//! first chunk failure aborts the whole operation and prior chunk texts
//! are discarded. Temporary files are removed on every exit path.

use std::fs;
use std::path::{Path, PathBuf};

use crate::media::{MediaFile, MediaToolkit};
use crate::split::{compute_plan, ChunkSpan};
use crate::transcribe::SpeechClient;

use super::cleanup;
use super::errors::PipelineError;
use super::progress::ProgressSender;

/// Files at or below this size are uploaded in one piece.
pub const DIRECT_UPLOAD_LIMIT_BYTES: u64 = 25 * 1024 * 1024;

/// Byte ceiling each exported chunk should stay under.
pub const CHUNK_SIZE_LIMIT_BYTES: u64 = 20 * 1024 * 1024;

/// Margin against encoding-size unpredictability.
pub const CHUNK_SAFETY_FACTOR: f64 = 0.9;

/// Bitrate for the first export attempt of each chunk.
pub const BITRATE_HIGH: &str = "128k";

/// Bitrate for the single re-export of an oversized chunk.
pub const BITRATE_LOW: &str = "64k";

/// Transcription model identifier.
pub const DEFAULT_MODEL: &str = "whisper-1";

/// Accepted input extensions.
pub const SUPPORTED_EXTENSIONS: &[&str] =
    &[".mp3", ".mp4", ".mpeg", ".mpga", ".m4a", ".wav", ".webm"];

/// Tunable pipeline constants.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub direct_upload_limit_bytes: u64,
    pub chunk_size_limit_bytes: u64,
    pub safety_factor: f64,
    pub bitrate_high: String,
    pub bitrate_low: String,
    pub model: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            direct_upload_limit_bytes: DIRECT_UPLOAD_LIMIT_BYTES,
            chunk_size_limit_bytes: CHUNK_SIZE_LIMIT_BYTES,
            safety_factor: CHUNK_SAFETY_FACTOR,
            bitrate_high: BITRATE_HIGH.to_string(),
            bitrate_low: BITRATE_LOW.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

/// The chunked transcription pipeline.
///
/// Intended to run on a worker thread; all calls block. One
/// transcription at a time - there is no cancellation once `process()`
/// starts.
pub struct TranscriptionPipeline {
    config: PipelineConfig,
    toolkit: Box<dyn MediaToolkit>,
    client: Box<dyn SpeechClient>,
}

impl TranscriptionPipeline {
    /// Create a pipeline from its collaborators.
    pub fn new(
        config: PipelineConfig,
        toolkit: Box<dyn MediaToolkit>,
        client: Box<dyn SpeechClient>,
    ) -> Self {
        Self {
            config,
            toolkit,
            client,
        }
    }

    /// Transcribe the file at `path`.
    ///
    /// Returns the transcript text, or a tagged error whose `Display`
    /// is the user-facing message. Progress updates are emitted into
    /// `progress` when provided; they are never required for
    /// correctness.
    pub fn process(
        &self,
        path: &Path,
        progress: Option<&ProgressSender>,
    ) -> Result<String, PipelineError> {
        report(progress, "Processing file...", 10);

        if path.as_os_str().is_empty() {
            return Err(PipelineError::MissingInput);
        }
        if !path.exists() {
            return Err(PipelineError::file_not_found(path.display().to_string()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{}", e.to_ascii_lowercase()))
            .unwrap_or_default();
        if !SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(PipelineError::unsupported_format(
                extension,
                SUPPORTED_EXTENSIONS,
            ));
        }

        let size_bytes = fs::metadata(path)
            .map_err(|e| PipelineError::io_error("reading file size", e))?
            .len();

        if size_bytes <= self.config.direct_upload_limit_bytes {
            tracing::debug!(size_bytes, "file fits the direct upload limit");
            report(progress, "Transcribing audio...", 30);
            let text = self.client.transcribe_file(path, &self.config.model)?;
            report(progress, "Complete!", 100);
            return Ok(text);
        }

        self.process_chunked(path, progress)
    }

    /// Split, transcribe, and recombine an oversized file.
    fn process_chunked(
        &self,
        path: &Path,
        progress: Option<&ProgressSender>,
    ) -> Result<String, PipelineError> {
        report(progress, "File is large, splitting into chunks...", 10);

        if !self.toolkit.is_available() {
            return Err(PipelineError::ToolUnavailable);
        }

        let media = MediaFile::probe(path, self.toolkit.as_ref())
            .map_err(PipelineError::split_failed)?;

        let plan = compute_plan(
            media.size_bytes,
            media.duration_ms,
            self.config.chunk_size_limit_bytes,
            self.config.safety_factor,
        );
        tracing::info!(
            size_bytes = media.size_bytes,
            duration_ms = media.duration_ms,
            chunk_count = plan.chunk_count,
            chunk_duration_ms = plan.chunk_duration_ms,
            "splitting file for upload"
        );

        let staging = tempfile::Builder::new()
            .prefix("whispera-chunks-")
            .tempdir()
            .map_err(|e| PipelineError::io_error("creating chunk directory", e))?;

        let result =
            self.transcribe_spans(path, &plan.spans(media.duration_ms), staging.path(), progress);

        // Every exit path ends up here; failures inside close() are
        // logged and discarded.
        cleanup::remove_dir_best_effort(staging);

        result
    }

    fn transcribe_spans(
        &self,
        source: &Path,
        spans: &[ChunkSpan],
        staging: &Path,
        progress: Option<&ProgressSender>,
    ) -> Result<String, PipelineError> {
        let mut chunks = Vec::with_capacity(spans.len());
        for span in spans {
            let chunk_path = staging.join(format!("chunk_{}.mp3", span.index));
            self.export_chunk(source, span, &chunk_path)?;
            chunks.push(chunk_path);
        }

        let total = chunks.len();
        let mut texts = Vec::with_capacity(total);
        for (i, chunk) in chunks.iter().enumerate() {
            let percent = 20 + ((i as f64 / total as f64) * 70.0) as u8;
            report(
                progress,
                format!("Transcribing chunk {} of {}...", i + 1, total),
                percent,
            );
            texts.push(self.client.transcribe_file(chunk, &self.config.model)?);
        }

        report(progress, "Combining transcriptions...", 95);
        let combined = texts.join("\n\n");
        report(progress, "Complete!", 100);

        Ok(combined)
    }

    /// Export one chunk, re-exporting once at the lower bitrate if the
    /// result exceeds the ceiling. No further retries - best effort.
    fn export_chunk(
        &self,
        source: &Path,
        span: &ChunkSpan,
        chunk_path: &Path,
    ) -> Result<(), PipelineError> {
        self.toolkit
            .export_segment(
                source,
                span.start_ms,
                span.end_ms,
                &self.config.bitrate_high,
                chunk_path,
            )
            .map_err(PipelineError::split_failed)?;

        let exported = fs::metadata(chunk_path)
            .map_err(|e| PipelineError::io_error("reading exported chunk size", e))?
            .len();

        if exported > self.config.chunk_size_limit_bytes {
            tracing::debug!(
                chunk = span.index,
                exported,
                "chunk exceeds ceiling, re-exporting at {}",
                self.config.bitrate_low
            );
            self.toolkit
                .export_segment(
                    source,
                    span.start_ms,
                    span.end_ms,
                    &self.config.bitrate_low,
                    chunk_path,
                )
                .map_err(PipelineError::split_failed)?;
        }

        Ok(())
    }
}

fn report(progress: Option<&ProgressSender>, message: impl Into<String>, percent: u8) {
    if let Some(sender) = progress {
        sender.send(message, percent);
    }
}
