//! Chunked transcription pipeline.
//!
//! Given a media file path, decides whether splitting is required,
//! computes a splitting plan, materializes chunks through the media
//! toolkit, transcribes each chunk with the remote client, joins the
//! results in order, and removes every temporary file on all exit paths.
//!
//! # Example
//!
//! ```ignore
//! use whispera_core::media::FfmpegToolkit;
//! use whispera_core::pipeline::{progress_channel, PipelineConfig, TranscriptionPipeline};
//! use whispera_core::transcribe::WhisperClient;
//!
//! let pipeline = TranscriptionPipeline::new(
//!     PipelineConfig::default(),
//!     Box::new(FfmpegToolkit::new(None)),
//!     Box::new(WhisperClient::new(Some(api_key))),
//! );
//!
//! let (tx, rx) = progress_channel(64);
//! let text = pipeline.process(&path, Some(&tx))?;
//! ```

mod cleanup;
mod errors;
mod progress;
mod runner;

pub use errors::PipelineError;
pub use progress::{progress_channel, ProgressSender, ProgressUpdate};
pub use runner::{
    PipelineConfig, TranscriptionPipeline, BITRATE_HIGH, BITRATE_LOW, CHUNK_SAFETY_FACTOR,
    CHUNK_SIZE_LIMIT_BYTES, DEFAULT_MODEL, DIRECT_UPLOAD_LIMIT_BYTES, SUPPORTED_EXTENSIONS,
};
