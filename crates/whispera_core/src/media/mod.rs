//! Media probing and chunk export through ffmpeg.
//!
//! The pipeline talks to the external tool through the [`MediaToolkit`]
//! trait; [`FfmpegToolkit`] is the subprocess-backed implementation. The
//! resolved tool location is held by the adapter itself rather than
//! read from mutable global state.

mod export;
mod probe;

use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use thiserror::Error;

use crate::tools::{locate_ffmpeg, ToolLocation};

/// Errors from media probing and export.
#[derive(Error, Debug)]
pub enum MediaError {
    /// ffmpeg could not be located.
    #[error("ffmpeg is not available")]
    ToolUnavailable,

    /// The input file does not exist.
    #[error("Source file not found: {0}")]
    SourceNotFound(PathBuf),

    /// The tool process could not be started.
    #[error("Failed to run {tool}: {source}")]
    SpawnFailed {
        tool: String,
        #[source]
        source: io::Error,
    },

    /// The tool ran and reported failure.
    #[error("{tool} failed with exit code {exit_code}: {message}")]
    CommandFailed {
        tool: String,
        exit_code: i32,
        message: String,
    },

    /// The tool's output could not be interpreted.
    #[error("Failed to parse {what}: {message}")]
    ParseError { what: String, message: String },

    /// File I/O error around an export.
    #[error("I/O error in {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: io::Error,
    },
}

impl MediaError {
    pub(crate) fn spawn_failed(tool: impl Into<String>, source: io::Error) -> Self {
        Self::SpawnFailed {
            tool: tool.into(),
            source,
        }
    }

    pub(crate) fn command_failed(
        tool: impl Into<String>,
        exit_code: i32,
        message: impl Into<String>,
    ) -> Self {
        Self::CommandFailed {
            tool: tool.into(),
            exit_code,
            message: message.into(),
        }
    }

    pub(crate) fn parse_error(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ParseError {
            what: what.into(),
            message: message.into(),
        }
    }
}

/// Result type for media operations.
pub type MediaResult<T> = Result<T, MediaError>;

/// A probed media file.
///
/// Read-only view of a file the caller owns; immutable once probed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    pub path: PathBuf,
    pub size_bytes: u64,
    pub duration_ms: u64,
}

impl MediaFile {
    /// Probe a file's size and duration.
    pub fn probe(path: &Path, toolkit: &dyn MediaToolkit) -> MediaResult<Self> {
        let metadata = std::fs::metadata(path).map_err(|source| MediaError::Io {
            operation: format!("reading metadata of {}", path.display()),
            source,
        })?;
        let duration_ms = toolkit.probe_duration_ms(path)?;

        Ok(Self {
            path: path.to_path_buf(),
            size_bytes: metadata.len(),
            duration_ms,
        })
    }
}

/// Operations the pipeline needs from the external media tool.
pub trait MediaToolkit: Send + Sync {
    /// Whether the tool can be invoked at all.
    fn is_available(&self) -> bool;

    /// Total duration of a media file in milliseconds.
    fn probe_duration_ms(&self, path: &Path) -> MediaResult<u64>;

    /// Export the `[start_ms, end_ms)` range of `input` as an mp3 at the
    /// given bitrate (e.g. `"128k"`).
    fn export_segment(
        &self,
        input: &Path,
        start_ms: u64,
        end_ms: u64,
        bitrate: &str,
        output: &Path,
    ) -> MediaResult<()>;
}

/// ffmpeg/ffprobe-backed [`MediaToolkit`].
///
/// Discovery runs lazily on first use and the result is cached for the
/// lifetime of this value (one pipeline invocation).
pub struct FfmpegToolkit {
    hint: Option<PathBuf>,
    location: OnceLock<Option<ToolLocation>>,
}

impl FfmpegToolkit {
    /// Create a toolkit that locates ffmpeg on first use.
    ///
    /// `hint` is an optional user-configured directory or executable
    /// path, checked before the standard locations.
    pub fn new(hint: Option<PathBuf>) -> Self {
        Self {
            hint,
            location: OnceLock::new(),
        }
    }

    /// Create a toolkit with an already-resolved location.
    pub fn with_location(location: ToolLocation) -> Self {
        let cell = OnceLock::new();
        let _ = cell.set(Some(location));
        Self {
            hint: None,
            location: cell,
        }
    }

    fn location(&self) -> Option<&ToolLocation> {
        self.location
            .get_or_init(|| locate_ffmpeg(self.hint.as_deref()))
            .as_ref()
    }
}

impl MediaToolkit for FfmpegToolkit {
    fn is_available(&self) -> bool {
        self.location().is_some()
    }

    fn probe_duration_ms(&self, path: &Path) -> MediaResult<u64> {
        let location = self.location().ok_or(MediaError::ToolUnavailable)?;
        probe::probe_duration_ms(location, path)
    }

    fn export_segment(
        &self,
        input: &Path,
        start_ms: u64,
        end_ms: u64,
        bitrate: &str,
        output: &Path,
    ) -> MediaResult<()> {
        let location = self.location().ok_or(MediaError::ToolUnavailable)?;
        export::export_segment(location, input, start_ms, end_ms, bitrate, output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn probe_with_preset_location_rejects_missing_file() {
        let toolkit = FfmpegToolkit::with_location(ToolLocation::from_command("ffmpeg"));
        let result = toolkit.probe_duration_ms(Path::new("/nonexistent/audio.mp3"));
        assert!(matches!(result, Err(MediaError::SourceNotFound(_))));
    }

    #[test]
    fn export_rejects_missing_input() {
        let dir = tempdir().unwrap();
        let toolkit = FfmpegToolkit::with_location(ToolLocation::from_command("ffmpeg"));
        let result = toolkit.export_segment(
            Path::new("/nonexistent/audio.mp3"),
            0,
            1000,
            "128k",
            &dir.path().join("chunk_1.mp3"),
        );
        assert!(matches!(result, Err(MediaError::SourceNotFound(_))));
    }

    #[test]
    fn media_error_displays_context() {
        let err = MediaError::command_failed("ffmpeg", 1, "invalid stream");
        let msg = err.to_string();
        assert!(msg.contains("ffmpeg"));
        assert!(msg.contains("exit code 1"));
        assert!(msg.contains("invalid stream"));
    }
}
