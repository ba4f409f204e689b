//! Chunk export using ffmpeg.

use std::path::Path;
use std::process::Command;

use crate::tools::ToolLocation;

use super::{MediaError, MediaResult};

/// Export the `[start_ms, end_ms)` range of `input` as an mp3 file.
///
/// Seeks before decoding (`-ss` ahead of `-i`), drops any video stream,
/// and encodes at the requested audio bitrate.
pub(super) fn export_segment(
    location: &ToolLocation,
    input: &Path,
    start_ms: u64,
    end_ms: u64,
    bitrate: &str,
    output: &Path,
) -> MediaResult<()> {
    if !input.exists() {
        return Err(MediaError::SourceNotFound(input.to_path_buf()));
    }

    let duration_ms = end_ms.saturating_sub(start_ms);

    let mut cmd = Command::new(location.command());
    cmd.arg("-y")
        .arg("-ss")
        .arg(format_secs(start_ms))
        .arg("-i")
        .arg(input)
        .arg("-t")
        .arg(format_secs(duration_ms))
        .arg("-vn")
        .arg("-b:a")
        .arg(bitrate)
        .arg("-f")
        .arg("mp3")
        .arg(output);

    tracing::debug!("running ffmpeg export: {:?}", cmd);

    let result = cmd
        .output()
        .map_err(|e| MediaError::spawn_failed("ffmpeg", e))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        return Err(MediaError::command_failed(
            "ffmpeg",
            result.status.code().unwrap_or(-1),
            tail(&stderr, 6),
        ));
    }

    Ok(())
}

/// Render milliseconds as fractional seconds for ffmpeg arguments.
fn format_secs(ms: u64) -> String {
    format!("{:.3}", ms as f64 / 1000.0)
}

/// Last `n` non-empty lines of tool output, for error context.
fn tail(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
