//! Duration probing using ffprobe.

use std::path::Path;
use std::process::Command;

use crate::tools::ToolLocation;

use super::{MediaError, MediaResult};

/// Probe the total duration of a media file in milliseconds.
///
/// Uses `ffprobe -show_entries format=duration`, which prints the
/// duration as a plain decimal number of seconds.
pub(super) fn probe_duration_ms(location: &ToolLocation, path: &Path) -> MediaResult<u64> {
    if !path.exists() {
        return Err(MediaError::SourceNotFound(path.to_path_buf()));
    }

    let probe = location.probe_command();
    tracing::debug!("probing duration of {} with {}", path.display(), probe.display());

    let output = Command::new(&probe)
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .map_err(|e| MediaError::spawn_failed("ffprobe", e))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(MediaError::command_failed(
            "ffprobe",
            output.status.code().unwrap_or(-1),
            stderr.trim().to_string(),
        ));
    }

    let duration_str = String::from_utf8_lossy(&output.stdout);
    let duration_secs: f64 = duration_str
        .trim()
        .parse()
        .map_err(|e| MediaError::parse_error("duration", format!("{}: {:?}", e, duration_str.trim())))?;

    if !duration_secs.is_finite() || duration_secs < 0.0 {
        return Err(MediaError::parse_error(
            "duration",
            format!("out of range: {}", duration_secs),
        ));
    }

    Ok((duration_secs * 1000.0).round() as u64)
}
