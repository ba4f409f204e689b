//! Multi-step ffmpeg discovery.
//!
//! Resolution order (first match wins):
//! 1. User-supplied hint: a directory containing the executable, or the
//!    executable itself.
//! 2. `PATH` lookup.
//! 3. The directory of the running executable, then an `ffmpeg/`
//!    subdirectory beneath it (packaged layout).
//! 4. The current working directory, then an `ffmpeg/` subdirectory
//!    beneath it (development layout).
//! 5. A bare `ffmpeg -version` invocation with a short timeout.
//!
//! Side effect: a filesystem match prepends the resolved directory to
//! the process `PATH`, so later child invocations of `ffmpeg`/`ffprobe`
//! by bare name succeed. The mutation is idempotent and confined to
//! this module.

use std::env;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

const TOOL_NAME: &str = "ffmpeg";
const PROBE_NAME: &str = "ffprobe";
const TOOL_SUBDIR: &str = "ffmpeg";

/// How long the bare `-version` probe may run before being killed.
const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// A resolved ffmpeg location.
///
/// Holds either an absolute executable path or the bare command name
/// (when ffmpeg is only reachable through `PATH`). Intended to be
/// resolved once per pipeline invocation; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolLocation {
    command: PathBuf,
}

impl ToolLocation {
    fn new(command: PathBuf) -> Self {
        Self { command }
    }

    fn bare() -> Self {
        Self::new(PathBuf::from(TOOL_NAME))
    }

    /// Wrap an explicit command path or bare name without discovery.
    pub fn from_command(command: impl Into<PathBuf>) -> Self {
        Self::new(command.into())
    }

    /// The ffmpeg command to invoke (absolute path or bare name).
    pub fn command(&self) -> &Path {
        &self.command
    }

    /// Whether this is a bare command name resolved through `PATH`.
    pub fn is_bare(&self) -> bool {
        self.command
            .parent()
            .map_or(true, |p| p.as_os_str().is_empty())
    }

    /// The ffprobe command matching this ffmpeg location.
    ///
    /// Prefers the sibling executable next to an absolute ffmpeg; falls
    /// back to the bare name (resolvable through the prepended `PATH`).
    pub fn probe_command(&self) -> PathBuf {
        if let Some(dir) = self.command.parent() {
            if !dir.as_os_str().is_empty() {
                let sibling = dir.join(probe_exe_name());
                if sibling.exists() {
                    return sibling;
                }
            }
        }
        PathBuf::from(PROBE_NAME)
    }
}

fn tool_exe_name() -> String {
    format!("{}{}", TOOL_NAME, env::consts::EXE_SUFFIX)
}

fn probe_exe_name() -> String {
    format!("{}{}", PROBE_NAME, env::consts::EXE_SUFFIX)
}

/// Locate the ffmpeg executable.
///
/// Returns `None` when ffmpeg cannot be found anywhere - never an
/// error. Callers treat unavailability as a recoverable condition.
pub fn locate_ffmpeg(hint: Option<&Path>) -> Option<ToolLocation> {
    tracing::debug!(?hint, "locating ffmpeg");

    // 1. User-supplied hint, checked first.
    if let Some(hint) = hint.filter(|h| !h.as_os_str().is_empty()) {
        if hint.is_dir() {
            let candidate = hint.join(tool_exe_name());
            if candidate.is_file() {
                return Some(found(candidate));
            }
            tracing::warn!(
                "ffmpeg hint is a directory but contains no {}: {}",
                tool_exe_name(),
                hint.display()
            );
        } else if hint.is_file() {
            return Some(found(hint.to_path_buf()));
        } else {
            tracing::warn!("ffmpeg hint does not exist: {}", hint.display());
        }
    }

    // 2. PATH lookup.
    if let Ok(path) = which::which(TOOL_NAME) {
        tracing::debug!("found ffmpeg on PATH: {}", path.display());
        return Some(ToolLocation::new(path));
    }

    // 3. Next to the running executable (packaged layout).
    if let Ok(exe) = env::current_exe() {
        if let Some(exe_dir) = exe.parent() {
            if let Some(location) = check_dir(exe_dir) {
                return Some(location);
            }
        }
    }

    // 4. The working directory (development layout).
    if let Ok(cwd) = env::current_dir() {
        if let Some(location) = check_dir(&cwd) {
            return Some(location);
        }
    }

    // 5. Last resort: see if a bare invocation works anyway.
    if version_probe_succeeds() {
        return Some(ToolLocation::bare());
    }

    tracing::warn!("ffmpeg not found in any of the checked locations");
    None
}

/// Check a directory and its `ffmpeg/` subdirectory for the executable.
fn check_dir(dir: &Path) -> Option<ToolLocation> {
    let candidate = dir.join(tool_exe_name());
    if candidate.is_file() {
        return Some(found(candidate));
    }

    let candidate = dir.join(TOOL_SUBDIR).join(tool_exe_name());
    if candidate.is_file() {
        return Some(found(candidate));
    }

    None
}

/// Record a filesystem match: absolutize, prepend its directory to
/// `PATH`, and wrap it.
fn found(path: PathBuf) -> ToolLocation {
    let path = std::fs::canonicalize(&path).unwrap_or(path);
    tracing::info!("found ffmpeg at {}", path.display());
    if let Some(dir) = path.parent() {
        prepend_to_path(dir);
    }
    ToolLocation::new(path)
}

/// Prepend a directory to the process `PATH` unless already present.
fn prepend_to_path(dir: &Path) {
    let current = env::var_os("PATH").unwrap_or_default();
    if env::split_paths(&current).any(|p| p == dir) {
        return;
    }

    let paths = std::iter::once(dir.to_path_buf()).chain(env::split_paths(&current));
    if let Ok(joined) = env::join_paths(paths) {
        env::set_var("PATH", joined);
        tracing::debug!("prepended {} to PATH", dir.display());
    }
}

/// Run `ffmpeg -version` with a timeout; true on exit code 0.
fn version_probe_succeeds() -> bool {
    let child = Command::new(TOOL_NAME)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    let mut child = match child {
        Ok(c) => c,
        Err(_) => return false,
    };

    let deadline = Instant::now() + VERSION_PROBE_TIMEOUT;
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return status.success(),
            Ok(None) => {
                if Instant::now() >= deadline {
                    tracing::warn!("ffmpeg -version probe timed out");
                    let _ = child.kill();
                    let _ = child.wait();
                    return false;
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(_) => return false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn fake_tool(dir: &Path) -> PathBuf {
        let path = dir.join(tool_exe_name());
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn hint_directory_resolves_and_is_idempotent() {
        let dir = tempdir().unwrap();
        let expected = fs::canonicalize(fake_tool(dir.path())).unwrap();

        let first = locate_ffmpeg(Some(dir.path())).unwrap();
        let second = locate_ffmpeg(Some(dir.path())).unwrap();

        assert_eq!(first.command(), expected);
        assert_eq!(first, second);
    }

    #[test]
    fn hint_file_resolves_directly() {
        let dir = tempdir().unwrap();
        let tool = fake_tool(dir.path());

        let location = locate_ffmpeg(Some(&tool)).unwrap();
        assert_eq!(
            location.command(),
            fs::canonicalize(&tool).unwrap().as_path()
        );
        assert!(!location.is_bare());
    }

    #[test]
    fn probe_command_prefers_sibling() {
        let dir = tempdir().unwrap();
        let tool = fake_tool(dir.path());
        let sibling = dir.path().join(probe_exe_name());
        fs::write(&sibling, "").unwrap();

        let location = ToolLocation::new(tool);
        assert_eq!(location.probe_command(), sibling);
    }

    #[test]
    fn probe_command_falls_back_to_bare_name() {
        let dir = tempdir().unwrap();
        let tool = fake_tool(dir.path());

        let location = ToolLocation::new(tool);
        assert_eq!(location.probe_command(), PathBuf::from(PROBE_NAME));

        let bare = ToolLocation::bare();
        assert!(bare.is_bare());
        assert_eq!(bare.probe_command(), PathBuf::from(PROBE_NAME));
    }
}
