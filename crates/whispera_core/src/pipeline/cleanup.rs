//! Best-effort removal of temporary chunk artifacts.
//!
//! Cleanup failures are logged and discarded - they must never mask the
//! pipeline's primary result or error.

use tempfile::TempDir;

/// Remove the chunk staging directory and everything in it.
pub(super) fn remove_dir_best_effort(dir: TempDir) {
    let path = dir.path().to_path_buf();
    if let Err(e) = dir.close() {
        tracing::warn!(
            "failed to remove temporary chunk directory {}: {}",
            path.display(),
            e
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn removes_directory_and_contents() {
        let dir = tempfile::Builder::new()
            .prefix("whispera-test-")
            .tempdir()
            .unwrap();
        let path = dir.path().to_path_buf();
        fs::write(path.join("chunk_1.mp3"), b"data").unwrap();

        remove_dir_best_effort(dir);

        assert!(!path.exists());
    }
}
