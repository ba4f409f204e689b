//! Settings persistence for Whispera.
//!
//! The settings live in a flat `KEY=VALUE` text file next to the
//! application (`whispera.env`). Lines starting with `#` and blank lines
//! are ignored, `=` splits key from value once. The store reads the file
//! at startup and writes it back on explicit user save.

mod settings;
mod store;

pub use settings::{Settings, API_KEY_KEY};
pub use store::{ConfigError, ConfigResult, SettingsStore, SETTINGS_FILE_NAME};

use std::env;
use std::path::PathBuf;

/// Default location of the settings file.
///
/// Prefers a `whispera.env` next to the running executable (packaged
/// layout); falls back to the current working directory (development
/// layout).
pub fn default_settings_path() -> PathBuf {
    if let Ok(exe) = env::current_exe() {
        if let Some(dir) = exe.parent() {
            let candidate = dir.join(SETTINGS_FILE_NAME);
            if candidate.exists() {
                return candidate;
            }
        }
    }

    env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(SETTINGS_FILE_NAME)
}
