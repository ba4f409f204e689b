//! Flat key=value settings store with atomic writes.
//!
//! Key features:
//! - Atomic writes (write to temp file, then rename)
//! - Missing file loads as defaults
//! - Comments and unrecognized lines survive a save round-trip

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::settings::{Settings, API_KEY_KEY};

/// File name of the settings file.
pub const SETTINGS_FILE_NAME: &str = "whispera.env";

/// Errors that can occur during settings operations.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read settings file: {0}")]
    ReadError(#[from] io::Error),
}

/// Result type for settings operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Manages the on-disk settings file.
///
/// Handles loading, saving, and preservation of lines the application
/// does not recognize.
pub struct SettingsStore {
    /// Path to the settings file.
    path: PathBuf,
    /// Current settings loaded in memory.
    settings: Settings,
    /// Comment and unrecognized lines, preserved in order on save.
    passthrough: Vec<String>,
}

impl SettingsStore {
    /// Create a store for the given settings file path.
    ///
    /// Does not load the file - call `load()` after.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            settings: Settings::default(),
            passthrough: Vec::new(),
        }
    }

    /// Get the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get a reference to the current settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Get a mutable reference to the current settings.
    ///
    /// Note: changes made here are only in memory until `save()` is
    /// called.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// Load settings from the file.
    ///
    /// A missing file is not an error - it loads as defaults, matching
    /// first-run behavior.
    pub fn load(&mut self) -> ConfigResult<()> {
        self.settings = Settings::default();
        self.passthrough.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let content = fs::read_to_string(&self.path)?;
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                self.passthrough.push(line.to_string());
                continue;
            }
            match trimmed.split_once('=') {
                Some((key, value)) if key.trim() == API_KEY_KEY => {
                    self.settings.api_key = Some(value.trim().to_string());
                }
                _ => self.passthrough.push(line.to_string()),
            }
        }

        Ok(())
    }

    /// Save the settings atomically.
    ///
    /// Preserved lines are written back first, then the recognized keys.
    pub fn save(&self) -> ConfigResult<()> {
        let mut content = String::new();
        for line in &self.passthrough {
            content.push_str(line);
            content.push('\n');
        }
        if let Some(key) = self.settings.api_key.as_deref() {
            content.push_str(&format!("{}={}\n", API_KEY_KEY, key));
        }

        self.atomic_write(&content)?;
        Ok(())
    }

    /// Write content to the settings file atomically.
    ///
    /// Writes to a temp file first, then renames.
    fn atomic_write(&self, content: &str) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("env.tmp");

        {
            let mut file = fs::File::create(&temp_path)?;
            file.write_all(content.as_bytes())?;
            file.sync_all()?;
        }

        fs::rename(&temp_path, &self.path)?;

        Ok(())
    }
}
