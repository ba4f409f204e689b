//! Whispera Core - transcription backend for the Whispera desktop utility
//!
//! This crate contains all business logic with zero UI dependencies.
//! It can be used by the CLI front end or a GUI application.

pub mod config;
pub mod media;
pub mod pipeline;
pub mod split;
pub mod tools;
pub mod transcribe;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
