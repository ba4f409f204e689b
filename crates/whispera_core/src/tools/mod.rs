//! External media tool discovery.
//!
//! Whispera shells out to `ffmpeg` (chunk export) and its sibling
//! `ffprobe` (duration probing). Neither is bundled, so the locator
//! searches several install layouts before giving up.

mod locator;

pub use locator::{locate_ffmpeg, ToolLocation};
