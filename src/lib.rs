//! whosaid - upload a recording, get a transcript with who spoke when
//!
//! Transcription is delegated to a local Whisper model and speaker
//! diarization to pretrained pyannote models; this crate is the web front
//! end and the glue between the two.

pub mod config;
pub mod diarization;
pub mod hub;
pub mod transcription;
pub mod web;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "whosaid";
