//! Configuration module for whosaid
//!
//! Settings are read from a TOML file with environment overrides.

mod settings;

pub use settings::{DiarizationSettings, Settings, WhisperSettings};
