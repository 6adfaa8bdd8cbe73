//! Transcription module for whosaid
//!
//! Handles speech-to-text using whisper-rs and combines it with the
//! diarization pass into a single inference output.

mod pipeline;
mod whisper;

pub use pipeline::{SpeechEngine, TranscriptionOutput, TranscriptionPipeline};
pub use whisper::WhisperTranscriber;
