//! Inference orchestration
//!
//! One transcription pass and one diarization pass over the same audio
//! file, merged into a single output. The two passes are independent;
//! neither informs the other.

use anyhow::Result;
use std::path::Path;

use crate::diarization::{DiarizationPipeline, SpeakerTurn};
use crate::transcription::whisper::{load_audio, WhisperTranscriber};

/// Combined result of one inference run
#[derive(Debug, Clone)]
pub struct TranscriptionOutput {
    /// Full transcript text
    pub transcript: String,

    /// Speaker turns, in diarization output order
    pub turns: Vec<SpeakerTurn>,
}

/// Blocking inference engine. Callers on the async runtime drive it through
/// `tokio::task::spawn_blocking`.
pub trait SpeechEngine: Send + Sync {
    fn process(&self, audio_path: &Path) -> Result<TranscriptionOutput>;
}

/// Whisper transcription plus pyannote diarization over one audio file
pub struct TranscriptionPipeline {
    transcriber: WhisperTranscriber,
    diarization: DiarizationPipeline,
}

impl TranscriptionPipeline {
    pub fn new(transcriber: WhisperTranscriber, diarization: DiarizationPipeline) -> Self {
        Self {
            transcriber,
            diarization,
        }
    }
}

impl SpeechEngine for TranscriptionPipeline {
    fn process(&self, audio_path: &Path) -> Result<TranscriptionOutput> {
        tracing::info!("Transcribing {}", audio_path.display());
        let samples = load_audio(audio_path)?;
        let transcript = self.transcriber.transcribe(&samples)?;

        tracing::info!("Running speaker diarization on {}", audio_path.display());
        let turns = self.diarization.diarize(audio_path)?;

        tracing::info!(
            "Inference complete: {} transcript chars, {} speaker turns",
            transcript.len(),
            turns.len()
        );

        Ok(TranscriptionOutput { transcript, turns })
    }
}
