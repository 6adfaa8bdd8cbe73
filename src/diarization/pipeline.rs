//! Diarization pipeline built on pyannote-rs

use anyhow::{Context, Result};
use pyannote_rs::{EmbeddingExtractor, EmbeddingManager};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::DiarizationSettings;

/// Label for segments no speaker cluster could be assigned to
const UNKNOWN_SPEAKER: &str = "SPEAKER_??";

/// One contiguous time interval attributed to a single speaker
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakerTurn {
    /// Start of the turn, in seconds
    pub start: f64,

    /// End of the turn, in seconds
    pub end: f64,

    /// Speaker label (`SPEAKER_00`, `SPEAKER_01`, ...)
    pub speaker: String,
}

impl fmt::Display for SpeakerTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:.2}s - {:.2}s", self.speaker, self.start, self.end)
    }
}

/// Speaker diarization over a WAV file
///
/// Loaded once at startup; the embedding extractor needs `&mut` for
/// inference, so concurrent requests serialize on its lock.
pub struct DiarizationPipeline {
    segmentation_model: PathBuf,
    extractor: Mutex<EmbeddingExtractor>,
    max_speakers: usize,
    search_threshold: f32,
}

impl DiarizationPipeline {
    /// Build the pipeline from resolved model files. Fails if the embedding
    /// model cannot be loaded.
    pub fn new(
        segmentation_model: PathBuf,
        embedding_model: &Path,
        settings: &DiarizationSettings,
    ) -> Result<Self> {
        let extractor = EmbeddingExtractor::new(
            embedding_model
                .to_str()
                .context("Embedding model path is not valid UTF-8")?,
        )
        .map_err(|e| anyhow::anyhow!("Failed to load speaker embedding model: {e}"))?;

        Ok(Self {
            segmentation_model,
            extractor: Mutex::new(extractor),
            max_speakers: settings.max_speakers,
            search_threshold: settings.search_threshold,
        })
    }

    /// Run diarization over a WAV file, returning turns in the order the
    /// segmentation model yields them. Ordering is not re-sorted.
    pub fn diarize(&self, audio_path: &Path) -> Result<Vec<SpeakerTurn>> {
        let (samples, sample_rate) = pyannote_rs::read_wav(
            audio_path
                .to_str()
                .context("Audio path is not valid UTF-8")?,
        )
        .map_err(|e| anyhow::anyhow!("Failed to read audio for diarization: {e}"))?;

        let segments = pyannote_rs::get_segments(&samples, sample_rate, &self.segmentation_model)
            .map_err(|e| anyhow::anyhow!("Speech segmentation failed: {e}"))?;

        // Fresh clustering per file so labels always start at SPEAKER_00
        let mut manager = EmbeddingManager::new(self.max_speakers);
        let mut extractor = self
            .extractor
            .lock()
            .expect("embedding extractor lock poisoned");

        let mut turns = Vec::new();
        for segment in segments {
            let segment =
                segment.map_err(|e| anyhow::anyhow!("Speech segmentation failed: {e}"))?;

            let speaker = match extractor.compute(&segment.samples) {
                Ok(embedding) => {
                    self.assign_speaker(&mut manager, embedding.collect())
                }
                Err(e) => {
                    tracing::warn!(
                        "Embedding failed for segment {:.2}s - {:.2}s: {e}",
                        segment.start,
                        segment.end
                    );
                    UNKNOWN_SPEAKER.to_string()
                }
            };

            turns.push(SpeakerTurn {
                start: segment.start,
                end: segment.end,
                speaker,
            });
        }

        Ok(turns)
    }

    fn assign_speaker(&self, manager: &mut EmbeddingManager, embedding: Vec<f32>) -> String {
        // Once all speaker slots are taken, map to the closest known speaker
        // instead of minting new labels
        let id = if manager.get_all_speakers().len() == self.max_speakers {
            manager.get_best_speaker_match(embedding).ok()
        } else {
            manager.search_speaker(embedding, self.search_threshold)
        };

        match id {
            Some(id) => speaker_label(id),
            None => UNKNOWN_SPEAKER.to_string(),
        }
    }
}

/// `SPEAKER_NN` label for a cluster id
fn speaker_label(id: usize) -> String {
    format!("SPEAKER_{:02}", id)
}
