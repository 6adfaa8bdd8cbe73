//! Speaker diarization via pretrained pyannote models
//!
//! Segmentation finds speech regions; a speaker-embedding model plus
//! nearest-centroid clustering assigns each region a `SPEAKER_NN` label.

mod pipeline;

pub use pipeline::{DiarizationPipeline, SpeakerTurn};
