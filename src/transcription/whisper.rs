//! Whisper transcription using whisper-rs

use anyhow::{Context, Result};
use std::path::Path;
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::config::WhisperSettings;

/// Whisper-based transcriber
pub struct WhisperTranscriber {
    ctx: WhisperContext,
    language: Option<String>,
    translate: bool,
}

impl WhisperTranscriber {
    /// Create a new transcriber from resolved ggml weights
    pub fn new(model_path: &Path, settings: &WhisperSettings) -> Result<Self> {
        if !model_path.exists() {
            anyhow::bail!("Whisper model not found at {}", model_path.display());
        }

        let ctx = WhisperContext::new_with_params(
            model_path
                .to_str()
                .context("Whisper model path is not valid UTF-8")?,
            WhisperContextParameters::default(),
        )
        .context("Failed to load Whisper model")?;

        let language = if settings.language.is_empty() {
            None
        } else {
            Some(settings.language.clone())
        };

        Ok(Self {
            ctx,
            language,
            translate: settings.translate,
        })
    }

    /// Transcribe audio samples into a single transcript string
    pub fn transcribe(&self, samples: &[f32]) -> Result<String> {
        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });

        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_translate(self.translate);

        if let Some(ref lang) = self.language {
            params.set_language(Some(lang));
        }

        // Run inference
        let mut state = self
            .ctx
            .create_state()
            .context("Failed to create Whisper state")?;
        state
            .full(params, samples)
            .context("Whisper inference failed")?;

        // Concatenate segment texts into the transcript
        let num_segments = state
            .full_n_segments()
            .context("Failed to get segment count")?;
        let mut transcript = String::new();

        for i in 0..num_segments {
            let text = state
                .full_get_segment_text(i)
                .context("Failed to get segment text")?;

            let text = text.trim();
            if text.is_empty() {
                continue;
            }

            if !transcript.is_empty() {
                transcript.push(' ');
            }
            transcript.push_str(text);
        }

        Ok(transcript)
    }
}

/// Load audio from a WAV file and convert to f32 samples at 16kHz mono
pub fn load_audio(path: &Path) -> Result<Vec<f32>> {
    let reader = hound::WavReader::open(path)
        .with_context(|| format!("Failed to open audio file: {}", path.display()))?;

    let spec = reader.spec();
    let sample_rate = spec.sample_rate;
    let channels = spec.channels as usize;

    tracing::debug!(
        "Loading audio: {} Hz, {} channels, {:?}",
        sample_rate,
        channels,
        spec.sample_format
    );

    // Read samples based on format
    let samples: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
        (hound::SampleFormat::Int, 16) => reader
            .into_samples::<i16>()
            .filter_map(|s| s.ok())
            .map(|s| s as f32 / 32768.0)
            .collect(),
        (hound::SampleFormat::Int, 32) => reader
            .into_samples::<i32>()
            .filter_map(|s| s.ok())
            .map(|s| s as f32 / 2147483648.0)
            .collect(),
        (hound::SampleFormat::Float, 32) => {
            reader.into_samples::<f32>().filter_map(|s| s.ok()).collect()
        }
        _ => anyhow::bail!(
            "Unsupported audio format: {:?} {}bit",
            spec.sample_format,
            spec.bits_per_sample
        ),
    };

    // Convert to mono if stereo
    let samples = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    // Resample to 16kHz if needed
    let samples = if sample_rate != 16000 {
        resample(&samples, sample_rate, 16000)
    } else {
        samples
    };

    Ok(samples)
}

/// Simple linear resampling
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    let ratio = from_rate as f64 / to_rate as f64;
    let new_len = (samples.len() as f64 / ratio) as usize;
    let mut result = Vec::with_capacity(new_len);

    for i in 0..new_len {
        let src_pos = i as f64 * ratio;
        let src_idx = src_pos as usize;
        let frac = src_pos - src_idx as f64;

        let sample = if src_idx + 1 < samples.len() {
            samples[src_idx] * (1.0 - frac as f32) + samples[src_idx + 1] * frac as f32
        } else if src_idx < samples.len() {
            samples[src_idx]
        } else {
            0.0
        };

        result.push(sample);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_wav(path: &Path, sample_rate: u32, channels: u16, samples: &[i16]) {
        let spec = hound::WavSpec {
            channels,
            sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(path, spec).unwrap();
        for &s in samples {
            writer.write_sample(s).unwrap();
        }
        writer.finalize().unwrap();
    }

    #[test]
    fn resample_downsamples_by_rate_ratio() {
        let samples = vec![0.5f32; 1000];
        let out = resample(&samples, 32000, 16000);
        assert_eq!(out.len(), 500);
        assert!((out[250] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn resample_upsamples_by_rate_ratio() {
        let samples = vec![0.25f32; 800];
        let out = resample(&samples, 8000, 16000);
        assert_eq!(out.len(), 1600);
    }

    #[test]
    fn load_audio_downmixes_stereo_to_mono() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("stereo.wav");

        // 100 frames of L=1000, R=3000 at 16kHz
        let frames: Vec<i16> = (0..100).flat_map(|_| [1000i16, 3000i16]).collect();
        write_wav(&path, 16000, 2, &frames);

        let samples = load_audio(&path).unwrap();
        assert_eq!(samples.len(), 100);
        let expected = 2000.0 / 32768.0;
        assert!((samples[0] - expected).abs() < 1e-6);
    }

    #[test]
    fn load_audio_resamples_non_16k_input() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("8k.wav");

        let frames: Vec<i16> = vec![0; 800];
        write_wav(&path, 8000, 1, &frames);

        let samples = load_audio(&path).unwrap();
        assert_eq!(samples.len(), 1600);
    }

    #[test]
    fn load_audio_rejects_unsupported_bit_depth() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("8bit.wav");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16000,
            bits_per_sample: 8,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..10 {
            writer.write_sample(0i8).unwrap();
        }
        writer.finalize().unwrap();

        let err = load_audio(&path).unwrap_err();
        assert!(err.to_string().contains("Unsupported audio format"));
    }

    #[test]
    fn load_audio_fails_for_missing_file() {
        let err = load_audio(Path::new("/nonexistent/audio.wav")).unwrap_err();
        assert!(err.to_string().contains("Failed to open audio file"));
    }
}
