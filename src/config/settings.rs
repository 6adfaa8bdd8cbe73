//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// HTTP server settings
    #[serde(default)]
    pub server: ServerSettings,

    /// Whisper transcription settings
    #[serde(default)]
    pub whisper: WhisperSettings,

    /// Speaker diarization settings
    #[serde(default)]
    pub diarization: DiarizationSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Data directory for uploads and cached models
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WhisperSettings {
    /// Whisper model to use (tiny, base, small, medium, large)
    #[serde(default = "default_model")]
    pub model: String,

    /// Hub repository the ggml weights are fetched from
    #[serde(default = "default_whisper_repo")]
    pub hub_repo: String,

    /// Language for transcription (empty = auto-detect)
    #[serde(default)]
    pub language: String,

    /// Enable translation to English
    #[serde(default)]
    pub translate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiarizationSettings {
    /// Hub repository the ONNX models are fetched from
    #[serde(default = "default_diarization_repo")]
    pub hub_repo: String,

    /// Segmentation model file name
    #[serde(default = "default_segmentation_model")]
    pub segmentation_model: String,

    /// Speaker embedding model file name
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,

    /// Maximum number of distinct speakers to cluster
    #[serde(default = "default_max_speakers")]
    pub max_speakers: usize,

    /// Cosine-similarity threshold for assigning a segment to a known speaker
    #[serde(default = "default_search_threshold")]
    pub search_threshold: f32,

    /// Bearer token for the model hub (or set HF_AUTH_TOKEN)
    #[serde(default)]
    pub auth_token: String,
}

// Default value functions

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "whosaid", "whosaid")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.local/share/whosaid"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_model() -> String {
    "base".to_string()
}

fn default_whisper_repo() -> String {
    "ggerganov/whisper.cpp".to_string()
}

fn default_diarization_repo() -> String {
    "thewh1teagle/pyannote-rs".to_string()
}

fn default_segmentation_model() -> String {
    "segmentation-3.0.onnx".to_string()
}

fn default_embedding_model() -> String {
    "wespeaker_en_voxceleb_CAM++.onnx".to_string()
}

fn default_max_speakers() -> usize {
    6
}

fn default_search_threshold() -> f32 {
    0.5
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for WhisperSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            hub_repo: default_whisper_repo(),
            language: String::new(),
            translate: false,
        }
    }
}

impl Default for DiarizationSettings {
    fn default() -> Self {
        Self {
            hub_repo: default_diarization_repo(),
            segmentation_model: default_segmentation_model(),
            embedding_model: default_embedding_model(),
            max_speakers: default_max_speakers(),
            search_threshold: default_search_threshold(),
            auth_token: String::new(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            general: GeneralSettings::default(),
            server: ServerSettings::default(),
            whisper: WhisperSettings::default(),
            diarization: DiarizationSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            tracing::info!("No config file found, using defaults");
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let content = std::fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if self.diarization.auth_token.trim().is_empty() {
            if let Ok(token) = std::env::var("HF_AUTH_TOKEN") {
                if !token.trim().is_empty() {
                    self.diarization.auth_token = token;
                }
            }
        }

        if let Ok(bind) = std::env::var("WHOSAID_BIND") {
            self.apply_bind_override(&bind);
        }
    }

    /// Parse a `host:port` override into the server settings.
    fn apply_bind_override(&mut self, bind: &str) {
        let parsed = bind
            .rsplit_once(':')
            .and_then(|(host, port)| port.parse::<u16>().ok().map(|p| (host, p)));

        match parsed {
            Some((host, port)) if !host.is_empty() => {
                self.server.host = host.to_string();
                self.server.port = port;
            }
            _ => tracing::warn!("Ignoring malformed WHOSAID_BIND value '{}'", bind),
        }
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "whosaid", "whosaid")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Address the server binds, as `host:port`
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Directory uploaded audio files are written to
    pub fn upload_dir(&self) -> PathBuf {
        self.general.data_dir.join("uploads")
    }

    /// Directory cached model files live in
    pub fn models_dir(&self) -> PathBuf {
        self.general.data_dir.join("models")
    }

    /// Ensure all required directories exist
    pub fn ensure_dirs(&self) -> Result<()> {
        std::fs::create_dir_all(&self.general.data_dir)?;
        std::fs::create_dir_all(self.upload_dir())?;
        std::fs::create_dir_all(self.models_dir())?;
        Ok(())
    }
}

impl WhisperSettings {
    /// ggml weights file name for the configured model
    pub fn model_file(&self) -> String {
        format!("ggml-{}.bin", self.model)
    }
}

impl DiarizationSettings {
    /// Configured hub token, if any
    pub fn auth_token(&self) -> Option<String> {
        let token = self.auth_token.trim();
        if token.is_empty() {
            None
        } else {
            Some(token.to_string())
        }
    }
}
