//! whosaid - upload a recording, get a transcript with who spoke when
//!
//! Entry point: loads settings, resolves the pretrained models, builds the
//! inference engine, and serves the web front end.

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use whosaid::config::Settings;
use whosaid::diarization::DiarizationPipeline;
use whosaid::hub::HubClient;
use whosaid::transcription::{TranscriptionPipeline, WhisperTranscriber};
use whosaid::web::{self, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let settings = Settings::load()?;
    settings.ensure_dirs()?;

    // Resolve pretrained weights before binding. A cold model cache without
    // a hub token is a startup failure, not a per-request one.
    let hub = HubClient::new(settings.diarization.auth_token())?;
    let models_dir = settings.models_dir();

    let whisper_model = hub
        .resolve(
            &settings.whisper.hub_repo,
            &settings.whisper.model_file(),
            &models_dir,
        )
        .await?;
    let segmentation_model = hub
        .resolve_gated(
            &settings.diarization.hub_repo,
            &settings.diarization.segmentation_model,
            &models_dir,
        )
        .await?;
    let embedding_model = hub
        .resolve_gated(
            &settings.diarization.hub_repo,
            &settings.diarization.embedding_model,
            &models_dir,
        )
        .await?;

    let transcriber = WhisperTranscriber::new(&whisper_model, &settings.whisper)?;
    let diarization =
        DiarizationPipeline::new(segmentation_model, &embedding_model, &settings.diarization)?;
    let engine = TranscriptionPipeline::new(transcriber, diarization);

    let state = AppState {
        engine: Arc::new(engine),
        upload_dir: settings.upload_dir(),
    };

    let app = web::router(state);

    let addr = settings.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!(
        "{} v{} listening on http://{}",
        whosaid::APP_NAME,
        whosaid::VERSION,
        addr
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
