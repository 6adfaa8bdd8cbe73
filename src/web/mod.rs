//! Web front end: upload form, results view, and the route wiring

mod error;
mod handlers;
mod templates;

pub use error::WebError;

use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::transcription::SpeechEngine;

/// Uploaded recordings can be large; the default 2 MB body limit is far
/// too small.
const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// Process-wide state shared read-only by all request handlers.
///
/// The engine is loaded once at startup and never reloaded.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<dyn SpeechEngine>,
    pub upload_dir: PathBuf,
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::upload))
        .route("/health", get(handlers::health))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
