//! Request handlers for the upload form and the results view

use axum::{
    extract::{Multipart, State},
    response::Html,
    Json,
};
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::web::{templates, AppState, WebError};

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "OK", "version": crate::VERSION }))
}

/// `GET /` — the empty upload form. No inference, no file write.
pub async fn index() -> Html<String> {
    Html(templates::render_index(None))
}

/// `POST /` — accept a multipart `file` field, store it, run inference,
/// render the results view.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Html<String>, WebError> {
    let Some(upload) = read_file_field(multipart).await? else {
        return Err(WebError::BadRequest(
            "Select an audio file to transcribe.".to_string(),
        ));
    };

    let stored_path = store_upload(&state.upload_dir, &upload).await?;
    tracing::info!("Stored upload '{}' as {}", upload.filename, stored_path.display());

    // Inference is CPU-bound and blocking; keep it off the async workers.
    let engine = state.engine.clone();
    let path = stored_path.clone();
    let output = tokio::task::spawn_blocking(move || engine.process(&path))
        .await
        .map_err(|e| WebError::Inference(format!("Inference task panicked: {e}")))??;

    Ok(Html(templates::render_results(&upload.filename, &output)))
}

/// An uploaded file: raw bytes plus the client-supplied display name.
struct Upload {
    filename: String,
    bytes: Vec<u8>,
}

/// Pull the `file` field out of the multipart stream. Returns `None` when
/// the field is missing or empty.
async fn read_file_field(mut multipart: Multipart) -> Result<Option<Upload>, WebError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| WebError::BadRequest(format!("Malformed multipart request: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("upload").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| WebError::BadRequest(format!("Failed to read upload: {e}")))?;

        if bytes.is_empty() {
            return Ok(None);
        }

        return Ok(Some(Upload {
            filename,
            bytes: bytes.to_vec(),
        }));
    }

    Ok(None)
}

/// Store the upload under a generated key. The client filename is
/// display-only and never touches the filesystem.
async fn store_upload(upload_dir: &Path, upload: &Upload) -> Result<PathBuf, WebError> {
    let key = match Path::new(&upload.filename)
        .extension()
        .and_then(|ext| ext.to_str())
    {
        Some(ext) => format!("{}.{}", uuid::Uuid::new_v4(), ext),
        None => uuid::Uuid::new_v4().to_string(),
    };

    let path = upload_dir.join(key);
    tokio::fs::write(&path, &upload.bytes)
        .await
        .map_err(|e| WebError::Inference(format!("Failed to store upload: {e}")))?;

    Ok(path)
}
