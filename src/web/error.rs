use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::web::templates;

/// Request-level failures, split by who is at fault: bad uploads come back
/// as 400 with the form re-rendered, inference failures as a 500 error page.
#[derive(Debug, Error)]
pub enum WebError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Inference failed: {0}")]
    Inference(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::BadRequest(msg) => {
                tracing::warn!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    Html(templates::render_index(Some(&msg))),
                )
                    .into_response()
            }
            WebError::Inference(msg) => {
                tracing::error!("Inference failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Html(templates::render_error(&msg)),
                )
                    .into_response()
            }
        }
    }
}

impl From<anyhow::Error> for WebError {
    fn from(err: anyhow::Error) -> Self {
        WebError::Inference(format!("{err:#}"))
    }
}
