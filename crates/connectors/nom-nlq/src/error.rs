//! Errors returned over HTTP.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::pipeline::SystemFault;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Fault(#[from] SystemFault),
    #[error("unable to encode metrics: {0}")]
    Metrics(#[from] prometheus::Error),
}

#[derive(Serialize)]
struct JsonErrorResponse {
    detail: &'static str,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        // Details stay in the logs; callers only learn that something went wrong.
        tracing::error!(error = %self, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JsonErrorResponse {
                detail: "Internal server error",
            }),
        )
            .into_response()
    }
}
