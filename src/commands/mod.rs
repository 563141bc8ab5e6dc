//! HTTP handlers.
//!
//! Each handler parses its request, calls into `jobs` or `analytics`, and
//! returns JSON. Domain errors become `{"error": ...}` bodies with a status
//! code chosen by [`status_for`].

pub mod analytics;
pub mod health;
pub mod jobs;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use crate::error::WeldError;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

pub fn status_for(err: &WeldError) -> StatusCode {
    match err {
        WeldError::Validation(_) | WeldError::InvalidDate(_) | WeldError::InvalidRange(_) => {
            StatusCode::BAD_REQUEST
        }
        WeldError::NotFound(_) => StatusCode::NOT_FOUND,
        WeldError::Config(_) | WeldError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for WeldError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        if status.is_server_error() {
            error!("Request failed: {}", self);
        } else {
            warn!("Request rejected: {}", self);
        }
        (status, Json(ErrorBody { error: self.into() })).into_response()
    }
}
