//! Job registry endpoints.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::info;

use crate::error::WeldError;
use crate::jobs::Job;
use crate::server::AppState;

/// Confirmation returned by a delete, with the jobs that remain.
#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub message: String,
    pub jobs: Vec<Job>,
}

/// `GET /api/jobs`
pub async fn list_jobs(State(state): State<AppState>) -> Result<Json<Vec<Job>>, WeldError> {
    let jobs = state.registry.list()?;
    info!("Listed {} jobs", jobs.len());
    Ok(Json(jobs))
}

/// `GET /api/jobs/{id}`
pub async fn get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Job>, WeldError> {
    state.registry.get(&id).map(Json)
}

/// `POST /api/jobs`
pub async fn create_job(
    State(state): State<AppState>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<(StatusCode, Json<Job>), WeldError> {
    let job = state.registry.create(payload)?;
    Ok((StatusCode::CREATED, Json(job)))
}

/// `PUT /api/jobs/{id}`
///
/// A body with `title` replaces fields of the job; a body with only a boolean
/// `isActive` switches it on (and every other job off) or off.
pub async fn update_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<Map<String, Value>>,
) -> Result<Json<Job>, WeldError> {
    state.registry.update(&id, payload).map(Json)
}

/// `DELETE /api/jobs/{id}`
pub async fn delete_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, WeldError> {
    let (_, jobs) = state.registry.delete(&id)?;
    Ok(Json(DeleteResponse {
        message: format!("Deleted job {}", id),
        jobs,
    }))
}
