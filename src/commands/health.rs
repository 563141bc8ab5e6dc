use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::info;

use crate::error::WeldError;
use crate::server::AppState;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub job_count: usize,
    pub active_job_id: Option<String>,
}

/// `GET /`
pub async fn root() -> &'static str {
    "Job Management API is running"
}

/// `GET /api/health`
pub async fn run_health_check(
    State(state): State<AppState>,
) -> Result<Json<HealthReport>, WeldError> {
    let job_count = state.registry.len()?;
    let active_job_id = state
        .registry
        .active()?
        .and_then(|job| job.id().map(str::to_string));
    info!("Health check: {} jobs, active {:?}", job_count, active_job_id);

    Ok(Json(HealthReport {
        status: "ok",
        job_count,
        active_job_id,
    }))
}
