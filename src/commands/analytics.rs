use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

use crate::analytics::{build_report, AnalyticsReport, RangeKind};
use crate::error::WeldError;
use crate::server::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsQuery {
    /// Defaults to today (UTC).
    pub reference_date: Option<String>,
    /// Defaults to `week`.
    pub range: Option<String>,
}

/// `GET /api/analytics?referenceDate=YYYY-MM-DD&range=week|month|year`
pub async fn get_analytics(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsReport>, WeldError> {
    let now = Utc::now();
    let reference = query
        .reference_date
        .unwrap_or_else(|| now.date_naive().format("%Y-%m-%d").to_string());
    let range = query
        .range
        .unwrap_or_else(|| RangeKind::Week.as_str().to_string());

    let report = build_report(state.analytics.as_ref(), &reference, &range, now)?;
    info!(
        "Analytics {} for {}: {}s over {} points",
        report.range_kind,
        reference,
        report.total_arc_seconds,
        report.series.len()
    );
    Ok(Json(report))
}
