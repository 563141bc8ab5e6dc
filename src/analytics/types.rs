use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;

use super::range::RangeKind;

/// One labelled value of a usage series, in hours of arc time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub label: String,
    pub value: f64,
}

/// Output of an arc-time source for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub series: Vec<TimeSeriesPoint>,
    pub total_arc_seconds: u64,
}

/// Analytics response for one window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsReport {
    pub total_arc_seconds: u64,
    pub last_updated: DateTime<Utc>,
    pub series: Vec<TimeSeriesPoint>,
    pub range_kind: RangeKind,
    pub start: NaiveDate,
    pub end: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iso_week: Option<u32>,
}
