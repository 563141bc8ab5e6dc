//! Arc-time analytics.
//!
//! `range` resolves a reference date to a calendar window, `seeded` and
//! `synth` produce the usage series for it, and [`build_report`] ties them
//! together for the API layer.

pub mod range;
pub mod seeded;
pub mod synth;
pub mod types;

use chrono::{DateTime, Utc};
use tracing::debug;

pub use range::{parse_reference_date, resolve, resolve_str, DateRange, RangeKind};
pub use seeded::SeededRng;
pub use synth::{synthesize, ArcTimeSource, SyntheticArcTime};
pub use types::{AnalyticsReport, Synthesis, TimeSeriesPoint};

use crate::error::WeldError;

/// Build the analytics report for `reference` / `kind` from `source`.
///
/// `now` is stamped as `lastUpdated`.
pub fn build_report(
    source: &dyn ArcTimeSource,
    reference: &str,
    kind: &str,
    now: DateTime<Utc>,
) -> Result<AnalyticsReport, WeldError> {
    let range = resolve_str(reference, kind)?;
    let synthesis = source.arc_time(&range);

    debug!(
        "Analytics {} {}..{}: {} points, {}s",
        range.kind,
        range.start,
        range.end,
        synthesis.series.len(),
        synthesis.total_arc_seconds
    );

    Ok(AnalyticsReport {
        total_arc_seconds: synthesis.total_arc_seconds,
        last_updated: now,
        series: synthesis.series,
        range_kind: range.kind,
        start: range.start,
        end: range.end,
        iso_week: range.iso_week.map(|(_, week)| week),
    })
}
