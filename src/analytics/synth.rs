//! Synthetic arc-time series.
//!
//! Values are pseudo-random but fully determined by the calendar window: the
//! window's seed drives a [`SeededRng`], and every point consumes exactly two
//! draws (base, then noise) in series order.
//!
//! Rounding: each raw value is rounded to one decimal first, and the total is
//! the sum of `round(displayed * 3600)` over the points.

use std::f64::consts::PI;

use super::range::{DateRange, RangeKind};
use super::seeded::SeededRng;
use super::types::{Synthesis, TimeSeriesPoint};

const WEEKDAY_LABELS: [&str; 7] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];
const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const WEEKDAY_MAX_HOURS: f64 = 8.0;
const WEEKEND_MAX_HOURS: f64 = 3.0;

/// Something that can report arc time for a calendar window.
///
/// [`SyntheticArcTime`] is the only implementation today; a telemetry-backed
/// source would implement the same trait.
pub trait ArcTimeSource: Send + Sync {
    fn arc_time(&self, range: &DateRange) -> Synthesis;
}

/// Seeded synthetic source.
#[derive(Debug, Clone, Copy, Default)]
pub struct SyntheticArcTime;

impl ArcTimeSource for SyntheticArcTime {
    fn arc_time(&self, range: &DateRange) -> Synthesis {
        let mut rng = SeededRng::new(range.seed());
        synthesize(range, &mut rng)
    }
}

/// Build the series for `range`, drawing from `rng`.
pub fn synthesize(range: &DateRange, rng: &mut SeededRng) -> Synthesis {
    let raw: Vec<(String, f64)> = match range.kind {
        RangeKind::Week => WEEKDAY_LABELS
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let max_hours = if i >= 5 {
                    WEEKEND_MAX_HOURS
                } else {
                    WEEKDAY_MAX_HOURS
                };
                let base = rng.next_f64();
                let noise = rng.next_f64();
                (label.to_string(), base * max_hours + (noise - 0.5))
            })
            .collect(),
        RangeKind::Month => {
            let days = range.day_count();
            (0..days)
                .map(|i| {
                    let f = (f64::from(i) / f64::from(days) * PI).sin();
                    let base = rng.next_f64();
                    let noise = rng.next_f64();
                    (
                        format!("{:02}", i + 1),
                        base * 10.0 * (0.5 + f * 0.7) + (noise - 0.5),
                    )
                })
                .collect()
        }
        RangeKind::Year => MONTH_LABELS
            .iter()
            .enumerate()
            .map(|(i, label)| {
                let f = (i as f64 / 11.0 * PI).sin();
                let base = rng.next_f64();
                let noise = rng.next_f64();
                (
                    label.to_string(),
                    base * 150.0 * (0.6 + f * 0.5) + (noise * 20.0 - 10.0),
                )
            })
            .collect(),
    };

    let mut total_arc_seconds = 0u64;
    let series = raw
        .into_iter()
        .map(|(label, value)| {
            let value = round_tenth(value.max(0.0));
            total_arc_seconds += arc_seconds(value);
            TimeSeriesPoint { label, value }
        })
        .collect();

    Synthesis {
        series,
        total_arc_seconds,
    }
}

/// Round half away from zero to one decimal place.
fn round_tenth(hours: f64) -> f64 {
    (hours * 10.0).round() / 10.0
}

/// Seconds contributed by a displayed hour value.
pub fn arc_seconds(hours: f64) -> u64 {
    (hours * 3600.0).round().max(0.0) as u64
}
