//! Calendar window resolution for analytics queries.
//!
//! All arithmetic is on `NaiveDate` in UTC terms, so period boundaries never
//! depend on the host timezone.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::WeldError;

/// Granularity of an analytics window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeKind {
    Week,
    Month,
    Year,
}

impl RangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeKind::Week => "week",
            RangeKind::Month => "month",
            RangeKind::Year => "year",
        }
    }
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RangeKind {
    type Err = WeldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "week" => Ok(RangeKind::Week),
            "month" => Ok(RangeKind::Month),
            "year" => Ok(RangeKind::Year),
            other => Err(WeldError::InvalidRange(format!(
                "'{}' (expected week, month or year)",
                other
            ))),
        }
    }
}

/// An inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub kind: RangeKind,
    /// ISO-8601 week-numbering year and week, set for week ranges only.
    pub iso_week: Option<(i32, u32)>,
}

impl DateRange {
    /// Number of calendar days covered, both ends included.
    pub fn day_count(&self) -> u32 {
        ((self.end - self.start).num_days() + 1) as u32
    }

    /// Seed that identifies this period.
    ///
    /// week: isoYear * 100 + isoWeek, month: year * 100 + month (1-based),
    /// year: year. Wraps into 32 bits.
    pub fn seed(&self) -> u32 {
        let seed: i64 = match (self.kind, self.iso_week) {
            (RangeKind::Week, Some((year, week))) => i64::from(year) * 100 + i64::from(week),
            (RangeKind::Week, None) => {
                let iso = self.start.iso_week();
                i64::from(iso.year()) * 100 + i64::from(iso.week())
            }
            (RangeKind::Month, _) => {
                i64::from(self.start.year()) * 100 + i64::from(self.start.month())
            }
            (RangeKind::Year, _) => i64::from(self.start.year()),
        };
        seed as u32
    }
}

/// Parse a reference date: `YYYY-MM-DD`, or an RFC 3339 timestamp whose UTC
/// calendar date is used. Years outside 1..=9999 are rejected.
pub fn parse_reference_date(input: &str) -> Result<NaiveDate, WeldError> {
    let trimmed = input.trim();
    let date = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(trimmed)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
        .ok_or_else(|| WeldError::InvalidDate(format!("'{}'", input)))?;

    if !(1..=9999).contains(&date.year()) {
        return Err(WeldError::InvalidDate(format!(
            "'{}' (year out of range)",
            input
        )));
    }
    Ok(date)
}

/// Resolve the window of `kind` that contains `reference`.
///
/// Reference years outside 1..=9999 are an `InvalidDate`, which keeps every
/// window edge (and the ISO week's Thursday) inside chrono's date range.
pub fn resolve(reference: NaiveDate, kind: RangeKind) -> Result<DateRange, WeldError> {
    if !(1..=9999).contains(&reference.year()) {
        return Err(WeldError::InvalidDate(format!(
            "'{}' (year out of range)",
            reference
        )));
    }

    let range = match kind {
        RangeKind::Week => {
            let dow = reference.weekday().number_from_monday() as i64;
            let start = reference - Duration::days(dow - 1);
            let end = start + Duration::days(6);
            DateRange {
                start,
                end,
                kind,
                iso_week: Some(iso_week_of(reference)),
            }
        }
        RangeKind::Month => {
            let start = first_of_month(reference.year(), reference.month());
            let end = last_of_month(reference.year(), reference.month());
            DateRange {
                start,
                end,
                kind,
                iso_week: None,
            }
        }
        RangeKind::Year => DateRange {
            start: ymd(reference.year(), 1, 1),
            end: ymd(reference.year(), 12, 31),
            kind,
            iso_week: None,
        },
    };
    Ok(range)
}

/// String-level entry point: parses both inputs, then resolves.
pub fn resolve_str(reference: &str, kind: &str) -> Result<DateRange, WeldError> {
    let kind = RangeKind::from_str(kind)?;
    let reference = parse_reference_date(reference)?;
    resolve(reference, kind)
}

/// ISO week via the Thursday of the same week: the Thursday's year is the
/// week-numbering year, and its zero-based day of year gives the week number.
fn iso_week_of(date: NaiveDate) -> (i32, u32) {
    let dow = date.weekday().number_from_monday() as i64;
    let thursday = date + Duration::days(4 - dow);
    let day_of_year0 = thursday.ordinal0();
    (thursday.year(), (day_of_year0 + 1).div_ceil(7))
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or(NaiveDate::MIN)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    ymd(year, month, 1)
}

fn last_of_month(year: i32, month: u32) -> NaiveDate {
    if month == 12 {
        return ymd(year, 12, 31);
    }
    first_of_month(year, month + 1) - Duration::days(1)
}
