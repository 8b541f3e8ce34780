//! Year boundaries and day counting for a reference instant

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::{Error, Result};

/// Temporal facts about the year containing a reference instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Temporal {
    pub year: i32,
    /// 365 or 366
    pub total_days: u32,
    /// Fully completed days since Jan 1, in `[0, total_days)`
    pub elapsed_days: u32,
    /// Empty leading cells before day 0, Monday = 0 .. Sunday = 6
    pub weekday_offset: u32,
}

impl Temporal {
    pub fn is_leap_year(&self) -> bool {
        self.total_days == 366
    }
}

/// First and last day of a year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl YearWindow {
    pub fn for_year(year: i32) -> Result<Self> {
        let start = NaiveDate::from_ymd_opt(year, 1, 1)
            .ok_or_else(|| Error::InvalidDateInput(format!("year {year} is out of range")))?;
        let end = NaiveDate::from_ymd_opt(year, 12, 31)
            .ok_or_else(|| Error::InvalidDateInput(format!("year {year} is out of range")))?;
        Ok(Self { start, end })
    }

    /// Inclusive number of days in the window.
    pub fn total_days(&self) -> u32 {
        (self.end - self.start).num_days() as u32 + 1
    }
}

/// Derive year length, elapsed days and weekday offset from `now`.
///
/// The reference instant is always passed in; nothing here reads the clock.
pub fn compute_temporal(now: NaiveDateTime) -> Result<Temporal> {
    let window = YearWindow::for_year(now.year())?;
    let start = window.start.and_time(chrono::NaiveTime::MIN);

    // num_days truncates the partial day in progress
    let elapsed_days = (now - start).num_days() as u32;

    Ok(Temporal {
        year: now.year(),
        total_days: window.total_days(),
        elapsed_days,
        weekday_offset: window.start.weekday().num_days_from_monday(),
    })
}

/// Parse a reference date.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM:SS` (optionally with fractional
/// seconds or a space separator) and RFC 3339. Offset timestamps keep the
/// wall-clock time of their own offset.
pub fn parse_reference_date(input: &str) -> Result<NaiveDateTime> {
    let s = input.trim();
    if s.is_empty() {
        return Err(Error::InvalidDateInput("empty date".into()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.and_time(chrono::NaiveTime::MIN));
    }

    Err(Error::InvalidDateInput(s.to_string()))
}
