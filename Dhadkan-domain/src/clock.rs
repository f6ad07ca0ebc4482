//! Time source for everything that stamps or windows screenings.
//!
//! Timestamps are stored as UTC `YYYY-MM-DD HH:MM:SS` text, which sorts
//! lexicographically, so report windows are plain string bounds.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// Storage format of every timestamp column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Shown instead of a date when something never happened
pub const NEVER: &str = "कभी नहीं";

/// Source of "now"
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    /// Current time in storage format
    fn timestamp(&self) -> String {
        format_timestamp(self.now())
    }
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Wall clock moved by a fixed UTC offset. Stored timestamps and the
/// today/week/month windows then follow the deployment's local calendar.
#[derive(Debug, Clone, Copy)]
pub struct OffsetClock {
    offset_minutes: i32,
}

impl OffsetClock {
    /// `offset_minutes` east of UTC, e.g. 330 for IST
    pub fn new(offset_minutes: i32) -> Self {
        Self { offset_minutes }
    }
}

impl Clock for OffsetClock {
    fn now(&self) -> DateTime<Utc> {
        shift(Utc::now(), self.offset_minutes)
    }
}

/// `at` read as local wall time `offset_minutes` east of UTC
pub fn shift(at: DateTime<Utc>, offset_minutes: i32) -> DateTime<Utc> {
    at + Duration::minutes(i64::from(offset_minutes))
}

/// Clock frozen at one instant, for tests and reproducible reports
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn format_timestamp(at: DateTime<Utc>) -> String {
    at.format(TIMESTAMP_FORMAT).to_string()
}

/// Midnight of `date` in storage format
pub fn start_of_day(date: NaiveDate) -> String {
    format!("{} 00:00:00", date.format("%Y-%m-%d"))
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT).ok()
}

/// `dd/mm/YYYY`; unparseable input is returned unchanged
pub fn display_date(value: &str) -> String {
    parse_timestamp(value)
        .map(|t| t.format("%d/%m/%Y").to_string())
        .unwrap_or_else(|| value.to_string())
}

/// `dd/mm/YYYY HH:MM`; unparseable input is returned unchanged
pub fn display_datetime(value: &str) -> String {
    parse_timestamp(value)
        .map(|t| t.format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| value.to_string())
}

/// Display date of an optional last activity, or [`NEVER`]
pub fn display_last(value: Option<&str>) -> String {
    value.map(display_date).unwrap_or_else(|| NEVER.to_string())
}
