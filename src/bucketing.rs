// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Assign a time-log instant to a calendar-day bucket in a fixed target offset
// role: domain/date-bucketing
// inputs: UTC instants (records normalize any source offset to UTC on decode); DayOffset
// outputs: NaiveDate buckets and their YYYY-MM-DD keys
// invariants:
// - Pure: result depends only on the instant and the offset
// - Bucket = UTC instant shifted by the offset, truncated to a date; no other adjustment
// - Browsing and export call the same function so a record never changes day between paths
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::error::BucketError;

/// Day key format used for bucket keys and export columns.
pub const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

/// Fixed offset used to shift instants before taking their calendar day.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct DayOffset {
  hours: i32,
}

impl DayOffset {
  pub const DEFAULT_HOURS: i32 = 1;

  pub fn from_hours(hours: i32) -> Result<Self, BucketError> {
    if !(-23..=23).contains(&hours) {
      return Err(BucketError::OffsetOutOfRange(hours));
    }

    Ok(Self { hours })
  }

  pub fn hours(&self) -> i32 {
    self.hours
  }
}

impl Default for DayOffset {
  fn default() -> Self {
    Self {
      hours: Self::DEFAULT_HOURS,
    }
  }
}

/// Calendar day an instant falls on once shifted by `offset`.
pub fn bucket_date(instant: &DateTime<Utc>, offset: DayOffset) -> NaiveDate {
  (instant.naive_utc() + Duration::hours(offset.hours as i64)).date()
}

/// `YYYY-MM-DD` key of the bucket for `instant`.
pub fn bucket_day(instant: &DateTime<Utc>, offset: DayOffset) -> String {
  day_key(bucket_date(instant, offset))
}

pub fn day_key(date: NaiveDate) -> String {
  date.format(DAY_KEY_FORMAT).to_string()
}
