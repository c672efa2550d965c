// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the time-log data model (records, pages, filters, pivot rows, browse and summary views)
// role: model/types
// outputs: Serializable structs with stable field names used by fetchers, aggregation and CLI output
// invariants:
// - TimeLogRecord is immutable once decoded; spent_at is normalized to UTC
// - Page.total_count is the remote count for the whole filter, never recomputed locally
// - DateSpan is inclusive on both ends and from <= to
// - PivotRow.hours_by_day holds exactly one entry per day of the aggregated span
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::bucketing::day_key;
use crate::error::SpanError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimeLogRecord {
  pub project_id: String,
  pub project_path: String,
  pub issue_id: String,
  pub user_id: String,
  pub username: String,
  pub time_spent_seconds: u64,
  pub spent_at: DateTime<Utc>,
}

/// One window of a filtered result set as returned by the remote source.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Page {
  pub records: Vec<TimeLogRecord>,
  pub next_cursor: Option<String>,
  pub has_next: bool,
  pub total_count: u64,
}

/// Inclusive calendar-day span.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
  pub from: NaiveDate,
  pub to: NaiveDate,
}

impl DateSpan {
  pub fn new(from: NaiveDate, to: NaiveDate) -> Result<Self, SpanError> {
    if to < from {
      return Err(SpanError::EndBeforeStart);
    }

    Ok(Self { from, to })
  }

  /// Every day of the span, ascending.
  pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
    let to = self.to;
    self.from.iter_days().take_while(move |d| *d <= to)
  }

  pub fn day_keys(&self) -> Vec<String> {
    self.days().map(day_key).collect()
  }

  pub fn len_days(&self) -> usize {
    ((self.to - self.from).num_days() + 1) as usize
  }

  pub fn contains(&self, day: NaiveDate) -> bool {
    self.from <= day && day <= self.to
  }

  /// Same span starting one calendar day earlier; what gets sent to the remote
  /// source so records that shift onto the first visible day are not lost.
  pub fn padded_previous_day(&self) -> Self {
    Self {
      from: self.from - Duration::days(1),
      to: self.to,
    }
  }
}

/// Server-side filter for a query; the span is sent verbatim.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct TimeLogFilter {
  pub span: Option<DateSpan>,
  pub username: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PivotRow {
  pub project_id: String,
  pub project_name: String,
  pub username: String,
  pub hours_by_day: BTreeMap<String, f64>,
}

/// A record whose bucketed day fell outside the aggregated span.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct OutOfRangeRecord {
  pub project_id: String,
  pub username: String,
  pub spent_at: DateTime<Utc>,
  pub day: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PivotTable {
  pub span: DateSpan,
  pub day_keys: Vec<String>,
  pub rows: Vec<PivotRow>,
  #[serde(skip_serializing_if = "Vec::is_empty", default)]
  pub dropped: Vec<OutOfRangeRecord>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BrowseRow {
  pub user: String,
  pub project: String,
  pub issue: String,
  pub time_spent: String,
  pub date: String,
}

/// The "showing X to Y of Z" line; `from` is 1-based.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct ShowingRange {
  pub from: u64,
  pub to: u64,
  pub total: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct BrowseView {
  pub page_number: usize,
  pub page_size: u32,
  pub showing: ShowingRange,
  pub has_previous: bool,
  pub has_next: bool,
  pub rows: Vec<BrowseRow>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum MonthStatus {
  Complete,
  Incomplete,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MonthSummary {
  pub month: String,
  pub working_days: u32,
  pub expected_hours: f64,
  pub reported_hours: f64,
  pub missing_hours: f64,
  pub status: MonthStatus,
}
