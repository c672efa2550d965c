// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Per-month working-days summary (expected vs reported hours) for a single user's visible span
// role: domain/summary
// inputs: visible DateSpan, AggregateOutcome of that user's records
// outputs: Vec<MonthSummary> in chronological order
// invariants:
// - Working days are Monday..Friday inside the span; expected = working days x 8
// - Reported hours for a month only count bucketed days inside both that month and the span
// - status is Complete iff missing <= 0
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::aggregate::AggregateOutcome;
use crate::bucketing::day_key;
use crate::model::{DateSpan, MonthStatus, MonthSummary};

pub const HOURS_PER_WORKING_DAY: f64 = 8.0;

pub fn is_working_day(day: NaiveDate) -> bool {
  !matches!(day.weekday(), Weekday::Sat | Weekday::Sun)
}

#[derive(Default)]
struct MonthAcc {
  first_day: Option<NaiveDate>,
  working_days: u32,
  reported_hours: f64,
}

pub fn working_days_summary(span: &DateSpan, outcome: &AggregateOutcome) -> Vec<MonthSummary> {
  let mut daily: BTreeMap<&str, f64> = BTreeMap::new();
  if let AggregateOutcome::Table(table) = outcome {
    for row in &table.rows {
      for (day, hours) in &row.hours_by_day {
        *daily.entry(day.as_str()).or_insert(0.0) += hours;
      }
    }
  }

  let mut months: BTreeMap<(i32, u32), MonthAcc> = BTreeMap::new();
  for day in span.days() {
    let acc = months.entry((day.year(), day.month())).or_default();
    acc.first_day.get_or_insert(day);
    if is_working_day(day) {
      acc.working_days += 1;
    }
    acc.reported_hours += daily.get(day_key(day).as_str()).copied().unwrap_or(0.0);
  }

  months
    .into_values()
    .filter_map(|acc| {
      let first = acc.first_day?;
      let expected_hours = acc.working_days as f64 * HOURS_PER_WORKING_DAY;
      let missing_hours = expected_hours - acc.reported_hours;

      Some(MonthSummary {
        month: first.format("%B %Y").to_string(),
        working_days: acc.working_days,
        expected_hours,
        reported_hours: acc.reported_hours,
        missing_hours,
        status: if missing_hours <= 0.0 {
          MonthStatus::Complete
        } else {
          MonthStatus::Incomplete
        },
      })
    })
    .collect()
}
