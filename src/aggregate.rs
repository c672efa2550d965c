// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Fold time-log records into a (project, user) x day pivot of hours over an inclusive span
// role: domain/aggregation
// inputs: &[TimeLogRecord] from a full scan, requested DateSpan (unpadded), DayOffset
// outputs: AggregateOutcome::Table(PivotTable) or AggregateOutcome::Empty
// side_effects: tracing::warn! per out-of-range record and for empty results
// invariants:
// - Every row has exactly one cell per day of the span, zero-initialized
// - Groups are keyed by (last segment of project id, username); the first record seeds the display name
// - Rows are sorted by (project_name, username) with a stable sort; equal input yields identical output
// - Cells sum whole seconds first and divide by 3600 once, so input order never changes a value
// - Records bucketing outside the span are dropped and reported, never fatal
// errors: none; fetch failures are handled before aggregation
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::collections::BTreeMap;

use tracing::warn;

use crate::bucketing::{bucket_date, day_key, DayOffset};
use crate::display::{last_segment, project_display_name};
use crate::model::{DateSpan, OutOfRangeRecord, PivotRow, PivotTable, TimeLogRecord};

/// Result of aggregation; `Empty` tells the caller to warn instead of writing a blank table.
#[derive(Debug, Clone, PartialEq)]
pub enum AggregateOutcome {
  Empty { dropped: Vec<OutOfRangeRecord> },
  Table(PivotTable),
}

struct Group {
  project_name: String,
  seconds_by_day: BTreeMap<String, u64>,
}

pub fn aggregate(records: &[TimeLogRecord], span: &DateSpan, offset: DayOffset) -> AggregateOutcome {
  let day_keys = span.day_keys();
  let mut groups: BTreeMap<(String, String), Group> = BTreeMap::new();
  let mut dropped: Vec<OutOfRangeRecord> = Vec::new();

  for record in records {
    let day = bucket_date(&record.spent_at, offset);
    let key = day_key(day);

    if !span.contains(day) {
      warn!(
        project = %record.project_id,
        user = %record.username,
        spent_at = %record.spent_at,
        day = %key,
        "dropping record outside requested span"
      );
      dropped.push(OutOfRangeRecord {
        project_id: record.project_id.clone(),
        username: record.username.clone(),
        spent_at: record.spent_at,
        day: key,
      });
      continue;
    }

    let group = groups
      .entry((last_segment(&record.project_id).to_string(), record.username.clone()))
      .or_insert_with(|| Group {
        project_name: project_display_name(&record.project_path),
        seconds_by_day: day_keys.iter().map(|k| (k.clone(), 0)).collect(),
      });

    *group.seconds_by_day.entry(key).or_insert(0) += record.time_spent_seconds;
  }

  if groups.is_empty() {
    warn!(records = records.len(), dropped = dropped.len(), "no time logs in requested span");
    return AggregateOutcome::Empty { dropped };
  }

  let mut rows: Vec<PivotRow> = groups
    .into_iter()
    .map(|((project_id, username), group)| PivotRow {
      project_id,
      project_name: group.project_name,
      username,
      hours_by_day: group
        .seconds_by_day
        .into_iter()
        .map(|(day, secs)| (day, secs as f64 / 3600.0))
        .collect(),
    })
    .collect();

  rows.sort_by(|a, b| {
    a.project_name
      .cmp(&b.project_name)
      .then_with(|| a.username.cmp(&b.username))
  });

  AggregateOutcome::Table(PivotTable {
    span: *span,
    day_keys,
    rows,
    dropped,
  })
}
