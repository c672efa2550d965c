// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Resolve the user-visible window (explicit range, month, natural phrase, default) to an inclusive DateSpan
// role: time/windowing
// inputs: WindowSpec from the CLI; "now" (real clock or --now-override)
// outputs: Visible DateSpan; padded fetch filter for the remote source
// invariants:
// - Every resolved span is inclusive on both ends with from <= to
// - Month windows cover the first through the last calendar day of the month
// - Phrase windows never end after today unless the phrase itself is forward-looking
// - The fetch span is the visible span padded one day earlier; nothing else is adjusted
// errors: SpanError (EndBeforeStart, InvalidDate, InvalidMonth, UnknownPhrase)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, Weekday};
use chrono_english::{parse_duration, Interval};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use two_timer::parse as parse_natural;

use crate::error::SpanError;
use crate::model::{DateSpan, TimeLogFilter};

/// Days after today covered by the default window.
pub const DEFAULT_WINDOW_DAYS: i64 = 7;

const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

static MONTH_RE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"^(\d{4})-(\d{1,2})$").ok());
static LAST_WEEKDAY_RE: Lazy<Option<Regex>> =
  Lazy::new(|| Regex::new(r"^last\s+(monday|tuesday|wednesday|thursday|friday|saturday|sunday)$").ok());

#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub enum WindowSpec {
  Range { from: String, to: String },
  Month { ym: String },
  ForPhrase { phrase: String },
  Default,
}

pub fn parse_day(raw: &str) -> Result<NaiveDate, SpanError> {
  NaiveDate::parse_from_str(raw.trim(), INPUT_DATE_FORMAT).map_err(|_| SpanError::InvalidDate(raw.to_string()))
}

pub fn month_bounds(year_month: &str) -> Result<DateSpan, SpanError> {
  let invalid = || SpanError::InvalidMonth(year_month.to_string());

  let caps = MONTH_RE
    .as_ref()
    .and_then(|re| re.captures(year_month.trim()))
    .ok_or_else(invalid)?;
  let y: i32 = caps[1].parse().map_err(|_| invalid())?;
  let m: u32 = caps[2].parse().map_err(|_| invalid())?;

  let first = NaiveDate::from_ymd_opt(y, m, 1).ok_or_else(invalid)?;
  let last = first
    .checked_add_months(Months::new(1))
    .and_then(|d| d.pred_opt())
    .ok_or_else(invalid)?;

  DateSpan::new(first, last)
}

/// today .. today + DEFAULT_WINDOW_DAYS
pub fn default_span(today: NaiveDate) -> DateSpan {
  DateSpan {
    from: today,
    to: today + Duration::days(DEFAULT_WINDOW_DAYS),
  }
}

/// Parse a `--now-override` string into a local DateTime.
/// Accepts RFC3339 (e.g. 2025-08-15T12:00:00Z) or a naive local timestamp
/// formatted as `%Y-%m-%dT%H:%M:%S`.
pub fn parse_now_override(s: Option<&str>) -> Option<DateTime<Local>> {
  s.and_then(|raw| {
    DateTime::parse_from_rfc3339(raw)
      .ok()
      .map(|dt| dt.with_timezone(&Local))
      .or_else(|| {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
          .ok()
          .and_then(|ndt| ndt.and_local_timezone(Local).single())
      })
  })
}

fn span_between(from: NaiveDate, to: NaiveDate) -> DateSpan {
  if from <= to {
    DateSpan { from, to }
  } else {
    DateSpan { from: to, to: from }
  }
}

fn weekday_from_name(name: &str) -> Option<Weekday> {
  name.parse::<Weekday>().ok()
}

/// Resolve a natural-language phrase against `now` (local wall clock).
pub fn phrase_span(input: &str, now: NaiveDateTime) -> Result<DateSpan, SpanError> {
  let phrase = input.trim().to_lowercase();
  let today = now.date();

  match phrase.as_str() {
    "today" => return Ok(span_between(today, today)),
    "yesterday" => {
      let y = today - Duration::days(1);
      return Ok(span_between(y, y));
    }
    // Previous calendar week, Monday through Sunday
    "last week" => {
      let this_monday = today - Duration::days(today.weekday().num_days_from_monday() as i64);
      let from = this_monday - Duration::days(7);
      return Ok(span_between(from, this_monday - Duration::days(1)));
    }
    "last month" => {
      let first_this = today.with_day(1).unwrap_or(today);
      let last_prev = first_this.pred_opt().unwrap_or(first_this);
      let first_prev = last_prev.with_day(1).unwrap_or(last_prev);
      return Ok(span_between(first_prev, last_prev));
    }
    _ => {}
  }

  // Strictly previous occurrence of the weekday, through today
  if let Some(caps) = LAST_WEEKDAY_RE.as_ref().and_then(|re| re.captures(&phrase)) {
    if let Some(target) = weekday_from_name(&caps[1]) {
      let cur = today.weekday().num_days_from_monday() as i64;
      let mut delta = cur - target.num_days_from_monday() as i64;
      if delta <= 0 {
        delta += 7;
      }
      return Ok(span_between(today - Duration::days(delta), today));
    }
  }

  // Relative durations: "2 weeks ago" reaches back, "3 days" reaches forward
  if let Ok(interval) = parse_duration(&phrase) {
    let other = match interval {
      Interval::Seconds(secs) => (now + Duration::seconds(secs.into())).date(),
      Interval::Days(days) => today + Duration::days(days.into()),
      Interval::Months(months) => {
        let shifted = if months < 0 {
          today.checked_sub_months(Months::new(months.unsigned_abs()))
        } else {
          today.checked_add_months(Months::new(months as u32))
        };
        shifted.unwrap_or(today)
      }
    };

    return Ok(span_between(other, today));
  }

  // Calendar ranges from the natural-language parser; its end is exclusive.
  if let Ok((start, end, _)) = parse_natural(&phrase, Some(two_timer::Config::new().now(now))) {
    let from = start.date();
    let last = (end - Duration::seconds(1)).date();
    let to = if from <= today { last.min(today) } else { last };
    return Ok(span_between(from, to.max(from)));
  }

  Err(SpanError::UnknownPhrase(input.to_string()))
}

/// Resolve the visible, inclusive span for a window.
pub fn resolve_span(window: &WindowSpec, now: DateTime<Local>) -> Result<DateSpan, SpanError> {
  let now = now.naive_local();

  match window {
    WindowSpec::Range { from, to } => DateSpan::new(parse_day(from)?, parse_day(to)?),
    WindowSpec::Month { ym } => month_bounds(ym),
    WindowSpec::ForPhrase { phrase } => phrase_span(phrase, now),
    WindowSpec::Default => Ok(default_span(now.date())),
  }
}

/// Filter sent to the remote source for a visible span: one day of padding
/// before the first visible day, so records shifted onto it are fetched.
pub fn fetch_filter(visible: &DateSpan, username: Option<&str>) -> TimeLogFilter {
  TimeLogFilter {
    span: Some(visible.padded_previous_day()),
    username: username.map(str::to_string),
  }
}
