// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate one run: resolve the window, build the fetcher, then browse, export or summarize
// role: processing/orchestrator
// inputs: EffectiveConfig, Transport (real or fixture)
// outputs: JSON on stdout (browse page, export table or pointer, summary, empty-result warning); export file on disk
// side_effects: Network calls through the transport; writes the export file; prints to stdout/stderr
// invariants:
// - The remote always receives the visible span padded one day earlier
// - Browse and export bucket with the same DayOffset
// - A failed full scan never produces a partial table or file
// - An empty result prints {"warning": ...} and writes no file
// - Export to a file prints the pointer {file, rows, dropped}
// errors: Fetch/navigation/span errors bubble as anyhow with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::info;

use crate::aggregate::{aggregate, AggregateOutcome};
use crate::cli::{EffectiveConfig, Mode};
use crate::error::NavigationError;
use crate::export::{export_file_name, write_export};
use crate::model::{BrowseView, DateSpan, MonthSummary, TimeLogFilter, TimeLogRecord};
use crate::navigator::CursorNavigator;
use crate::remote::transport::FIXTURE_NODES_ENV;
use crate::remote::{build_transport, get_access_token, FullScanFetcher, PagedFetcher};
use crate::span::{fetch_filter, parse_now_override, resolve_span};
use crate::summary::working_days_summary;
use crate::util::{self, Destination};

const EMPTY_WARNING: &str = "No time logs found for the selected range";

#[derive(Serialize)]
struct BrowseReport<'a> {
  span: DateSpan,
  username: Option<&'a str>,
  #[serde(flatten)]
  view: BrowseView,
}

#[derive(Serialize)]
struct SummaryReport<'a> {
  span: DateSpan,
  username: &'a str,
  months: Vec<MonthSummary>,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
  println!("{}", serde_json::to_string_pretty(value)?);
  Ok(())
}

pub fn run(cfg: &EffectiveConfig) -> Result<()> {
  let now = util::effective_now(parse_now_override(cfg.now_override.as_deref()));
  let visible = resolve_span(&cfg.window, now)?;
  let filter = fetch_filter(&visible, cfg.username.as_deref());

  if cfg.group.is_empty() && std::env::var_os(FIXTURE_NODES_ENV).is_none() {
    bail!("no group to query: pass --group or set TIMELOG_GROUP_ID");
  }

  let transport = build_transport(&cfg.endpoint, get_access_token())?;
  let fetcher = PagedFetcher::new(transport, cfg.group.clone());

  info!(from = %visible.from, to = %visible.to, mode = ?cfg.mode, "resolved window");

  match cfg.mode {
    Mode::Browse => run_browse(cfg, &fetcher, filter, visible),
    Mode::Export => run_export(cfg, &fetcher, &filter, visible),
    Mode::Summary => run_summary(cfg, &fetcher, &filter, visible),
  }
}

pub fn run_browse(cfg: &EffectiveConfig, fetcher: &PagedFetcher, filter: TimeLogFilter, visible: DateSpan) -> Result<()> {
  let mut nav = CursorNavigator::new(fetcher.clone());
  nav.go_to_first_page(filter, cfg.page_size).context("loading first page")?;

  for n in 1..cfg.page {
    match nav.go_next() {
      Ok(_) => {}
      Err(NavigationError::NoNextPage) => bail!("page {} is past the last page ({})", cfg.page, n),
      Err(e) => return Err(e).with_context(|| format!("loading page {}", n + 1)),
    }
  }

  let Some(view) = nav.browse_view(cfg.offset) else {
    bail!("no page loaded");
  };

  print_json(&BrowseReport {
    span: visible,
    username: cfg.username.as_deref(),
    view,
  })
}

fn full_scan(fetcher: &PagedFetcher, filter: &TimeLogFilter) -> Result<Vec<TimeLogRecord>> {
  FullScanFetcher::new(fetcher).fetch_all(filter).context("fetching all time logs")
}

pub fn run_export(cfg: &EffectiveConfig, fetcher: &PagedFetcher, filter: &TimeLogFilter, visible: DateSpan) -> Result<()> {
  let records = full_scan(fetcher, filter)?;

  let table = match aggregate(&records, &visible, cfg.offset) {
    AggregateOutcome::Table(t) => t,
    AggregateOutcome::Empty { dropped } => {
      eprintln!("warning: {EMPTY_WARNING}");
      return print_json(&serde_json::json!({
        "warning": EMPTY_WARNING,
        "span": visible,
        "dropped": dropped.len(),
      }));
    }
  };

  let name = export_file_name(Some(&visible), cfg.username.as_deref(), cfg.format);

  match util::export_destination(&cfg.out, &name)? {
    Destination::Stdout => {
      let stdout = std::io::stdout();
      let mut lock = stdout.lock();
      write_export(&table, cfg.format, &mut lock).context("writing export to stdout")?;
    }
    Destination::File(path) => {
      let mut buf: Vec<u8> = Vec::new();
      write_export(&table, cfg.format, &mut buf)?;
      std::fs::write(&path, buf).with_context(|| format!("writing {}", path.display()))?;

      print_json(&serde_json::json!({
        "file": path.to_string_lossy(),
        "rows": table.rows.len(),
        "dropped": table.dropped.len(),
      }))?;
    }
  }

  Ok(())
}

pub fn run_summary(cfg: &EffectiveConfig, fetcher: &PagedFetcher, filter: &TimeLogFilter, visible: DateSpan) -> Result<()> {
  let Some(username) = cfg.username.as_deref() else {
    bail!("--summary requires --username");
  };

  let records = full_scan(fetcher, filter)?;
  let outcome = aggregate(&records, &visible, cfg.offset);
  let months = working_days_summary(&visible, &outcome);

  print_json(&SummaryReport {
    span: visible,
    username,
    months,
  })
}
