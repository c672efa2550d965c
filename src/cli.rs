// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Command-line surface and its normalization into an EffectiveConfig (flags + env fallbacks)
// role: cli/config
// inputs: argv via clap derive; env TIMELOG_GRAPHQL_URL, TIMELOG_GROUP_ID
// outputs: EffectiveConfig consumed by process::run
// invariants:
// - At most one window selector (--from/--to, --month, --for); none selects the default window
// - --from and --to come as a pair
// - page size is a positive integer; page is 1-based
// - Exactly one mode: browse (default), --export, or --summary
// errors: anyhow bail! with user-facing messages
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::num::NonZeroU32;

use anyhow::{bail, Result};
use clap::Parser;
use serde::Serialize;

use crate::bucketing::DayOffset;
use crate::export::ExportFormat;
use crate::navigator::DEFAULT_PAGE_SIZE;
use crate::span::WindowSpec;

pub const DEFAULT_ENDPOINT: &str = "https://gitlab.com/api/graphql";
pub const ENDPOINT_ENV: &str = "TIMELOG_GRAPHQL_URL";
pub const GROUP_ENV: &str = "TIMELOG_GROUP_ID";

#[derive(Parser, Debug)]
#[command(
    name = "timelog-report",
    version,
    about = "Browse, export and summarize GitLab time logs for a group",
    long_about = None
)]
pub struct Cli {
  /// GraphQL endpoint (default: $TIMELOG_GRAPHQL_URL or https://gitlab.com/api/graphql)
  #[arg(long)]
  pub endpoint: Option<String>,

  /// Group global id to query, e.g. gid://gitlab/Group/42 (default: $TIMELOG_GROUP_ID)
  #[arg(long)]
  pub group: Option<String>,

  /// First visible day, YYYY-MM-DD; must be paired with --to
  #[arg(long)]
  pub from: Option<String>,

  /// Last visible day (inclusive), YYYY-MM-DD; must be paired with --from
  #[arg(long)]
  pub to: Option<String>,

  /// Calendar month, e.g. 2025-08
  #[arg(long)]
  pub month: Option<String>,

  /// Natural language window, e.g. "last week" or "2 weeks ago"
  #[arg(long = "for")]
  pub for_str: Option<String>,

  /// Only time logs booked by this username
  #[arg(long)]
  pub username: Option<String>,

  /// Hours added to UTC instants before taking the calendar day
  #[arg(long, default_value_t = DayOffset::DEFAULT_HOURS, allow_hyphen_values = true)]
  pub offset_hours: i32,

  /// Rows per browse page
  #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
  pub page_size: u32,

  /// Browse page to show (1-based), reached by following next-page cursors
  #[arg(long, default_value_t = 1)]
  pub page: usize,

  /// Fetch every page and write the (project, user) x day pivot table
  #[arg(long)]
  pub export: bool,

  /// Export format; xlsx needs --out
  #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
  pub format: ExportFormat,

  /// Export destination: "-" for stdout, a directory (suggested file name is used), or a file path
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Working-days summary per month (requires --username)
  #[arg(long)]
  pub summary: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant for window resolution (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
  Browse,
  Export,
  Summary,
}

#[derive(Debug, Serialize)]
pub struct EffectiveConfig {
  pub endpoint: String,
  pub group: String,
  pub window: WindowSpec,
  pub username: Option<String>,
  #[serde(skip)]
  pub offset: DayOffset,
  pub page_size: NonZeroU32,
  pub page: usize,
  pub mode: Mode,
  pub format: ExportFormat,
  pub out: String,
  pub now_override: Option<String>,
}

fn non_empty(v: Option<String>) -> Option<String> {
  v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  // Validate window selection
  let window = match (&cli.from, &cli.to, &cli.month, &cli.for_str) {
    (Some(f), Some(t), None, None) => WindowSpec::Range {
      from: f.clone(),
      to: t.clone(),
    },
    (None, None, Some(ym), None) => WindowSpec::Month { ym: ym.clone() },
    (None, None, None, Some(p)) => WindowSpec::ForPhrase { phrase: p.clone() },
    (None, None, None, None) => WindowSpec::Default,
    (Some(_), None, None, None) | (None, Some(_), None, None) => bail!("--from and --to must be given together"),
    _ => bail!("Ambiguous time selection: choose only one of --from/--to | --month | --for"),
  };

  let mode = match (cli.export, cli.summary) {
    (false, false) => Mode::Browse,
    (true, false) => Mode::Export,
    (false, true) => Mode::Summary,
    (true, true) => bail!("Choose only one of --export or --summary"),
  };

  let username = non_empty(cli.username);
  if mode == Mode::Summary && username.is_none() {
    bail!("--summary requires --username");
  }

  let Some(page_size) = NonZeroU32::new(cli.page_size) else {
    bail!("--page-size must be a positive integer");
  };
  if cli.page == 0 {
    bail!("--page is 1-based");
  }

  if mode == Mode::Export && cli.format.is_binary() && cli.out.trim() == "-" {
    bail!("--format {} needs --out with a directory or file path", cli.format.extension());
  }

  let offset = DayOffset::from_hours(cli.offset_hours)?;

  let endpoint = non_empty(cli.endpoint)
    .or_else(|| non_empty(std::env::var(ENDPOINT_ENV).ok()))
    .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
  let group = non_empty(cli.group)
    .or_else(|| non_empty(std::env::var(GROUP_ENV).ok()))
    .unwrap_or_default();

  Ok(EffectiveConfig {
    endpoint,
    group,
    window,
    username,
    offset,
    page_size,
    page: cli.page,
    mode,
    format: cli.format,
    out: cli.out,
    now_override: cli.now_override,
  })
}
