// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Transport seam for the remote timelogs service (HTTP via ureq, in-memory static source, env fixtures)
// role: remote/transport
// inputs: endpoint + access token from configuration; env TLR_TEST_* fixtures in tests
// outputs: Raw GraphQL response bodies as serde_json::Value
// side_effects: HTTP POSTs to the configured endpoint
// invariants:
// - One post_json call is one network round trip; no retries, no caching
// - Non-success HTTP statuses map to FetchError::Transport with the status code
// - StaticTransport paginates exactly like the remote: opaque endCursor, total count across pages
// errors: FetchError only; callers decide whether to surface or abort
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::NaiveDate;

use crate::error::FetchError;
use crate::ext::serde_json::JsonFetch;
use crate::model::TimeLogRecord;
use crate::remote::query::{decode_nodes, encode_node};

pub const FIXTURE_NODES_ENV: &str = "TLR_TEST_TIMELOGS_JSON";
pub const FIXTURE_ERROR_ENV: &str = "TLR_TEST_GRAPHQL_ERROR";

const USER_AGENT: &str = "timelog-report";
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Something that can carry one GraphQL request to the remote source.
pub trait Transport: Send + Sync {
  fn post_json(&self, body: &serde_json::Value) -> Result<serde_json::Value, FetchError>;
}

/// Discover an access token: GITLAB_TOKEN first, then TIMELOG_TOKEN.
pub fn get_access_token() -> Option<String> {
  for key in ["GITLAB_TOKEN", "TIMELOG_TOKEN"] {
    if let Ok(t) = std::env::var(key) {
      if !t.trim().is_empty() {
        return Some(t.trim().to_string());
      }
    }
  }

  None
}

pub struct HttpTransport {
  endpoint: String,
  token: String,
  agent: ureq::Agent,
}

impl HttpTransport {
  pub fn new(endpoint: impl Into<String>, token: impl Into<String>) -> Self {
    let agent = ureq::AgentBuilder::new().timeout(HTTP_TIMEOUT).build();

    Self {
      endpoint: endpoint.into(),
      token: token.into(),
      agent,
    }
  }
}

impl Transport for HttpTransport {
  fn post_json(&self, body: &serde_json::Value) -> Result<serde_json::Value, FetchError> {
    let resp = self
      .agent
      .post(&self.endpoint)
      .set("Content-Type", "application/json")
      .set("User-Agent", USER_AGENT)
      .set("Authorization", &format!("Bearer {}", self.token))
      .send_json(body);

    match resp {
      Ok(r) => r
        .into_json::<serde_json::Value>()
        .map_err(|e| FetchError::transport(format!("invalid response body: {e}"))),
      Err(ureq::Error::Status(code, r)) => Err(FetchError::status(code, r.status_text().to_string())),
      Err(ureq::Error::Transport(t)) => Err(FetchError::transport(t.to_string())),
    }
  }
}

/// In-memory paginated source. Applies the same server-side filtering as the
/// remote (literal UTC date of `spentAt` within the inclusive span, exact
/// username) and mints offset-based opaque cursors.
pub struct StaticTransport {
  records: Vec<TimeLogRecord>,
  remote_error: Option<String>,
  requests: Mutex<Vec<serde_json::Value>>,
}

impl StaticTransport {
  pub fn new(records: Vec<TimeLogRecord>) -> Self {
    Self {
      records,
      remote_error: None,
      requests: Mutex::new(Vec::new()),
    }
  }

  /// Answer every request with a GraphQL `errors` payload.
  pub fn with_remote_error(mut self, message: impl Into<String>) -> Self {
    self.remote_error = Some(message.into());
    self
  }

  /// Build from the env fixture variables; `None` when no fixture is configured.
  pub fn from_env() -> Option<Result<Self, FetchError>> {
    let nodes_json = std::env::var(FIXTURE_NODES_ENV).ok()?;

    let built = serde_json::from_str::<serde_json::Value>(&nodes_json)
      .map_err(|e| FetchError::transport(format!("{FIXTURE_NODES_ENV} is not JSON: {e}")))
      .and_then(|v| decode_nodes(&v))
      .map(|records| {
        let transport = StaticTransport::new(records);
        match std::env::var(FIXTURE_ERROR_ENV) {
          Ok(msg) if !msg.trim().is_empty() => transport.with_remote_error(msg),
          _ => transport,
        }
      });

    Some(built)
  }

  /// Variables of every request seen so far, oldest first.
  pub fn requests(&self) -> Vec<serde_json::Value> {
    self.requests.lock().map(|r| r.clone()).unwrap_or_default()
  }

  fn matching(&self, variables: &serde_json::Value) -> Result<Vec<&TimeLogRecord>, FetchError> {
    let start = parse_wire_date(variables.fetch("startDate").to::<String>())?;
    let end = parse_wire_date(variables.fetch("endDate").to::<String>())?;
    let username = variables.fetch("username").to::<String>();

    let out = self
      .records
      .iter()
      .filter(|r| {
        let day = r.spent_at.date_naive();
        start.map(|s| day >= s).unwrap_or(true)
          && end.map(|e| day <= e).unwrap_or(true)
          && username.as_deref().map(|u| r.username == u).unwrap_or(true)
      })
      .collect();

    Ok(out)
  }
}

fn parse_wire_date(raw: Option<String>) -> Result<Option<NaiveDate>, FetchError> {
  match raw {
    None => Ok(None),
    Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
      .map(Some)
      .map_err(|_| FetchError::status(400, format!("bad date variable {s}"))),
  }
}

fn encode_cursor(offset: usize) -> String {
  format!("offset:{offset}")
}

fn decode_cursor(cursor: Option<String>) -> Result<usize, FetchError> {
  match cursor {
    None => Ok(0),
    Some(c) => c
      .strip_prefix("offset:")
      .and_then(|n| n.parse::<usize>().ok())
      .ok_or_else(|| FetchError::status(400, format!("unknown cursor {c}"))),
  }
}

impl Transport for StaticTransport {
  fn post_json(&self, body: &serde_json::Value) -> Result<serde_json::Value, FetchError> {
    let variables = body.fetch("variables").value().cloned().unwrap_or_default();

    if let Ok(mut seen) = self.requests.lock() {
      seen.push(variables.clone());
    }

    if let Some(msg) = &self.remote_error {
      return Ok(serde_json::json!({ "errors": [{ "message": msg }], "data": null }));
    }

    let matching = self.matching(&variables)?;
    let offset = decode_cursor(variables.fetch("cursor").to::<String>())?;
    let first = variables.fetch("first").to::<usize>().unwrap_or(100).max(1);

    let start = offset.min(matching.len());
    let end = (start + first).min(matching.len());
    let nodes: Vec<serde_json::Value> = matching[start..end].iter().map(|r| encode_node(r)).collect();
    let end_cursor = (end > start).then(|| encode_cursor(end));

    Ok(serde_json::json!({
      "data": { "timelogs": {
        "count": matching.len(),
        "pageInfo": { "hasNextPage": end < matching.len(), "endCursor": end_cursor },
        "nodes": nodes,
      }}
    }))
  }
}

/// Pick the transport for a run: env fixtures win, then HTTP with a token.
pub fn build_transport(endpoint: &str, token: Option<String>) -> anyhow::Result<Arc<dyn Transport>> {
  if let Some(fixture) = StaticTransport::from_env() {
    return Ok(Arc::new(fixture?));
  }

  match token {
    Some(t) => Ok(Arc::new(HttpTransport::new(endpoint, t))),
    None => anyhow::bail!("no access token: set GITLAB_TOKEN or TIMELOG_TOKEN"),
  }
}
