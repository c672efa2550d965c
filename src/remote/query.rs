// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: GraphQL document, request variables and response decoding for the paginated timelogs query
// role: remote/wire-format
// inputs: group scope, cursor, page size, TimeLogFilter
// outputs: request body JSON; decoded Page values
// invariants:
// - startDate/endDate are the caller's span rendered as YYYY-MM-DD, no date arithmetic here
// - A non-empty `errors` array wins over any partial `data` and yields FetchError::Remote(first message)
// - Undecodable bodies are transport failures, never panics
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FetchError;
use crate::ext::serde_json::JsonFetch;
use crate::model::{Page, TimeLogFilter, TimeLogRecord};

pub const TIMELOGS_QUERY: &str = r#"
query GetTimelogs($groupId: GroupID!, $cursor: String, $first: Int, $startDate: Time, $endDate: Time, $username: String) {
  timelogs(
    groupId: $groupId,
    after: $cursor,
    first: $first,
    startDate: $startDate,
    endDate: $endDate,
    username: $username
  ) {
    count
    pageInfo {
      hasNextPage
      endCursor
    }
    nodes {
      project {
        id
        fullPath
      }
      issue {
        id
      }
      timeSpent
      spentAt
      user {
        id
        username
      }
    }
  }
}
"#;

const WIRE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Build the POST body for one page.
pub fn build_request(group: &str, cursor: Option<&str>, page_size: u32, filter: &TimeLogFilter) -> serde_json::Value {
  let (start, end) = match &filter.span {
    Some(span) => (
      Some(span.from.format(WIRE_DATE_FORMAT).to_string()),
      Some(span.to.format(WIRE_DATE_FORMAT).to_string()),
    ),
    None => (None, None),
  };

  serde_json::json!({
    "query": TIMELOGS_QUERY,
    "variables": {
      "groupId": group,
      "cursor": cursor,
      "first": page_size,
      "startDate": start,
      "endDate": end,
      "username": filter.username,
    }
  })
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NodeProject {
  id: String,
  full_path: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeIssue {
  id: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct NodeUser {
  id: String,
  username: String,
}

/// Wire shape of one `timelogs.nodes[]` element.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimelogNode {
  project: NodeProject,
  // Timelogs booked on merge requests carry no issue
  issue: Option<NodeIssue>,
  time_spent: u64,
  spent_at: DateTime<Utc>,
  user: NodeUser,
}

impl From<TimelogNode> for TimeLogRecord {
  fn from(node: TimelogNode) -> Self {
    TimeLogRecord {
      project_id: node.project.id,
      project_path: node.project.full_path,
      issue_id: node.issue.map(|i| i.id).unwrap_or_default(),
      user_id: node.user.id,
      username: node.user.username,
      time_spent_seconds: node.time_spent,
      spent_at: node.spent_at,
    }
  }
}

/// Wire representation of a record, used by in-memory sources.
pub fn encode_node(record: &TimeLogRecord) -> serde_json::Value {
  let node = TimelogNode {
    project: NodeProject {
      id: record.project_id.clone(),
      full_path: record.project_path.clone(),
    },
    issue: (!record.issue_id.is_empty()).then(|| NodeIssue {
      id: record.issue_id.clone(),
    }),
    time_spent: record.time_spent_seconds,
    spent_at: record.spent_at,
    user: NodeUser {
      id: record.user_id.clone(),
      username: record.username.clone(),
    },
  };

  serde_json::to_value(node).unwrap_or(serde_json::Value::Null)
}

/// Decode a JSON array of wire nodes into records.
pub fn decode_nodes(nodes: &serde_json::Value) -> Result<Vec<TimeLogRecord>, FetchError> {
  let nodes: Vec<TimelogNode> = serde_json::from_value(nodes.clone())
    .map_err(|e| FetchError::transport(format!("invalid timelog nodes: {e}")))?;

  Ok(nodes.into_iter().map(TimeLogRecord::from).collect())
}

/// Decode a full GraphQL response body into a Page.
pub fn decode_page(body: &serde_json::Value) -> Result<Page, FetchError> {
  if let Some(errors) = body.fetch("errors").array() {
    if let Some(first) = errors.first() {
      let message = first
        .fetch("message")
        .to::<String>()
        .unwrap_or_else(|| "unknown remote error".to_string());
      return Err(FetchError::Remote(message));
    }
  }

  let timelogs = body
    .fetch("data.timelogs")
    .value()
    .ok_or_else(|| FetchError::transport("response has no data.timelogs"))?;

  let records = match timelogs.fetch("nodes").value() {
    Some(nodes) => decode_nodes(nodes)?,
    None => Vec::new(),
  };

  let has_next: bool = timelogs.fetch("pageInfo.hasNextPage").to_or_default();
  let next_cursor = timelogs.fetch("pageInfo.endCursor").to::<String>();
  let total_count = timelogs
    .fetch("count")
    .to::<u64>()
    .ok_or_else(|| FetchError::transport("response has no timelogs count"))?;

  Ok(Page {
    records,
    next_cursor,
    has_next,
    total_count,
  })
}
