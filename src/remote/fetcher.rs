// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Windowed (one page) and exhaustive (all pages) retrieval of time logs over a Transport
// role: remote/fetching
// inputs: Transport, group scope, cursor, page size, TimeLogFilter
// outputs: Page (windowed) or Vec<TimeLogRecord> (full scan)
// side_effects: One network call per page via the transport
// invariants:
// - fetch performs exactly one transport call and no date arithmetic
// - fetch_all is strictly sequential: page N+1 is requested with page N's endCursor
// - fetch_all returns every record exactly once, in arrival order, or an error; never a partial set
// errors: FetchError propagated untranslated
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::num::NonZeroU32;
use std::sync::Arc;

use tracing::{debug, info};

use crate::error::FetchError;
use crate::model::{Page, TimeLogFilter, TimeLogRecord};
use crate::remote::query::{build_request, decode_page};
use crate::remote::transport::Transport;

/// One query against the remote source per call.
#[derive(Clone)]
pub struct PagedFetcher {
  transport: Arc<dyn Transport>,
  group: String,
}

impl PagedFetcher {
  pub fn new(transport: Arc<dyn Transport>, group: impl Into<String>) -> Self {
    Self {
      transport,
      group: group.into(),
    }
  }

  pub fn fetch(&self, cursor: Option<&str>, page_size: NonZeroU32, filter: &TimeLogFilter) -> Result<Page, FetchError> {
    let body = build_request(&self.group, cursor, page_size.get(), filter);
    let response = self.transport.post_json(&body)?;
    let page = decode_page(&response)?;

    debug!(
      cursor = cursor.unwrap_or("<start>"),
      page_size = page_size.get(),
      records = page.records.len(),
      total = page.total_count,
      has_next = page.has_next,
      "fetched timelog page"
    );

    Ok(page)
  }
}

/// Drives a PagedFetcher until the remote reports no further pages.
pub struct FullScanFetcher<'a> {
  pages: &'a PagedFetcher,
}

impl<'a> FullScanFetcher<'a> {
  pub const PAGE_SIZE: u32 = 100;

  pub fn new(pages: &'a PagedFetcher) -> Self {
    Self { pages }
  }

  pub fn fetch_all(&self, filter: &TimeLogFilter) -> Result<Vec<TimeLogRecord>, FetchError> {
    let page_size = NonZeroU32::new(Self::PAGE_SIZE).unwrap_or(NonZeroU32::MIN);
    let mut all: Vec<TimeLogRecord> = Vec::new();
    let mut cursor: Option<String> = None;
    let mut pages = 0usize;

    loop {
      let page = self.pages.fetch(cursor.as_deref(), page_size, filter)?;
      pages += 1;
      all.extend(page.records);

      if !page.has_next {
        break;
      }

      // A page that claims more data but mints no cursor would restart the scan.
      match page.next_cursor {
        Some(next) => cursor = Some(next),
        None => {
          return Err(FetchError::transport(
            "remote reported more pages without an end cursor",
          ))
        }
      }
    }

    info!(records = all.len(), pages, "full scan complete");

    Ok(all)
  }
}
