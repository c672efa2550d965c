// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Interactive one-page-at-a-time browsing over a PagedFetcher with a cursor history stack
// role: domain/navigation
// inputs: PagedFetcher, TimeLogFilter, page size, navigation commands
// outputs: Current Page, NavigationStatus, ShowingRange, BrowseView
// side_effects: One fetch per successful navigation command
// invariants:
// - history holds the cursors that led to the current page; the current cursor is history.last() (None = first page)
// - go_next followed by go_previous restores the cursor active before go_next
// - change_page_size and change_filter always clear history
// - A failed navigation leaves position (history, filter, page size) and the last loaded page untouched; status becomes Errored
// - SharedNavigator rejects any command while another is in flight (NavigationError::Busy)
// - SharedNavigator::status never blocks; it reports Loading while a fetch is in flight
// errors: NavigationError (Fetch wraps the propagated FetchError)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, PoisonError, TryLockError};

use tracing::debug;

use crate::bucketing::{bucket_day, DayOffset};
use crate::display::{format_time_spent, last_segment, project_display_name};
use crate::error::{FetchError, NavigationError};
use crate::model::{BrowseRow, BrowseView, Page, ShowingRange, TimeLogFilter};
use crate::remote::fetcher::PagedFetcher;

pub const DEFAULT_PAGE_SIZE: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationStatus {
  Idle,
  Loading,
  Loaded,
  Errored,
}

/// Everything a navigation command may change; restored when the fetch fails.
#[derive(Clone)]
struct Position {
  history: Vec<String>,
  filter: TimeLogFilter,
  page_size: NonZeroU32,
}

pub struct CursorNavigator {
  fetcher: PagedFetcher,
  position: Position,
  page: Option<Page>,
  status: NavigationStatus,
  last_error: Option<FetchError>,
}

impl CursorNavigator {
  pub fn new(fetcher: PagedFetcher) -> Self {
    Self {
      fetcher,
      position: Position {
        history: Vec::new(),
        filter: TimeLogFilter::default(),
        page_size: NonZeroU32::new(DEFAULT_PAGE_SIZE).unwrap_or(NonZeroU32::MIN),
      },
      page: None,
      status: NavigationStatus::Idle,
      last_error: None,
    }
  }

  pub fn status(&self) -> NavigationStatus {
    self.status
  }

  /// Error of the most recent failed navigation, cleared by the next success.
  pub fn last_error(&self) -> Option<&FetchError> {
    self.last_error.as_ref()
  }

  /// Last successfully loaded page, kept across failures.
  pub fn page(&self) -> Option<&Page> {
    self.page.as_ref()
  }

  pub fn history(&self) -> &[String] {
    &self.position.history
  }

  pub fn current_cursor(&self) -> Option<&str> {
    self.position.history.last().map(String::as_str)
  }

  pub fn has_previous(&self) -> bool {
    !self.position.history.is_empty()
  }

  pub fn has_next(&self) -> bool {
    self.page.as_ref().map(|p| p.has_next).unwrap_or(false)
  }

  pub fn go_to_first_page(&mut self, filter: TimeLogFilter, page_size: NonZeroU32) -> Result<&Page, NavigationError> {
    self.navigate(|pos| {
      pos.history.clear();
      pos.filter = filter;
      pos.page_size = page_size;
      Ok(())
    })
  }

  pub fn go_next(&mut self) -> Result<&Page, NavigationError> {
    let page = self.page.as_ref().ok_or(NavigationError::NotLoaded)?;
    let next = match (&page.next_cursor, page.has_next) {
      (Some(cursor), true) => cursor.clone(),
      _ => return Err(NavigationError::NoNextPage),
    };

    self.navigate(|pos| {
      pos.history.push(next);
      Ok(())
    })
  }

  pub fn go_previous(&mut self) -> Result<&Page, NavigationError> {
    self.navigate(|pos| {
      pos.history.pop().map(|_| ()).ok_or(NavigationError::NoPreviousPage)
    })
  }

  pub fn change_page_size(&mut self, page_size: NonZeroU32) -> Result<&Page, NavigationError> {
    self.navigate(|pos| {
      pos.history.clear();
      pos.page_size = page_size;
      Ok(())
    })
  }

  pub fn change_filter(&mut self, filter: TimeLogFilter) -> Result<&Page, NavigationError> {
    self.navigate(|pos| {
      pos.history.clear();
      pos.filter = filter;
      Ok(())
    })
  }

  /// "Showing X to Y of Z" for the current page; X is 1-based.
  pub fn showing(&self) -> Option<ShowingRange> {
    let page = self.page.as_ref()?;
    let start = self.position.history.len() as u64 * self.position.page_size.get() as u64;
    let rows = page.records.len() as u64;

    Some(ShowingRange {
      from: if rows == 0 { start } else { start + 1 },
      to: start + rows,
      total: page.total_count,
    })
  }

  /// Display rows for the current page, days bucketed with `offset`.
  pub fn browse_view(&self, offset: DayOffset) -> Option<BrowseView> {
    let page = self.page.as_ref()?;
    let showing = self.showing()?;

    let rows = page
      .records
      .iter()
      .map(|r| BrowseRow {
        user: r.username.clone(),
        project: project_display_name(&r.project_path),
        issue: last_segment(&r.issue_id).to_string(),
        time_spent: format_time_spent(r.time_spent_seconds),
        date: bucket_day(&r.spent_at, offset),
      })
      .collect();

    Some(BrowseView {
      page_number: self.position.history.len() + 1,
      page_size: self.position.page_size.get(),
      showing,
      has_previous: self.has_previous(),
      has_next: page.has_next,
      rows,
    })
  }

  fn navigate<F>(&mut self, step: F) -> Result<&Page, NavigationError>
  where
    F: FnOnce(&mut Position) -> Result<(), NavigationError>,
  {
    let mut next = self.position.clone();
    step(&mut next)?;

    let previous_status = self.status;
    self.status = NavigationStatus::Loading;

    let cursor = next.history.last().map(String::as_str);
    match self.fetcher.fetch(cursor, next.page_size, &next.filter) {
      Ok(page) => {
        debug!(depth = next.history.len(), records = page.records.len(), "navigated");
        self.position = next;
        self.status = NavigationStatus::Loaded;
        self.last_error = None;
        Ok(&*self.page.insert(page))
      }
      Err(err) => {
        debug!(error = %err, ?previous_status, "navigation failed");
        self.status = NavigationStatus::Errored;
        self.last_error = Some(err.clone());
        Err(NavigationError::Fetch(err))
      }
    }
  }
}

/// A CursorNavigator shared across threads. A command issued while another is
/// still loading is rejected rather than queued behind it.
#[derive(Clone)]
pub struct SharedNavigator {
  inner: Arc<Mutex<CursorNavigator>>,
  status: Arc<Mutex<NavigationStatus>>,
}

impl SharedNavigator {
  pub fn new(navigator: CursorNavigator) -> Self {
    let status = navigator.status();
    Self {
      inner: Arc::new(Mutex::new(navigator)),
      status: Arc::new(Mutex::new(status)),
    }
  }

  fn with<T, F>(&self, f: F) -> Result<T, NavigationError>
  where
    F: FnOnce(&mut CursorNavigator) -> Result<T, NavigationError>,
  {
    let mut guard = match self.inner.try_lock() {
      Ok(g) => g,
      Err(TryLockError::WouldBlock) => return Err(NavigationError::Busy),
      Err(TryLockError::Poisoned(p)) => p.into_inner(),
    };

    f(&mut guard)
  }

  fn publish(&self, status: NavigationStatus) {
    *self.status.lock().unwrap_or_else(PoisonError::into_inner) = status;
  }

  fn command<F>(&self, f: F) -> Result<Page, NavigationError>
  where
    F: FnOnce(&mut CursorNavigator) -> Result<&Page, NavigationError>,
  {
    self.with(|n| {
      self.publish(NavigationStatus::Loading);
      let result = f(n).cloned();
      self.publish(n.status());
      result
    })
  }

  pub fn go_to_first_page(&self, filter: TimeLogFilter, page_size: NonZeroU32) -> Result<Page, NavigationError> {
    self.command(move |n| n.go_to_first_page(filter, page_size))
  }

  pub fn go_next(&self) -> Result<Page, NavigationError> {
    self.command(|n| n.go_next())
  }

  pub fn go_previous(&self) -> Result<Page, NavigationError> {
    self.command(|n| n.go_previous())
  }

  pub fn change_page_size(&self, page_size: NonZeroU32) -> Result<Page, NavigationError> {
    self.command(move |n| n.change_page_size(page_size))
  }

  pub fn change_filter(&self, filter: TimeLogFilter) -> Result<Page, NavigationError> {
    self.command(move |n| n.change_filter(filter))
  }

  /// Current status; readable while a command holds the navigator.
  pub fn status(&self) -> NavigationStatus {
    *self.status.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn browse_view(&self, offset: DayOffset) -> Result<Option<BrowseView>, NavigationError> {
    self.with(|n| Ok(n.browse_view(offset)))
  }
}
