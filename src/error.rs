// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Typed failure taxonomy for remote fetching, navigation, window resolution and bucketing
// role: errors/types
// outputs: FetchError, NavigationError, SpanError, BucketError
// invariants:
// - Remote messages are carried verbatim (first reported message only)
// - Transport failures are terminal for the current operation; nothing here retries
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

/// Failure of a single remote query.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FetchError {
  /// The remote source could not be reached, answered with a non-success
  /// status, or sent a body that does not decode as a timelog page.
  #[error("transport error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
  Transport { status: Option<u16>, message: String },

  /// The remote source answered but reported an application-level error.
  #[error("remote error: {0}")]
  Remote(String),
}

impl FetchError {
  pub fn transport(message: impl Into<String>) -> Self {
    FetchError::Transport {
      status: None,
      message: message.into(),
    }
  }

  pub fn status(code: u16, message: impl Into<String>) -> Self {
    FetchError::Transport {
      status: Some(code),
      message: message.into(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NavigationError {
  #[error("a page is already loading")]
  Busy,
  #[error("there is no next page")]
  NoNextPage,
  #[error("there is no previous page")]
  NoPreviousPage,
  #[error("no page has been loaded yet")]
  NotLoaded,
  #[error(transparent)]
  Fetch(#[from] FetchError),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpanError {
  #[error("End date cannot be before start date")]
  EndBeforeStart,
  #[error("invalid date '{0}', expected YYYY-MM-DD")]
  InvalidDate(String),
  #[error("invalid --month '{0}', expected YYYY-MM")]
  InvalidMonth(String),
  #[error("could not understand window phrase '{0}'")]
  UnknownPhrase(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BucketError {
  #[error("offset of {0} hours is outside -23..=23")]
  OffsetOutOfRange(i32),
}
