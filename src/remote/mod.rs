// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Remote time-log source: transport seam, GraphQL wire format, paged and full-scan fetchers
// role: remote/namespace
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

pub mod fetcher;
pub mod query;
pub mod transport;

pub use fetcher::{FullScanFetcher, PagedFetcher};
pub use transport::{build_transport, get_access_token, HttpTransport, StaticTransport, Transport};
