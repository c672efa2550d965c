//! Browse, export and summarize GitLab time logs for a group.
//!
//! The core is transport-agnostic: a [`remote::Transport`] carries GraphQL
//! requests, [`remote::PagedFetcher`] and [`remote::FullScanFetcher`] page
//! through results, [`navigator::CursorNavigator`] drives interactive
//! browsing and [`aggregate::aggregate`] folds records into a
//! (project, user) x day pivot for export.

pub mod aggregate;
pub mod bucketing;
pub mod cli;
pub mod display;
pub mod error;
pub mod export;
pub mod ext;
pub mod model;
pub mod navigator;
pub mod process;
pub mod remote;
pub mod span;
pub mod summary;
pub mod util;
