// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Utilities for the effective clock, export destination paths, and man page rendering
// role: utilities/helpers
// inputs: Optional DateTime override; --out value and suggested file name; clap CommandFactory
// outputs: DateTime<Local>, resolved export path, man page text
// side_effects: export_destination creates parent directories
// invariants:
// - "-" means stdout and never touches the filesystem
// - A directory-like --out receives the suggested file name; anything else is used as the file path
// errors: IO errors bubble with the path in context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::CommandFactory;

/// Returns the effective "now" given an optional override.
///
/// When `override_now` is `Some`, that instant is returned; otherwise
/// the current local time is used.
pub fn effective_now(override_now: Option<DateTime<Local>>) -> DateTime<Local> {
  override_now.unwrap_or_else(Local::now)
}

/// Where an export goes for a given `--out`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
  Stdout,
  File(PathBuf),
}

/// Resolve `--out` into a destination, creating parent directories for files.
pub fn export_destination(out: &str, suggested_name: &str) -> Result<Destination> {
  if out == "-" {
    return Ok(Destination::Stdout);
  }

  let out_path = Path::new(out);
  let is_dir_like = out.ends_with('/') || out_path.is_dir();

  let file = if is_dir_like {
    std::fs::create_dir_all(out_path).with_context(|| format!("creating {}", out_path.display()))?;
    out_path.join(suggested_name)
  } else {
    if let Some(parent) = out_path.parent().filter(|p| !p.as_os_str().is_empty()) {
      std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    out_path.to_path_buf()
  };

  Ok(Destination::File(file))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> anyhow::Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
