// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Turn a PivotTable into the export artifact (header + rows) and write it as CSV, JSON or an xlsx workbook
// role: output/export
// inputs: PivotTable, ExportFormat, visible DateSpan and optional username for naming
// outputs: Bytes on a Write sink; suggested file name
// side_effects: Writes to the provided sink only
// invariants:
// - Header is `Project Id, Project Name, Username` followed by every day key of the span, ascending
// - Each data row has exactly 3 + days cells, in the header's day order
// - The xlsx workbook has a single TimeLogs sheet; day cells are numbers, not text
// - File name is TimeLogs[_dd-MM-yyyy-dd-MM-yyyy][_username].<ext> using the visible (unpadded) span
// errors: io::Error from the sink (JSON and xlsx encoding failures are mapped into io::Error)
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use std::io::Write;

use clap::ValueEnum;
use rust_xlsxwriter::{Workbook, XlsxError};
use serde::{Deserialize, Serialize};

use crate::model::{DateSpan, PivotTable};

const FIXED_COLUMNS: [&str; 3] = ["Project Id", "Project Name", "Username"];
const FILE_DATE_FORMAT: &str = "%d-%m-%Y";
const SHEET_NAME: &str = "TimeLogs";

#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum ExportFormat {
  Csv,
  Json,
  Xlsx,
}

impl ExportFormat {
  /// Binary formats cannot go to stdout.
  pub fn is_binary(&self) -> bool {
    matches!(self, ExportFormat::Xlsx)
  }

  pub fn extension(&self) -> &'static str {
    match self {
      ExportFormat::Csv => "csv",
      ExportFormat::Json => "json",
      ExportFormat::Xlsx => "xlsx",
    }
  }
}

pub fn export_header(table: &PivotTable) -> Vec<String> {
  FIXED_COLUMNS
    .iter()
    .map(|c| c.to_string())
    .chain(table.day_keys.iter().cloned())
    .collect()
}

/// Hours cell text: two decimals, trailing zeros trimmed (`2`, `0.25`, `1.5`).
pub fn format_hours(hours: f64) -> String {
  let fixed = format!("{:.2}", hours);
  let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
  match trimmed {
    "" | "-0" => "0".to_string(),
    other => other.to_string(),
  }
}

fn escape_field(value: &str) -> String {
  if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r') {
    format!("\"{}\"", value.replace('"', "\"\""))
  } else {
    value.to_string()
  }
}

fn write_row<W: Write>(w: &mut W, fields: &[String]) -> std::io::Result<()> {
  let line: Vec<String> = fields.iter().map(|f| escape_field(f)).collect();
  writeln!(w, "{}", line.join(","))
}

pub fn write_csv<W: Write>(table: &PivotTable, w: &mut W) -> std::io::Result<()> {
  write_row(w, &export_header(table))?;

  for row in &table.rows {
    let mut fields = vec![row.project_id.clone(), row.project_name.clone(), row.username.clone()];
    fields.extend(
      table
        .day_keys
        .iter()
        .map(|day| format_hours(row.hours_by_day.get(day).copied().unwrap_or(0.0))),
    );
    write_row(w, &fields)?;
  }

  Ok(())
}

pub fn write_json<W: Write>(table: &PivotTable, w: &mut W) -> std::io::Result<()> {
  serde_json::to_writer_pretty(&mut *w, table)?;
  writeln!(w)
}

fn round_hours(hours: f64) -> f64 {
  (hours * 100.0).round() / 100.0
}

fn xlsx_bytes(table: &PivotTable) -> Result<Vec<u8>, XlsxError> {
  let mut workbook = Workbook::new();
  let sheet = workbook.add_worksheet();
  sheet.set_name(SHEET_NAME)?;

  for (col, title) in (0u16..).zip(export_header(table)) {
    sheet.write_string(0, col, title)?;
  }

  for (r, row) in (1u32..).zip(&table.rows) {
    sheet.write_string(r, 0, row.project_id.as_str())?;
    sheet.write_string(r, 1, row.project_name.as_str())?;
    sheet.write_string(r, 2, row.username.as_str())?;
    for (col, day) in (3u16..).zip(&table.day_keys) {
      let hours = row.hours_by_day.get(day).copied().unwrap_or(0.0);
      sheet.write_number(r, col, round_hours(hours))?;
    }
  }

  workbook.save_to_buffer()
}

pub fn write_xlsx<W: Write>(table: &PivotTable, w: &mut W) -> std::io::Result<()> {
  let bytes = xlsx_bytes(table).map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
  w.write_all(&bytes)
}

pub fn write_export<W: Write>(table: &PivotTable, format: ExportFormat, w: &mut W) -> std::io::Result<()> {
  match format {
    ExportFormat::Csv => write_csv(table, w),
    ExportFormat::Json => write_json(table, w),
    ExportFormat::Xlsx => write_xlsx(table, w),
  }
}

/// Suggested export file name.
pub fn export_file_name(span: Option<&DateSpan>, username: Option<&str>, format: ExportFormat) -> String {
  let mut name = String::from("TimeLogs");

  if let Some(s) = span {
    name.push_str(&format!(
      "_{}-{}",
      s.from.format(FILE_DATE_FORMAT),
      s.to.format(FILE_DATE_FORMAT)
    ));
  }

  if let Some(u) = username.filter(|u| !u.trim().is_empty()) {
    name.push('_');
    name.push_str(u.trim());
  }

  format!("{}.{}", name, format.extension())
}
