use jsonschema::validator_for;
use predicates::prelude::*;

fn compile_schema(name: &str) -> jsonschema::Validator {
  let path = test_support::schemas_dir().join(name);
  let data = std::fs::read(&path).expect("schema file");
  let schema: serde_json::Value = serde_json::from_slice(&data).expect("valid schema JSON");
  validator_for(&schema).expect("compile schema")
}

fn export_cmd() -> assert_cmd::Command {
  let mut cmd = test_support::fixture_cmd("timelog-report", "timelogs.json");
  cmd.args(["--export", "--from", "2024-01-01", "--to", "2024-01-03"]);
  cmd
}

#[test]
fn csv_export_to_stdout() {
  test_support::init_insta();
  let out = export_cmd().output().unwrap();
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

  let csv = String::from_utf8(out.stdout).unwrap();
  insta::assert_snapshot!(csv.trim_end(), @r###"
  Project Id,Project Name,Username,2024-01-01,2024-01-02,2024-01-03
  12,Hydra,alice,0.5,1.5,0
  7,Widgets,alice,0,0,0.25
  7,Widgets,bob,1.5,0,0
  "###);
}

#[test]
fn csv_export_to_directory_prints_pointer() {
  let td = test_support::tempdir();
  let dir = format!("{}/", td.path().display());

  let out = export_cmd().args(["--username", "alice", "--out", &dir]).output().unwrap();
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

  let pointer: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  let expected = td.path().join("TimeLogs_01-01-2024-03-01-2024_alice.csv");
  assert_eq!(pointer["file"], expected.to_string_lossy().as_ref());
  assert_eq!(pointer["rows"], 2);
  assert_eq!(pointer["dropped"], 0);

  let body = std::fs::read_to_string(&expected).unwrap();
  assert!(body.starts_with("Project Id,Project Name,Username,2024-01-01"));
  assert!(!body.contains("bob"));
}

#[test]
fn xlsx_export_writes_workbook_file() {
  let td = test_support::tempdir();
  let dir = format!("{}/", td.path().display());

  let out = export_cmd().args(["--format", "xlsx", "--out", &dir]).output().unwrap();
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

  let pointer: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  let expected = td.path().join("TimeLogs_01-01-2024-03-01-2024.xlsx");
  assert_eq!(pointer["file"], expected.to_string_lossy().as_ref());
  assert_eq!(pointer["rows"], 3);

  let bytes = std::fs::read(&expected).unwrap();
  assert!(bytes.starts_with(b"PK\x03\x04"));
}

#[test]
fn xlsx_export_to_stdout_is_rejected() {
  export_cmd()
    .args(["--format", "xlsx"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--out"));
}

#[test]
fn json_export_conforms_to_schema() {
  let td = test_support::tempdir();
  let file = td.path().join("pivot.json");

  let out = export_cmd()
    .args(["--format", "json", "--out", file.to_str().unwrap()])
    .output()
    .unwrap();
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

  let pointer: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(pointer["rows"], 3);
  // bob's 2023-12-31T10:00Z log is fetched through the padding day only
  assert_eq!(pointer["dropped"], 1);

  let v: serde_json::Value = serde_json::from_slice(&std::fs::read(&file).unwrap()).unwrap();
  compile_schema("timelog-report.pivot.schema.json")
    .validate(&v)
    .expect("schema validation failed for pivot export");
  assert_eq!(v["dropped"][0]["day"], "2023-12-31");
}

#[test]
fn empty_result_warns_instead_of_writing() {
  let td = test_support::tempdir();
  let file = td.path().join("empty.csv");

  test_support::fixture_cmd("timelog-report", "timelogs.json")
    .args(["--export", "--from", "2024-02-01", "--to", "2024-02-07", "--out", file.to_str().unwrap()])
    .assert()
    .success()
    .stderr(predicate::str::contains("No time logs found"))
    .stdout(predicate::str::contains("\"warning\""));

  assert!(!file.exists());
}

#[test]
fn failed_scan_writes_nothing() {
  let td = test_support::tempdir();
  let file = td.path().join("never.csv");

  export_cmd()
    .env(test_support::FIXTURE_ERROR_ENV, "Timeout on page 3")
    .args(["--out", file.to_str().unwrap()])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Timeout on page 3"));

  assert!(!file.exists());
}

#[test]
fn fixture_nodes_pivot_like_the_cli_export() {
  use chrono::NaiveDate;
  use timelog_report::aggregate::{aggregate, AggregateOutcome};
  use timelog_report::bucketing::DayOffset;
  use timelog_report::model::DateSpan;
  use timelog_report::remote::query::decode_nodes;

  let nodes: serde_json::Value = test_support::read_fixture_json("timelogs.json");
  let records = decode_nodes(&nodes).expect("fixture nodes decode");
  assert_eq!(records.len(), 7);

  let span = DateSpan::new(
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
    NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
  )
  .unwrap();
  let AggregateOutcome::Table(table) = aggregate(&records, &span, DayOffset::default()) else {
    panic!("expected a table");
  };

  let hydra = &table.rows[0];
  assert_eq!((hydra.project_name.as_str(), hydra.username.as_str()), ("Hydra", "alice"));
  assert_eq!(hydra.hours_by_day["2024-01-01"], 0.5);
  assert_eq!(hydra.hours_by_day["2024-01-02"], 1.5);
  assert_eq!(hydra.hours_by_day["2024-01-03"], 0.0);
}
