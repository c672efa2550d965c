use predicates::prelude::*;

#[test]
fn january_summary_for_alice() {
  let out = test_support::fixture_cmd("timelog-report", "timelogs.json")
    .args(["--summary", "--username", "alice", "--month", "2024-01"])
    .output()
    .unwrap();
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["username"], "alice");
  let months = v["months"].as_array().unwrap();
  assert_eq!(months.len(), 1);
  assert_eq!(months[0]["month"], "January 2024");
  assert_eq!(months[0]["working_days"], 23);
  assert_eq!(months[0]["expected_hours"], 184.0);
  assert_eq!(months[0]["reported_hours"], 2.25);
  assert_eq!(months[0]["missing_hours"], 181.75);
  assert_eq!(months[0]["status"], "Incomplete");
}

#[test]
fn summary_without_username_is_rejected() {
  test_support::fixture_cmd("timelog-report", "timelogs.json")
    .args(["--summary", "--month", "2024-01"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--summary requires --username"));
}
