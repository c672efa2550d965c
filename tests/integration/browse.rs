use predicates::prelude::*;

fn browse(args: &[&str]) -> serde_json::Value {
  let out = test_support::fixture_cmd("timelog-report", "timelogs.json")
    .args(["--from", "2024-01-01", "--to", "2024-01-03"])
    .args(args)
    .output()
    .unwrap();
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
  serde_json::from_slice(&out.stdout).unwrap()
}

#[test]
fn first_page_shows_range_and_flags() {
  let v = browse(&["--page-size", "2"]);
  assert_eq!(v["page_number"], 1);
  assert_eq!(v["showing"], serde_json::json!({ "from": 1, "to": 2, "total": 6 }));
  assert_eq!(v["has_previous"], false);
  assert_eq!(v["has_next"], true);
  assert_eq!(
    v["rows"][0],
    serde_json::json!({
      "user": "alice",
      "project": "Hydra",
      "issue": "101",
      "time_spent": "1h 0m",
      "date": "2024-01-02"
    })
  );
}

#[test]
fn second_page_follows_cursor_and_buckets_days() {
  let v = browse(&["--page-size", "2", "--page", "2"]);
  assert_eq!(v["showing"], serde_json::json!({ "from": 3, "to": 4, "total": 6 }));
  assert_eq!(v["has_previous"], true);

  let rows = v["rows"].as_array().unwrap();
  assert_eq!(rows.len(), 2);
  // 2023-12-31T23:30Z is shown on the shifted day
  assert_eq!(rows[0]["date"], "2024-01-01");
  assert_eq!(rows[0]["time_spent"], "1h 30m");
  // fetched through the padding day, browsed as-is
  assert_eq!(rows[1]["date"], "2023-12-31");
}

#[test]
fn last_page_has_no_next_and_mr_logs_have_empty_issue() {
  let v = browse(&["--page-size", "2", "--page", "3"]);
  assert_eq!(v["has_next"], false);
  assert_eq!(v["showing"]["to"], 6);
  assert_eq!(v["rows"][1]["issue"], "");
}

#[test]
fn username_filter_is_applied_by_the_source() {
  let v = browse(&["--username", "bob"]);
  assert_eq!(v["username"], "bob");
  assert_eq!(v["showing"]["total"], 2);
  assert!(v["rows"].as_array().unwrap().iter().all(|r| r["user"] == "bob"));
}

#[test]
fn page_past_the_end_fails() {
  test_support::fixture_cmd("timelog-report", "timelogs.json")
    .args(["--from", "2024-01-01", "--to", "2024-01-03", "--page-size", "2", "--page", "4"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("past the last page"));
}

#[test]
fn remote_error_is_surfaced() {
  test_support::fixture_cmd("timelog-report", "timelogs.json")
    .env(test_support::FIXTURE_ERROR_ENV, "Group not found")
    .args(["--month", "2024-01"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("remote error: Group not found"));
}
