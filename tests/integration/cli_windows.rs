use predicates::prelude::*;

const NOW: &str = "2024-01-03T12:00:00";

#[test]
fn end_before_start_is_rejected() {
  test_support::fixture_cmd("timelog-report", "timelogs.json")
    .args(["--from", "2024-01-03", "--to", "2024-01-01"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("End date cannot be before start date"));
}

#[test]
fn from_without_to_is_rejected() {
  test_support::fixture_cmd("timelog-report", "timelogs.json")
    .args(["--from", "2024-01-03"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("--from and --to must be given together"));
}

#[test]
fn ambiguous_window_is_rejected() {
  test_support::fixture_cmd("timelog-report", "timelogs.json")
    .args(["--month", "2024-01", "--for", "last week"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("Ambiguous time selection"));
}

#[test]
fn default_window_is_today_plus_seven_days() {
  let out = test_support::fixture_cmd("timelog-report", "timelogs.json")
    .args(["--now-override", NOW])
    .output()
    .unwrap();
  assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["span"]["from"], "2024-01-03");
  assert_eq!(v["span"]["to"], "2024-01-10");
  // API span starts 2024-01-02: alice x2 on the 2nd, alice on the 3rd, carol on the 5th
  assert_eq!(v["showing"]["total"], 4);
}

#[test]
fn yesterday_phrase_resolves_against_now_override() {
  let out = test_support::fixture_cmd("timelog-report", "timelogs.json")
    .args(["--for", "yesterday", "--now-override", NOW])
    .output()
    .unwrap();
  assert!(out.status.success());

  let v: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
  assert_eq!(v["span"]["from"], "2024-01-02");
  assert_eq!(v["span"]["to"], "2024-01-02");
}

#[test]
fn unknown_phrase_fails() {
  test_support::fixture_cmd("timelog-report", "timelogs.json")
    .args(["--for", "unparseable phrase 12345", "--now-override", NOW])
    .assert()
    .failure()
    .stderr(predicate::str::contains("could not understand window phrase"));
}

#[test]
fn missing_token_without_fixture_fails() {
  test_support::cmd_bin("timelog-report")
    .env_remove(test_support::FIXTURE_NODES_ENV)
    .args(["--group", "gid://gitlab/Group/6", "--month", "2024-01"])
    .assert()
    .failure()
    .stderr(predicate::str::contains("no access token"));
}
