//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own temporary data
//! directory and checks the JSON it prints.

mod common;

use common::{assert_contains, parse_json, run_cli, run_cli_failure, run_cli_success};
use serde_json::Value;
use tempfile::TempDir;

fn home() -> TempDir {
    tempfile::tempdir().expect("tempdir")
}

#[test]
fn test_decision_set_and_show() {
    let home = home();
    let out = run_cli_success(home.path(), &["decision", "set", "  drink water instead  "]);
    let json: Value = parse_json(&out);
    assert_eq!(json["decision"], "drink water instead");
    assert_eq!(json["hasDecision"], true);

    let out = run_cli_success(home.path(), &["decision", "show"]);
    let json: Value = parse_json(&out);
    assert_eq!(json["decision"], "drink water instead");
}

#[test]
fn test_decision_rejects_blank_text() {
    let home = home();
    let (_, stderr, _) = run_cli_failure(home.path(), &["decision", "set", "   "]);
    assert_contains(&stderr, "must not be empty");
}

#[test]
fn test_decision_reset() {
    let home = home();
    run_cli_success(home.path(), &["decision", "set", "walk"]);
    let out = run_cli_success(home.path(), &["decision", "reset"]);
    let json: Value = parse_json(&out);
    assert!(json["decision"].is_null());
    assert_eq!(json["hasDecision"], false);
}

#[test]
fn test_pause_requires_decision() {
    let home = home();
    let (_, stderr, _) = run_cli_failure(home.path(), &["pause", "start", "--no-wait"]);
    assert_contains(&stderr, "decision");
}

#[test]
fn test_pause_start_and_finish() {
    let home = home();
    run_cli_success(home.path(), &["decision", "set", "breathe"]);

    let out = run_cli_success(home.path(), &["pause", "start", "--no-wait"]);
    let started: Value = parse_json(&out);
    assert_eq!(started["state"], "active");
    let id = started["id"].as_str().expect("id").to_string();

    let out = run_cli_success(home.path(), &["pause", "status"]);
    let status: Value = parse_json(&out);
    assert_eq!(status["type"], "StateSnapshot");
    assert_eq!(status["record_id"], id.as_str());

    let out = run_cli_success(home.path(), &["pause", "finish", &id]);
    let record: Value = parse_json(&out);
    assert_eq!(record["completed"], true);
    assert_eq!(record["exitedEarly"], false);
    assert_eq!(record["decision"], "breathe");
    assert!(record["endTime"].is_string());
    assert!(record["jalaliDate"]["year"].is_number());

    let out = run_cli_success(home.path(), &["pause", "status"]);
    let status: Value = parse_json(&out);
    assert_eq!(status["state"], "idle");
}

#[test]
fn test_pause_finish_unknown_id() {
    let home = home();
    let (_, stderr, _) = run_cli_failure(home.path(), &["pause", "finish", "nope"]);
    assert_contains(&stderr, "not found");
}

#[test]
fn test_countdown_runs_to_completion() {
    let home = home();
    run_cli_success(home.path(), &["config", "set", "pause.duration_secs", "1"]);
    run_cli_success(home.path(), &["decision", "set", "stretch"]);

    let out = run_cli_success(home.path(), &["pause", "start"]);
    assert_contains(&out, "\"PauseStarted\"");
    assert_contains(&out, "\"MessageShown\"");
    assert_contains(&out, "\"PauseCompleted\"");

    let out = run_cli_success(home.path(), &["stats", "summary"]);
    let summary: Value = parse_json(&out);
    assert_eq!(summary["total_attempts"], 1);
    assert_eq!(summary["success"], 1);
    assert_eq!(summary["success_rate"], 100);
}

#[test]
fn test_stats_after_mixed_outcomes() {
    let home = home();
    run_cli_success(home.path(), &["decision", "set", "read a page"]);

    let first: Value = parse_json(&run_cli_success(home.path(), &["pause", "start", "--no-wait"]));
    let first = first["id"].as_str().expect("id").to_string();
    run_cli_success(home.path(), &["pause", "finish", &first]);

    let second: Value = parse_json(&run_cli_success(home.path(), &["pause", "start", "--no-wait"]));
    let second = second["id"].as_str().expect("id").to_string();
    run_cli_success(home.path(), &["pause", "finish", &second, "--exited-early"]);

    let summary: Value = parse_json(&run_cli_success(home.path(), &["stats", "summary"]));
    assert_eq!(summary["total_attempts"], 2);
    assert_eq!(summary["success"], 1);
    assert_eq!(summary["failure"], 1);
    assert_eq!(summary["success_rate"], 50);

    let today: Value = parse_json(&run_cli_success(home.path(), &["stats", "today"]));
    assert_eq!(today["todayAttempts"], 2);
}

#[test]
fn test_stats_period_validates_input() {
    let home = home();
    let (_, stderr, _) = run_cli_failure(
        home.path(),
        &["stats", "period", "--mode", "monthly", "--year", "1403", "--month", "13"],
    );
    assert_contains(&stderr, "month");

    let out = run_cli_success(
        home.path(),
        &["stats", "period", "--mode", "monthly", "--year", "1403", "--month", "12"],
    );
    let json: Value = parse_json(&out);
    assert_eq!(json["summary"]["total"], 0);
    assert_eq!(json["buckets"].as_array().map(Vec::len), Some(30));
}

#[test]
fn test_data_clear() {
    let home = home();
    run_cli_success(home.path(), &["decision", "set", "tea"]);
    run_cli_success(home.path(), &["pause", "start", "--no-wait"]);

    let (_, stderr, code) = run_cli(home.path(), &["data", "clear"]);
    assert_ne!(code, 0);
    assert_contains(&stderr, "--yes");

    run_cli_success(home.path(), &["data", "clear", "--yes"]);
    let json: Value = parse_json(&run_cli_success(home.path(), &["decision", "show"]));
    assert!(json["decision"].is_null());
    let summary: Value = parse_json(&run_cli_success(home.path(), &["stats", "summary"]));
    assert_eq!(summary["total_attempts"], 0);
}

#[test]
fn test_config_roundtrip() {
    let home = home();
    let out = run_cli_success(home.path(), &["config", "get", "pause.duration_secs"]);
    assert_eq!(out.trim(), "60");

    run_cli_success(home.path(), &["config", "set", "pause.duration_secs", "30"]);
    let out = run_cli_success(home.path(), &["config", "get", "pause.duration_secs"]);
    assert_eq!(out.trim(), "30");

    let (_, stderr, _) = run_cli_failure(home.path(), &["config", "set", "pause.duration_secs", "0"]);
    assert_contains(&stderr, "greater than zero");
    let (_, stderr, _) =
        run_cli_failure(home.path(), &["config", "set", "pause.duration_secs", "10000000000000000"]);
    assert_contains(&stderr, "at most 86400");
    let out = run_cli_success(home.path(), &["config", "get", "pause.duration_secs"]);
    assert_eq!(out.trim(), "30");

    run_cli_success(home.path(), &["config", "reset"]);
    let out = run_cli_success(home.path(), &["config", "get", "pause.duration_secs"]);
    assert_eq!(out.trim(), "60");

    let out = run_cli_success(home.path(), &["config", "path"]);
    assert_contains(&out, "config.toml");
}

#[test]
fn test_memory_backend_forgets_between_runs() {
    let home = home();
    run_cli_success(home.path(), &["config", "set", "storage.backend", "memory"]);
    run_cli_success(home.path(), &["decision", "set", "walk"]);
    let json: Value = parse_json(&run_cli_success(home.path(), &["decision", "show"]));
    assert!(json["decision"].is_null());
}

#[cfg(unix)]
#[test]
fn test_interrupted_countdown_records_early_exit() {
    use std::io::{BufRead, BufReader, Read};
    use std::process::{Command, Stdio};

    let home = home();
    run_cli_success(home.path(), &["config", "set", "pause.duration_secs", "30"]);
    run_cli_success(home.path(), &["decision", "set", "wait it out"]);

    let mut child = Command::new(env!("CARGO_BIN_EXE_mindpause"))
        .args(["pause", "start"])
        .env("MINDPAUSE_HOME", home.path())
        .env_remove("MINDPAUSE_ENV")
        .env("MINDPAUSE_LOG", "warn")
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn pause start");
    let mut stdout = BufReader::new(child.stdout.take().expect("stdout"));

    // The first message is printed by the first tick, after Ctrl-C is armed.
    let mut seen = String::new();
    loop {
        let mut line = String::new();
        let n = stdout.read_line(&mut line).expect("read stdout");
        assert!(n > 0, "countdown ended before its first message: {seen}");
        seen.push_str(&line);
        if line.contains("\"MessageShown\"") {
            break;
        }
    }

    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("send SIGINT");
    assert!(status.success());

    let mut rest = String::new();
    stdout.read_to_string(&mut rest).expect("read rest");
    let exit = child.wait().expect("wait");
    assert_eq!(exit.code(), Some(0), "output: {seen}{rest}");
    assert_contains(&rest, "\"PauseExited\"");
    assert_contains(&rest, "\"exitedEarly\": true");

    let summary: Value = parse_json(&run_cli_success(home.path(), &["stats", "summary"]));
    assert_eq!(summary["total_attempts"], 1);
    assert_eq!(summary["success"], 0);
    assert_eq!(summary["failure"], 1);
    let status: Value = parse_json(&run_cli_success(home.path(), &["pause", "status"]));
    assert_eq!(status["state"], "idle");
}

#[test]
fn test_habit_lifecycle() {
    let home = home();
    let added: Value = parse_json(&run_cli_success(home.path(), &["habit", "add", "smoking"]));
    assert_eq!(added["habit"]["name"], "smoking");
    assert_eq!(added["habit"]["daysWithout"], 0);
    assert_eq!(added["daysSinceStart"], 0);
    let id = added["habit"]["id"].as_str().expect("id").to_string();

    run_cli_success(home.path(), &["habit", "mark", &id]);
    let marked: Value = parse_json(&run_cli_success(home.path(), &["habit", "mark", &id]));
    assert_eq!(marked["habit"]["daysWithout"], 2);

    let reset: Value = parse_json(&run_cli_success(home.path(), &["habit", "reset", &id]));
    assert_eq!(reset["habit"]["daysWithout"], 0);

    let list: Value = parse_json(&run_cli_success(home.path(), &["habit", "list"]));
    assert_eq!(list.as_array().map(Vec::len), Some(1));

    run_cli_success(home.path(), &["habit", "remove", &id]);
    let (_, stderr, _) = run_cli_failure(home.path(), &["habit", "mark", &id]);
    assert_contains(&stderr, "Habit not found");
    let (_, stderr, _) = run_cli_failure(home.path(), &["habit", "add", "  "]);
    assert_contains(&stderr, "must not be empty");
}
