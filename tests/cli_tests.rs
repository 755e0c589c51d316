#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env("RUST_LOG", "off");
    cmd.write_stdin(script.to_string()).assert()
}

#[test]
fn cli_requires_a_project_first() {
    run_cli("task Req Alice 3\nquit\n")
        .success()
        .stdout(str_contains("No project. Start one with"));
}

#[test]
fn cli_computes_schedule_around_holiday() {
    run_cli(
        "project 2024-01-08 Launch\nemployee Alice\nholiday Alice 10/01/2024\n\
         task Req Alice 3 - 100 10\ncompute\nquit\n",
    )
    .success()
    .stdout(str_contains("tasks=1, passes=1, start=2024-01-08, finish=2024-01-11"))
    .stdout(str_contains("Req"));
}

#[test]
fn cli_reports_circular_dependency() {
    run_cli(
        "project 2024-01-08\nemployee Alice\ntask A Alice 1 B\ntask B Alice 1 A\ncompute\nquit\n",
    )
    .success()
    .stdout(str_contains(
        "Schedule error: Circular dependency detected or invalid dependency chain (unscheduled: A, B)",
    ));
}

#[test]
fn cli_gantt_shows_day_columns() {
    run_cli(
        "project 2024-01-08\nemployee Alice\ntask Req Alice 2\ncompute\ngantt\nrange\nquit\n",
    )
    .success()
    .stdout(str_contains("2024-01-09"))
    .stdout(str_contains("Project 'Unnamed Project': 2024-01-08 to 2024-01-09"));
}

#[test]
fn cli_save_and_load_json_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().to_string();
    let script = format!(
        "project 2024-01-08 Persist\nemployee Alice\ntask Kept Alice 4\nsave json {path}\n\
         task Temp Alice 1\nload json {path}\nshow\nquit\n"
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(
        output.contains("Project 'Persist' loaded from"),
        "expected output to mention load completion"
    );
    let after_reload = output.split("loaded from").last().unwrap_or_default();
    assert!(after_reload.contains("Kept"));
    assert!(
        !after_reload.contains("Temp"),
        "temporary task should not appear after reload:\n{}",
        after_reload
    );
}

#[test]
fn cli_export_then_import_csv() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().to_string();
    let script = format!(
        "project 2024-01-08\nemployee Alice\ntask Req Alice 2\ncompute\nexport csv {path}\n\
         project 2024-02-05\nemployee Alice\nimport csv {path}\ncompute\nquit\n"
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Imported 1 task(s)"))
        .stdout(str_contains("start=2024-02-05, finish=2024-02-06"));
}
