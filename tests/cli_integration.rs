use assert_cmd::Command;
use predicates::prelude::PredicateBooleanExt;
use predicates::prelude::*;
use std::path::Path;

/// A runfilter command isolated from the user's config and colors.
fn runfilter(config_dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("runfilter").unwrap();
    cmd.env("NO_COLOR", "1")
        .env_remove("RUNFILTER_LOG")
        .arg("--config-dir")
        .arg(config_dir);
    cmd
}

#[test]
fn test_show_lists_chips_and_page() {
    let temp_dir = tempfile::tempdir().unwrap();

    runfilter(temp_dir.path())
        .arg("show")
        .arg("result=[in]failed;error&component=[eq]ui&page=2")
        .assert()
        .success()
        .stdout(predicate::str::contains("result is one of failed, error"))
        .stdout(predicate::str::contains("component is ui"))
        .stdout(predicate::str::contains("page 2, 20 per page"));
}

#[test]
fn test_show_json_recovers_unknown_operator() {
    let temp_dir = tempfile::tempdir().unwrap();

    // Shared links with a bad operator still load, as equality.
    runfilter(temp_dir.path())
        .arg("show")
        .arg("--json")
        .arg("component=[resembles]ui")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""operator": "eq""#))
        .stdout(predicate::str::contains(r#""value": "ui""#));
}

#[test]
fn test_api_params() {
    let temp_dir = tempfile::tempdir().unwrap();

    runfilter(temp_dir.path())
        .arg("api")
        .arg("component=[eq]ui&duration=[gte]10&result=[in]failed;error")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""component=ui""#))
        .stdout(predicate::str::contains(r#""duration)10""#))
        .stdout(predicate::str::contains(r#""result*failed;error""#))
        .stdout(predicate::str::contains(r#""pageSize": 20"#));
}

#[test]
fn test_api_joined() {
    let temp_dir = tempfile::tempdir().unwrap();

    runfilter(temp_dir.path())
        .arg("api")
        .arg("--joined")
        .arg("component=[eq]ui&duration=[gte]10")
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""filter": "component=ui,duration)10""#));
}

#[test]
fn test_set_resets_page_and_joins_values() {
    let temp_dir = tempfile::tempdir().unwrap();

    runfilter(temp_dir.path())
        .args(["set", "component=[eq]ui&page=3", "result", "in", "failed", "error"])
        .assert()
        .success()
        .stdout(predicate::str::contains("component=%5Beq%5Dui"))
        .stdout(predicate::str::contains("result=%5Bin%5Dfailed%3Berror"))
        .stdout(predicate::str::contains("page=1"));
}

#[test]
fn test_set_without_value_removes() {
    let temp_dir = tempfile::tempdir().unwrap();

    runfilter(temp_dir.path())
        .args(["set", "component=[eq]ui&env=[eq]prod", "component", "eq"])
        .assert()
        .success()
        .stdout(predicate::str::contains("env=%5Beq%5Dprod"))
        .stdout(predicate::str::contains("component").not());
}

#[test]
fn test_set_illegal_operator_fails() {
    let temp_dir = tempfile::tempdir().unwrap();

    runfilter(temp_dir.path())
        .args(["set", "", "duration", "contains", "5"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Error:"))
        .stderr(predicate::str::contains("not allowed"));
}

#[test]
fn test_pinned_project_survives_remove_and_clear() {
    let temp_dir = tempfile::tempdir().unwrap();

    runfilter(temp_dir.path())
        .args(["--project", "p-1", "remove", "", "project_id"])
        .assert()
        .success()
        .stdout(predicate::str::contains("project_id=%5Beq%5Dp-1"))
        .stderr(predicate::str::contains("is protected"));

    runfilter(temp_dir.path())
        .args(["--project", "p-1", "clear", "result=[eq]failed&page=4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("project_id=%5Beq%5Dp-1"))
        .stdout(predicate::str::contains("result").not())
        .stdout(predicate::str::contains("page=1"));
}

#[test]
fn test_page_keeps_filters() {
    let temp_dir = tempfile::tempdir().unwrap();

    runfilter(temp_dir.path())
        .args(["page", "component=[eq]ui", "4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("component=%5Beq%5Dui"))
        .stdout(predicate::str::contains("page=4"));

    runfilter(temp_dir.path())
        .args(["page", "component=[eq]ui&page=4", "2", "--size", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("page=2&pageSize=50"));
}

#[test]
fn test_operators_by_field_family() {
    let temp_dir = tempfile::tempdir().unwrap();

    runfilter(temp_dir.path())
        .args(["operators", "duration"])
        .assert()
        .success()
        .stdout(predicate::str::contains("numeric"))
        .stdout(predicate::str::contains("gte"))
        .stdout(predicate::str::contains("contains").not());

    runfilter(temp_dir.path())
        .arg("operators")
        .assert()
        .success()
        .stdout(predicate::str::contains("contains"))
        .stdout(predicate::str::contains("is one of"));
}

#[test]
fn test_config_file_is_honoured() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("config.json"),
        r#"{"default_page_size": 50, "numeric_fields": ["metadata.retries"]}"#,
    )
    .unwrap();

    runfilter(temp_dir.path())
        .args(["api", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""pageSize": 50"#));

    runfilter(temp_dir.path())
        .args(["set", "", "metadata.retries", "contains", "2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("numeric"));
}

#[test]
fn test_invalid_config_is_an_error() {
    let temp_dir = tempfile::tempdir().unwrap();
    std::fs::write(
        temp_dir.path().join("config.json"),
        r#"{"default_page_size": 0}"#,
    )
    .unwrap();

    runfilter(temp_dir.path())
        .args(["show", ""])
        .assert()
        .failure()
        .stderr(predicate::str::contains("default_page_size"));
}

#[test]
fn test_config_save_writes_defaults() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config_dir = temp_dir.path().join("nested");

    runfilter(&config_dir)
        .args(["config", "--save"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""pinned_fields""#));

    let saved = std::fs::read_to_string(config_dir.join("config.json")).unwrap();
    assert!(saved.contains(r#""debounce_ms": 100"#));
}

#[test]
fn test_project_local_config_dir() {
    let temp_dir = tempfile::tempdir().unwrap();
    let local = temp_dir.path().join(".runfilter");
    std::fs::create_dir(&local).unwrap();
    std::fs::write(local.join("config.json"), r#"{"default_page_size": 7}"#).unwrap();

    let mut cmd = Command::cargo_bin("runfilter").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("NO_COLOR", "1")
        .args(["api", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""pageSize": 7"#));
}
