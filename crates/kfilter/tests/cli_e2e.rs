#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RUNS_VIEW: &str = r#"
name = "runs"

[[filters]]
kind = "search"
param = "search"
attributes = [{ key = "name", label = "Name" }, { key = "commit", label = "Commit" }]

[[filters]]
kind = "multiSelect"
param = "status"
label = "Status"
field = "status.phase"

[[filters]]
kind = "singleSelect"
param = "application"
mode = "api"
api_param = "labelSelector"
"#;

const RUNS: &str = r#"{
  "apiVersion": "tekton.dev/v1",
  "kind": "PipelineRunList",
  "items": [
    { "metadata": { "name": "frontend-on-push", "labels": { "pipelinesascode.tekton.dev/sha": "abcdef123" } },
      "status": { "phase": "Succeeded" } },
    { "metadata": { "name": "frontend-on-pr", "labels": { "pipelinesascode.tekton.dev/sha": "xyz999" } },
      "status": { "phase": "Failed" } },
    { "metadata": { "name": "backend-on-push", "labels": { "pipelinesascode.tekton.dev/sha": "ABC777" } },
      "status": { "phase": "Failed" } }
  ]
}"#;

struct Env {
    _temp: TempDir,
    project: PathBuf,
    global: PathBuf,
    runs: PathBuf,
}

fn setup() -> Env {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project");
    let global = temp.path().join("global");
    fs::create_dir_all(project.join(".kfilter").join("views")).unwrap();
    fs::create_dir_all(&global).unwrap();
    fs::write(project.join(".kfilter").join("views").join("runs.toml"), RUNS_VIEW).unwrap();
    let runs = project.join("runs.json");
    fs::write(&runs, RUNS).unwrap();
    Env {
        _temp: temp,
        project,
        global,
        runs,
    }
}

fn kfilter_cmd(env: &Env) -> Command {
    let mut cmd = Command::new(cargo_bin("kfilter"));
    cmd.current_dir(&env.project)
        .env("KFILTER_CONFIG_DIR", env.global.as_os_str())
        .env_remove("KFILTER_VIEW")
        .env_remove("KFILTER_LOG");
    cmd
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_apply_filters_table() {
    let env = setup();
    kfilter_cmd(&env)
        .args(["apply", "--view", "runs", "--query", r#"status=["Failed"]"#])
        .arg(path_arg(&env.runs))
        .assert()
        .success()
        .stdout(predicate::str::contains("frontend-on-pr"))
        .stdout(predicate::str::contains("backend-on-push"))
        .stdout(predicate::str::contains("frontend-on-push").not())
        .stdout(predicate::str::contains("2 of 3 items match"));
}

#[test]
fn test_apply_reads_stdin_as_json() {
    let env = setup();
    let output = kfilter_cmd(&env)
        .args(["apply", "--view", "runs", "-q", "commit=abc", "-o", "json"])
        .write_stdin(RUNS)
        .output()
        .unwrap();
    assert!(output.status.success());
    let items: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let names: Vec<&str> = items
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["metadata"]["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["frontend-on-push", "backend-on-push"]);
}

#[test]
fn test_api_filters_do_not_filter_locally() {
    let env = setup();
    kfilter_cmd(&env)
        .args(["apply", "--view", "runs", "-q", "application=web"])
        .arg(path_arg(&env.runs))
        .assert()
        .success()
        .stdout(predicate::str::contains("3 of 3 items match"));

    kfilter_cmd(&env)
        .args(["api-params", "--view", "runs", "-q", "application=web&name=x"])
        .assert()
        .success()
        .stdout("labelSelector=web\n");
}

#[test]
fn test_values_reports_malformed_multi_select_as_empty() {
    let env = setup();
    kfilter_cmd(&env)
        .args(["values", "--view", "runs", "-q", "status=not-json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""status": []"#))
        .stdout(predicate::str::contains(r#""is_filtered": false"#));
}

#[test]
fn test_set_and_clear_print_next_query() {
    let env = setup();
    kfilter_cmd(&env)
        .args(["set", "--view", "runs", "-q", "name=front", "status", "Failed", "Running"])
        .assert()
        .success()
        .stdout("name=front&status=%5B%22Failed%22%2C%22Running%22%5D\n");

    kfilter_cmd(&env)
        .args(["clear", "--view", "runs", "-q", "name=front&commit=abc&page=2", "search"])
        .assert()
        .success()
        .stdout("page=2\n");

    kfilter_cmd(&env)
        .args(["clear", "--view", "runs", "-q", r#"name=front&status=["Failed"]&page=2"#])
        .assert()
        .success()
        .stdout("page=2\n");
}

#[test]
fn test_options_with_counts() {
    let env = setup();
    kfilter_cmd(&env)
        .args(["options", "--view", "runs", "status", "-o", "json"])
        .arg(path_arg(&env.runs))
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""value": "Failed""#))
        .stdout(predicate::str::contains(r#""count": 2"#));
}

#[test]
fn test_unknown_param_fails() {
    let env = setup();
    kfilter_cmd(&env)
        .args(["set", "--view", "runs", "nope", "x"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_missing_view_fails() {
    let env = setup();
    kfilter_cmd(&env)
        .args(["values"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no view given"));

    kfilter_cmd(&env)
        .args(["values", "--view", "missing"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("view not found"));
}

#[test]
fn test_config_default_output_json() {
    let env = setup();
    fs::write(
        env.project.join(".kfilter").join("kfilter.toml"),
        "default_output = \"json\"\n",
    )
    .unwrap();
    kfilter_cmd(&env)
        .args(["api-params", "--view", "runs", "-q", "application=web"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""labelSelector""#));
}

#[test]
fn test_invalid_config_warns_and_uses_defaults() {
    let env = setup();
    fs::write(
        env.project.join(".kfilter").join("kfilter.toml"),
        "default_output = [\n",
    )
    .unwrap();
    kfilter_cmd(&env)
        .args(["api-params", "--view", "runs", "-q", "application=web"])
        .assert()
        .success()
        .stdout("labelSelector=web\n")
        .stderr(predicate::str::contains("ignoring invalid config"));
}
