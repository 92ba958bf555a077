use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const NOW: &str = "2024-01-05T00:00:00Z";

fn create_temp_dir() -> PathBuf {
    let mut dir = std::env::temp_dir();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    dir.push(format!(
        "duration-labeler-test-{}-{}",
        std::process::id(),
        nanos
    ));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// A command isolated from the caller's environment and config files
fn labeler(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("duration-labeler");
    for var in [
        "GITHUB_REPOSITORY",
        "GITHUB_TOKEN",
        "GITHUB_API_URL",
        "INPUT_GITHUB-TOKEN",
        "INPUT_SHORT_THRESHOLD",
        "INPUT_MEDIUM_THRESHOLD",
        "INPUT_SHORT_COLOR",
        "INPUT_MEDIUM_COLOR",
        "INPUT_LONG_COLOR",
        "INPUT_THRESHOLDED_UPDATE",
        "INPUT_FILTER_LABEL",
        "INPUT_ISSUE_STATE",
        "DURATION_LABELER_CONFIG",
        "DURATION_LABELER_NOW",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("NO_COLOR", "1")
        .current_dir(home);
    cmd
}

fn github_issue(number: u64, created: &str, closed: Option<&str>, labels: &[&str]) -> Value {
    json!({
        "id": 1000 + number,
        "number": number,
        "title": format!("Issue {}", number),
        "state": if closed.is_some() { "closed" } else { "open" },
        "labels": labels
            .iter()
            .map(|name| json!({"id": 1, "name": name, "color": "ededed"}))
            .collect::<Vec<_>>(),
        "created_at": created,
        "closed_at": closed,
        "pull_request": null
    })
}

async fn mount_issue_listing(server: &MockServer, issues: Value) {
    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/issues"))
        .and(query_param("state", "all"))
        .and(query_param("per_page", "100"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(issues))
        .expect(1)
        .mount(server)
        .await;
}

#[test]
fn test_help() {
    let home = create_temp_dir();
    labeler(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--short-threshold"))
        .stdout(predicate::str::contains("--filter-label"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_version() {
    let home = create_temp_dir();
    labeler(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("duration-labeler"));
}

#[test]
fn test_missing_repository() {
    let home = create_temp_dir();
    labeler(&home)
        .args(["--token", "secret"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Repository not configured"));
}

#[test]
fn test_missing_token() {
    let home = create_temp_dir();
    labeler(&home)
        .args(["--repository", "octo/widgets"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GitHub token not configured"));
}

#[test]
fn test_invalid_issue_state() {
    let home = create_temp_dir();
    labeler(&home)
        .args(["--repository", "octo/widgets", "--token", "secret"])
        .args(["--issue-state", "stale"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown issue state 'stale'"));
}

#[test]
fn test_missing_explicit_config_file() {
    let home = create_temp_dir();
    labeler(&home)
        .args(["--config", "does-not-exist.toml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}

#[test]
fn test_json_error_output() {
    let home = create_temp_dir();
    let output = labeler(&home)
        .args(["-o", "json", "--token", "secret"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    let start = stderr.find('{').unwrap();
    let err: Value = serde_json::from_str(&stderr[start..]).unwrap();
    assert_eq!(err["error"], true);
    assert!(err["message"]
        .as_str()
        .unwrap()
        .contains("Repository not configured"));
}

#[tokio::test]
async fn test_labels_issues_end_to_end() {
    let server = MockServer::start().await;
    let home = create_temp_dir();

    mount_issue_listing(
        &server,
        json!([
            github_issue(1, "2024-01-01T00:00:00Z", None, &["bug", "Duration: 8-30 days"]),
            github_issue(2, "2023-12-01T00:00:00Z", Some("2023-12-20T00:00:00Z"), &[]),
        ]),
    )
    .await;

    Mock::given(method("DELETE"))
        .and(path("/repos/octo/widgets/issues/1/labels/Duration%3A%208-30%20days"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "bug", "color": "ededed"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/octo/widgets/labels"))
        .and(body_json(json!({"name": "Duration: 1-7 days", "color": "00FF00"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": 7, "name": "Duration: 1-7 days", "color": "00FF00"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Already defined: answered with 422 and updated in place
    Mock::given(method("POST"))
        .and(path("/repos/octo/widgets/labels"))
        .and(body_json(json!({"name": "Duration: 8-30 days", "color": "FFA500"})))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "message": "Validation Failed",
            "errors": [{"resource": "Label", "code": "already_exists", "field": "name"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PATCH"))
        .and(path("/repos/octo/widgets/labels/Duration%3A%208-30%20days"))
        .and(body_json(json!({"color": "FFA500"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"id": 8, "name": "Duration: 8-30 days", "color": "FFA500"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/octo/widgets/issues/1/labels"))
        .and(body_json(json!({"labels": ["Duration: 1-7 days"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "bug", "color": "ededed"},
            {"id": 7, "name": "Duration: 1-7 days", "color": "00FF00"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/octo/widgets/issues/2/labels"))
        .and(body_json(json!({"labels": ["Duration: 8-30 days"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 8, "name": "Duration: 8-30 days", "color": "FFA500"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let output = labeler(&home)
        .args(["--api-url", &server.uri()])
        .args(["--repository", "octo/widgets", "--token", "secret"])
        .args(["--now", NOW, "-o", "json"])
        .output()
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let summary: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(summary["repository"]["owner"], "octo");
    assert_eq!(summary["issues_found"], 2);
    assert_eq!(summary["issues_labeled"], 2);
    assert_eq!(summary["warnings"], 0);
    assert_eq!(summary["outcomes"][0]["label"], "Duration: 1-7 days");
    assert_eq!(summary["outcomes"][0]["removed"], json!(["Duration: 8-30 days"]));
    assert_eq!(summary["outcomes"][0]["definition"], "created");
    assert_eq!(summary["outcomes"][1]["label"], "Duration: 8-30 days");
    assert_eq!(summary["outcomes"][1]["definition"], "updated");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Fetching page 1 of all issues..."));
    assert!(stderr.contains("Found 2 total all issues"));
    assert!(stderr.contains("Updated issue #1 with label: Duration: 1-7 days (color: 00FF00)"));
}

#[tokio::test]
async fn test_dry_run_sends_no_mutations() {
    let server = MockServer::start().await;
    let home = create_temp_dir();

    mount_issue_listing(
        &server,
        json!([github_issue(
            3,
            "2023-11-01T00:00:00Z",
            None,
            &["Duration: 1-7 days"]
        )]),
    )
    .await;

    for verb in ["POST", "PATCH", "DELETE"] {
        Mock::given(method(verb))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;
    }

    labeler(&home)
        .args(["--api-url", &server.uri()])
        .args(["--repository", "octo/widgets", "--token", "secret"])
        .args(["--now", NOW, "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Would label 1 of 1 issues in octo/widgets"))
        .stdout(predicate::str::contains("#3 Duration: >1 month"))
        .stderr(predicate::str::contains(
            "Would update issue #3 with label: Duration: >1 month (color: FF0000)",
        ));
}

#[tokio::test]
async fn test_config_file_and_action_inputs() {
    let server = MockServer::start().await;
    let home = create_temp_dir();

    std::fs::write(
        home.join("duration-labeler.toml"),
        r##"
        repository = "octo/widgets"
        short_threshold = 2
        short_color = "#123456"
        "##,
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/issues"))
        .and(query_param("state", "open"))
        .and(query_param("labels", "triage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([github_issue(
            4,
            "2024-01-04T00:00:00Z",
            None,
            &["triage"]
        )])))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/octo/widgets/labels"))
        .and(body_json(json!({"name": "Duration: 1-2 days", "color": "123456"})))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(json!({"id": 9, "name": "Duration: 1-2 days", "color": "123456"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/repos/octo/widgets/issues/4/labels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    labeler(&home)
        .env("GITHUB_API_URL", server.uri())
        .env("INPUT_GITHUB-TOKEN", "secret")
        .env("INPUT_FILTER_LABEL", "triage")
        .env("INPUT_ISSUE_STATE", "open")
        .env("DURATION_LABELER_NOW", NOW)
        .assert()
        .success()
        .stdout(predicate::str::contains("Labeled 1 of 1 issues in octo/widgets"))
        .stderr(predicate::str::contains("Found 1 total open issues with 'triage' label"));
}

#[tokio::test]
async fn test_listing_failure_is_fatal() {
    let server = MockServer::start().await;
    let home = create_temp_dir();

    Mock::given(method("GET"))
        .and(path("/repos/octo/widgets/issues"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials"
        })))
        .mount(&server)
        .await;

    labeler(&home)
        .args(["--api-url", &server.uri()])
        .args(["--repository", "octo/widgets", "--token", "wrong"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Failed to fetch issues for octo/widgets"));
}
