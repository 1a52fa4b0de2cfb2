use std::fs;
use std::path::Path;

use assert_cmd::Command;
use httpmock::prelude::*;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

fn mi(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("mi").expect("mi binary");
    cmd.env("MICTL_HOME", home)
        .env_remove("RUST_LOG")
        .env_remove("MICTL_HTTP_TIMEOUT_SECS");
    cmd
}

fn logged_in_home(url: &str) -> TempDir {
    let home = tempfile::tempdir().expect("tempdir");
    let document = json!({
        "environments": {
            "testing": {"url": url, "username": "admin", "token": "test-token"}
        }
    });
    fs::write(
        home.path().join("environments.json"),
        serde_json::to_vec_pretty(&document).expect("serialise"),
    )
    .expect("write environments");
    home
}

#[test]
fn get_commands_require_the_environment_flag() {
    let home = tempfile::tempdir().expect("tempdir");
    for args in [
        &["get", "users"][..],
        &["get", "log-levels", "synapse-api"],
        &["get", "data-services"],
        &["get", "message-stores"],
        &["get", "transaction-counts"],
    ] {
        mi(home.path())
            .args(args)
            .assert()
            .code(2)
            .stderr(predicate::str::contains(
                "required flag(s) \"environment\" not set",
            ));
    }
}

#[test]
fn argument_counts_are_checked_before_anything_else() {
    let home = tempfile::tempdir().expect("tempdir");
    mi(home.path())
        .args(["get", "users", "admin", "abc-user"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "accepts at most 1 arg(s), received 2",
        ));
    mi(home.path())
        .args(["get", "transaction-counts", "2024", "-e", "testing"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "accepts exactly 0 or 2 arg(s), received 1",
        ));
    mi(home.path())
        .args(["get", "log-levels", "a", "b", "-e", "testing"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("accepts 1 arg(s), received 2"));
    mi(home.path())
        .args(["get", "log-levels", "-e", "testing"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("accepts 1 arg(s), received 0"));
    mi(home.path())
        .args(["add", "log-level", "synapse-api", "DEBUG", "-e", "testing"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("accepts 3 arg(s), received 2"));
    mi(home.path())
        .args(["update", "log-level", "synapse-api", "-e", "testing"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("accepts 2 arg(s), received 1"));
}

#[test]
fn unknown_environment_asks_to_add_it() {
    let home = tempfile::tempdir().expect("tempdir");
    mi(home.path())
        .args(["get", "log-levels", "synapse-api", "-e", "testing"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "MI does not exists in testing Add it using add env",
        ));
}

#[test]
fn registered_environment_without_token_asks_to_login() {
    let home = tempfile::tempdir().expect("tempdir");
    mi(home.path())
        .args(["add", "env", "testing", "https://localhost:9164"])
        .assert()
        .success()
        .stdout("Successfully added environment 'testing'\n");
    mi(home.path())
        .args(["get", "message-stores", "-e", "testing"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Login to MI"));
}

#[test]
fn shows_a_logger_from_the_management_api() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/management/logging")
            .query_param("loggerName", "synapse-api")
            .header("authorization", "Bearer test-token");
        then.status(200).json_body(json!({
            "loggerName": "synapse-api",
            "level": "INFO",
            "componentName": "org.apache.synapse.rest.API"
        }));
    });

    let home = logged_in_home(&server.base_url());
    mi(home.path())
        .args(["get", "log-levels", "synapse-api", "-e", "testing"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("NAME"))
        .stdout(predicate::str::contains("synapse-api"));
    mock.assert();
}

#[test]
fn custom_list_format_keeps_blank_separators() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/management/users");
        then.status(200).json_body(json!({
            "count": 2,
            "list": [{"userId": "a"}, {"userId": "b"}]
        }));
    });

    let home = logged_in_home(&server.base_url());
    mi(home.path())
        .args(["get", "users", "-e", "testing", "-o", r"{{.UserId}}\n"])
        .assert()
        .success()
        .stdout("a\n\nb\n\n");
}

#[test]
fn missing_logger_prints_error_line_and_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/management/logging")
            .query_param("loggerName", "abc-logger");
        then.status(404)
            .json_body(json!({"Error": "Specified logger ('abc-logger') not found"}));
    });

    let home = logged_in_home(&server.base_url());
    mi(home.path())
        .args(["get", "log-levels", "abc-logger", "-e", "testing"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains(
            "[ERROR]: Getting Information of logger [ abc-logger ]  Specified logger ('abc-logger') not found",
        ));
}

#[test]
fn invalid_log_level_is_rejected_locally() {
    let home = logged_in_home("http://127.0.0.1:1");
    mi(home.path())
        .args([
            "add",
            "log-level",
            "synapse-api",
            "org.apache.synapse.rest.API",
            "ABC",
            "-e",
            "testing",
        ])
        .assert()
        .code(3)
        .stderr(predicate::str::contains(
            "[ERROR]: Adding new logger [ synapse-api ]  Invalid log level ABC",
        ));
}

#[test]
fn custom_template_failures_are_reported() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/management/users");
        then.status(200)
            .json_body(json!({"count": 1, "list": [{"userId": "admin"}]}));
    });

    let home = logged_in_home(&server.base_url());
    mi(home.path())
        .args(["get", "users", "-e", "testing", "-o", "{{.Missing}}"])
        .assert()
        .code(3)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Error executing template:"));
}

#[test]
fn json_output_round_trips_the_payload() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/management/transactions/count");
        then.status(200)
            .json_body(json!({"Year": 2024, "Month": 3, "TransactionCount": 1250}));
    });

    let home = logged_in_home(&server.base_url());
    let output = mi(home.path())
        .args(["get", "transaction-counts", "-e", "testing", "--format", "json"])
        .output()
        .expect("run mi");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json stdout");
    assert_eq!(value["TransactionCount"], 1250);
}
