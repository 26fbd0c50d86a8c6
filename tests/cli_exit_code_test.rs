use httpmock::prelude::*;
use serde_json::json;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn collector(root: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_slack-collector"))
        .arg("--app-root")
        .arg(root)
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to spawn slack-collector")
}

fn write_config(root: &Path, content: &str) {
    std::fs::create_dir_all(root.join("config")).unwrap();
    std::fs::write(root.join("config").join("config.toml"), content).unwrap();
}

fn config_for(endpoint: &str) -> String {
    format!(
        r#"
[storage]
data_dir = "data"
data_file_prefix = "snap"

[secure]
slack_group_token = "xoxb-cli"

[source]
endpoint = "{endpoint}"
"#
    )
}

#[test]
fn test_missing_config_exits_1() {
    let root = TempDir::new().unwrap();
    let output = collector(root.path());
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("does not exist"));
}

#[test]
fn test_malformed_config_exits_2() {
    let root = TempDir::new().unwrap();
    write_config(root.path(), "[storage\ndata_dir = ");
    assert_eq!(collector(root.path()).status.code(), Some(2));
}

#[test]
fn test_write_failure_exits_3() {
    let root = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/users.list");
        then.status(200)
            .json_body(json!({"ok": true, "members": [{"id": "U1"}]}));
    });
    write_config(root.path(), &config_for(&server.url("/api/users.list")));
    std::fs::write(root.path().join("data"), "not a directory").unwrap();

    assert_eq!(collector(root.path()).status.code(), Some(3));
}

#[test]
fn test_fetch_failure_exits_4() {
    let root = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/users.list");
        then.status(503);
    });
    write_config(root.path(), &config_for(&server.url("/api/users.list")));

    assert_eq!(collector(root.path()).status.code(), Some(4));
}

#[test]
fn test_empty_result_exits_5() {
    let root = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/users.list");
        then.status(200).json_body(json!({"ok": true, "members": []}));
    });
    write_config(root.path(), &config_for(&server.url("/api/users.list")));

    let output = collector(root.path());

    assert_eq!(output.status.code(), Some(5));
    assert!(!root.path().join("data").exists());
}

#[test]
fn test_success_exits_0_and_writes_one_file() {
    let root = TempDir::new().unwrap();
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/users.list");
        then.status(200)
            .json_body(json!({"ok": true, "members": [{"id": "U1", "name": "x"}]}));
    });
    write_config(root.path(), &config_for(&server.url("/api/users.list")));

    let output = collector(root.path());

    assert_eq!(output.status.code(), Some(0));
    let files: Vec<_> = std::fs::read_dir(root.path().join("data"))
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("snap-") && files[0].ends_with(".json"));
}
