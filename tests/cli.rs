//
//  crm-client
//  tests/cli.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! End-to-end tests of the `crm` binary.

use assert_cmd::Command;
use mockito::Server;
use predicates::prelude::*;
use serde_json::json;
use tempfile::TempDir;

/// A `crm` command isolated from the user's configuration and environment.
fn crm(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("crm").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("CRM_API_KEY")
        .env_remove("CRM_BASE_URL")
        .env_remove("CRM_DEBUG")
        .env("CRM_NO_PROMPT", "true");
    cmd
}

#[test]
fn test_help_lists_commands() {
    let home = TempDir::new().unwrap();
    crm(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("lead"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version() {
    let home = TempDir::new().unwrap();
    crm(&home)
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("crm version "));
}

#[test]
fn test_config_set_then_get() {
    let home = TempDir::new().unwrap();
    crm(&home)
        .args(["config", "set", "timeout_secs", "5"])
        .assert()
        .success();
    crm(&home)
        .args(["config", "get", "api.timeout_secs"])
        .assert()
        .success()
        .stdout("5\n");
    crm(&home)
        .args(["config", "set", "editor", "vim"])
        .assert()
        .failure();
}

#[test]
fn test_lead_view_json() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/lead/lead_1/")
        .with_status(200)
        .with_body(json!({"id": "lead_1", "display_name": "Acme"}).to_string())
        .create();

    crm(&home)
        .args(["--base-url", &server.url(), "--api-key", "k", "--json"])
        .args(["lead", "view", "lead_1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""display_name": "Acme""#));
    mock.assert();
}

#[test]
fn test_lead_view_missing_exits_not_found() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let _mock = server
        .mock("GET", "/lead/nope/")
        .with_status(404)
        .with_body(json!({"error": "Not found"}).to_string())
        .create();

    crm(&home)
        .args(["--base-url", &server.url(), "lead", "view", "nope"])
        .assert()
        .code(8)
        .stderr(predicate::str::contains("Not found"));
}

#[test]
fn test_lead_create_rejects_managed_field_locally() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let mock = server.mock("POST", "/lead/").expect(0).create();

    crm(&home)
        .args(["--base-url", &server.url(), "lead", "create"])
        .args(["--name", "Acme", "--field", "organization=orga_1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("organization"));
    mock.assert();
}

#[test]
fn test_lead_create_rejects_numeric_id_locally() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let mock = server.mock("POST", "/lead/").expect(0).create();

    crm(&home)
        .args(["--base-url", &server.url(), "lead", "create"])
        .args(["--name", "A", "--field", "id=42"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("'id'"));
    mock.assert();
}

#[test]
fn test_lead_merge_failure_exits_not_found() {
    let home = TempDir::new().unwrap();
    let mut server = Server::new();
    let _mock = server
        .mock("POST", "/lead/merge/")
        .with_status(500)
        .with_body(json!({"error": "boom"}).to_string())
        .create();

    crm(&home)
        .args(["--base-url", &server.url(), "lead", "merge", "a", "b", "--yes"])
        .assert()
        .code(8);
}

#[test]
fn test_completion_bash() {
    let home = TempDir::new().unwrap();
    crm(&home)
        .args(["completion", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("_crm"));
}
