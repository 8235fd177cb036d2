// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue command specs: enqueue, status, list, sync, clear.
//!
//! The API URL points at a closed local port, so every delivery attempt
//! fails with a network error and the retry path is exercised end to end.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const UNREACHABLE_API: &str = "http://127.0.0.1:9/api";

struct Project {
    dir: TempDir,
}

impl Project {
    fn init() -> Self {
        let project = Project {
            dir: TempDir::new().unwrap(),
        };
        project.cmd().arg("init").assert().success();
        project
    }

    fn state_dir(&self) -> std::path::PathBuf {
        self.dir.path().join("state")
    }

    fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("safewatch");
        cmd.current_dir(self.dir.path())
            .env("NO_COLOR", "1")
            .env("SAFEWATCH_API_URL", UNREACHABLE_API)
            .env("SAFEWATCH_STATE_DIR", self.state_dir())
            .env_remove("SAFEWATCH_API_TOKEN")
            .env_remove("RUST_LOG");
        cmd
    }

    fn enqueue(&self, entity: &str, action: &str, payload: &str) -> String {
        let output = self
            .cmd()
            .args(["enqueue", entity, action, "--payload", payload])
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "enqueue failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8(output.stdout).unwrap().trim().to_string()
    }

    fn list_json(&self) -> Vec<serde_json::Value> {
        let output = self.cmd().args(["list", "-o", "json"]).output().unwrap();
        assert!(output.status.success());
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

#[test]
fn enqueue_prints_record_id_and_persists() {
    let p = Project::init();

    let id = p.enqueue("users", "update_status", r#"{"userId":"42","action":"Block"}"#);

    assert!(id.starts_with("users_update_status_"));
    assert!(p.state_dir().join("safewatch_sync_queue.json").exists());

    let records = p.list_json();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], id.as_str());
    assert_eq!(records[0]["entityType"], "users");
    assert_eq!(records[0]["action"], "update_status");
    assert_eq!(records[0]["retryCount"], 0);
    assert_eq!(records[0]["payload"]["userId"], "42");
}

#[test]
fn list_keeps_enqueue_order() {
    let p = Project::init();
    let first = p.enqueue("cameras", "delete", r#"{"cameraId":"c1"}"#);
    let second = p.enqueue("users", "delete", r#"{"userId":"u1"}"#);
    let third = p.enqueue("alerts", "update", r#"{"alertId":"a1","changes":{"status":"resolved"}}"#);

    let ids: Vec<String> = p
        .list_json()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect();
    similar_asserts::assert_eq!(ids, vec![first.clone(), second, third]);

    p.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains(first))
        .stdout(predicate::str::contains("cameras/delete"));
}

#[test]
fn status_reports_pending_and_offline() {
    let p = Project::init();
    p.enqueue("cameras", "delete", r#"{"cameraId":"c1"}"#);
    p.enqueue("cameras", "delete", r#"{"cameraId":"c2"}"#);

    let output = p.cmd().args(["status", "-o", "json"]).output().unwrap();
    assert!(output.status.success());
    let status: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(status["pendingOperations"], 2);
    assert_eq!(status["isOnline"], false);
    assert_eq!(status["isProcessing"], false);

    p.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending:    2"));
}

#[yare::parameterized(
    unknown_entity = { "doors", "delete", r#"{"doorId":"d1"}"#, "invalid entity type" },
    unsupported_action = { "alerts", "delete", r#"{"alertId":"a1"}"#, "unsupported action" },
    malformed_json = { "users", "delete", "{userId:1}", "invalid payload JSON" },
)]
fn enqueue_rejects_bad_input(entity: &str, action: &str, payload: &str, message: &str) {
    let p = Project::init();

    p.cmd()
        .args(["enqueue", entity, action, "--payload", payload])
        .assert()
        .failure()
        .stderr(predicate::str::contains(message));

    assert!(p.list_json().is_empty());
}

#[test]
fn enqueue_blank_id_notifies_and_queues_nothing() {
    let p = Project::init();

    p.cmd()
        .args(["enqueue", "users", "delete", "--payload", r#"{"userId":" "}"#])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Failed to delete user"))
        .stderr(predicate::str::contains("error:"));

    assert!(p.list_json().is_empty());
}

#[test]
fn sync_with_empty_queue() {
    let p = Project::init();
    p.cmd()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to sync"));
}

#[test]
fn failed_sync_keeps_record_and_counts_attempt() {
    let p = Project::init();
    p.enqueue("users", "delete", r#"{"userId":"u1"}"#);

    p.cmd()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Delivered 0 of 1, 1 will retry, 0 dropped"))
        .stdout(predicate::str::contains("1 operation still pending"));

    let records = p.list_json();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["retryCount"], 1);
}

#[test]
fn third_failed_sync_evicts_with_one_notification() {
    let p = Project::init();
    p.enqueue("cameras", "delete", r#"{"cameraId":"c1"}"#);

    for _ in 0..2 {
        p.cmd()
            .arg("sync")
            .assert()
            .success()
            .stdout(predicate::str::contains("Failed to sync").not());
    }

    p.cmd()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Failed to sync cameras delete after 3 attempts").count(1))
        .stdout(predicate::str::contains("1 dropped"));

    assert!(p.list_json().is_empty());
}

#[test]
fn clear_drops_everything() {
    let p = Project::init();
    p.enqueue("cameras", "delete", r#"{"cameraId":"c1"}"#);
    p.enqueue("cameras", "delete", r#"{"cameraId":"c2"}"#);

    p.cmd()
        .arg("clear")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cleared 2 pending operations"));

    p.cmd()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No pending operations"));
}

#[test]
fn directory_flag_finds_project() {
    let p = Project::init();
    let elsewhere = TempDir::new().unwrap();
    p.enqueue("cameras", "delete", r#"{"cameraId":"c1"}"#);

    let output = p
        .cmd()
        .current_dir(elsewhere.path())
        .args(["-C", p.dir.path().to_str().unwrap(), "list", "-o", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let records: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(records.len(), 1);
}

#[test]
fn corrupt_queue_file_starts_empty() {
    let p = Project::init();
    std::fs::create_dir_all(p.state_dir()).unwrap();
    std::fs::write(p.state_dir().join("safewatch_sync_queue.json"), "not json").unwrap();

    assert!(p.list_json().is_empty());
    p.enqueue("cameras", "delete", r#"{"cameraId":"c1"}"#);
    assert_eq!(p.list_json().len(), 1);
}
