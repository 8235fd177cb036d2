// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Init command specs.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn safewatch() -> Command {
    let mut cmd = cargo_bin_cmd!("safewatch");
    cmd.env("NO_COLOR", "1")
        .env_remove("SAFEWATCH_API_URL")
        .env_remove("SAFEWATCH_API_TOKEN")
        .env_remove("SAFEWATCH_STATE_DIR");
    cmd
}

#[test]
fn creates_safewatch_directory() {
    let temp = TempDir::new().unwrap();

    safewatch()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized safewatch at"));

    assert!(temp.path().join(".safewatch/config.toml").exists());
    let config = std::fs::read_to_string(temp.path().join(".safewatch/config.toml")).unwrap();
    assert!(config.contains("base_url = \"http://localhost:8000/api\""));
    assert!(config.contains("max_retries = 3"));
}

#[test]
fn fails_if_already_initialized() {
    let temp = TempDir::new().unwrap();

    safewatch().arg("init").current_dir(temp.path()).assert().success();
    safewatch()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn api_url_is_written_to_config() {
    let temp = TempDir::new().unwrap();

    safewatch()
        .args(["init", "--api-url", "https://dash.example.com/api"])
        .current_dir(temp.path())
        .assert()
        .success();

    let config = std::fs::read_to_string(temp.path().join(".safewatch/config.toml")).unwrap();
    assert!(config.contains("https://dash.example.com/api"));
}

#[yare::parameterized(
    no_scheme = { "dash.example.com" },
    ftp = { "ftp://dash.example.com" },
)]
fn rejects_non_http_api_url(url: &str) {
    let temp = TempDir::new().unwrap();

    safewatch()
        .args(["init", "--api-url", url])
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("hint:"));

    assert!(!temp.path().join(".safewatch").exists());
}

#[test]
fn path_option_initializes_elsewhere() {
    let temp = TempDir::new().unwrap();

    safewatch()
        .args(["init", "--path", "nested/project"])
        .current_dir(temp.path())
        .assert()
        .success();

    assert!(temp.path().join("nested/project/.safewatch/config.toml").exists());
}

#[test]
fn gitignore_excludes_config_and_state() {
    let temp = TempDir::new().unwrap();
    safewatch().arg("init").current_dir(temp.path()).assert().success();

    let gitignore = std::fs::read_to_string(temp.path().join(".safewatch/.gitignore")).unwrap();
    assert!(gitignore.lines().any(|l| l == "config.toml"));
    assert!(gitignore.lines().any(|l| l == "state/"));
}

#[test]
fn commands_fail_before_init() {
    let temp = TempDir::new().unwrap();

    safewatch()
        .arg("list")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("safewatch init"));
}
