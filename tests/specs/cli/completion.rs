// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Completion and help specs.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn safewatch() -> Command {
    let mut cmd = cargo_bin_cmd!("safewatch");
    cmd.env("NO_COLOR", "1");
    cmd
}

#[yare::parameterized(
    bash = { "bash" },
    zsh = { "zsh" },
    fish = { "fish" },
)]
fn completion_generates_non_empty_output(shell: &str) {
    let output = safewatch().args(["completion", shell]).output().unwrap();

    assert!(output.status.success());
    let script = String::from_utf8_lossy(&output.stdout);
    assert!(script.contains("safewatch"));
    assert!(script.contains("enqueue"));
}

#[test]
fn completion_invalid_shell_fails() {
    safewatch().args(["completion", "tcsh"]).assert().failure();
}

#[test]
fn help_lists_commands_and_quickstart() {
    safewatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Sync Queue:"))
        .stdout(predicate::str::contains("enqueue"))
        .stdout(predicate::str::contains("Get started:"));
}

#[test]
fn version_flag_prints_version() {
    safewatch()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}
