// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use std::path::PathBuf;

#[test]
fn test_vars_constants() {
    assert_eq!(vars::NO_COLOR, "NO_COLOR");
    assert_eq!(vars::COLOR, "COLOR");
    assert_eq!(vars::RUST_LOG, "RUST_LOG");
    assert_eq!(vars::SAFEWATCH_STATE_DIR, "SAFEWATCH_STATE_DIR");
    assert_eq!(vars::SAFEWATCH_API_URL, "SAFEWATCH_API_URL");
    assert_eq!(vars::SAFEWATCH_API_TOKEN, "SAFEWATCH_API_TOKEN");
    assert_eq!(vars::XDG_STATE_HOME, "XDG_STATE_HOME");
}

#[test]
fn test_no_color_set_to_one() {
    std::env::set_var("NO_COLOR", "1");
    assert!(no_color());
    std::env::set_var("NO_COLOR", "true");
    assert!(!no_color());
    std::env::remove_var("NO_COLOR");
    assert!(!no_color());
}

#[test]
fn test_state_dir() {
    std::env::remove_var("SAFEWATCH_STATE_DIR");
    assert_eq!(state_dir(), None);
    std::env::set_var("SAFEWATCH_STATE_DIR", "/tmp/safewatch-test");
    assert_eq!(state_dir(), Some(PathBuf::from("/tmp/safewatch-test")));
    std::env::set_var("SAFEWATCH_STATE_DIR", "");
    assert_eq!(state_dir(), None);
    std::env::remove_var("SAFEWATCH_STATE_DIR");
}

#[test]
fn test_api_overrides() {
    std::env::set_var("SAFEWATCH_API_URL", "http://api.test");
    std::env::set_var("SAFEWATCH_API_TOKEN", "secret");
    assert_eq!(api_url().as_deref(), Some("http://api.test"));
    assert_eq!(api_token().as_deref(), Some("secret"));
    std::env::remove_var("SAFEWATCH_API_URL");
    std::env::remove_var("SAFEWATCH_API_TOKEN");
    assert_eq!(api_url(), None);
    assert_eq!(api_token(), None);
}
