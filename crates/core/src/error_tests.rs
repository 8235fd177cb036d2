// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[parameterized(
    entity_type = { Error::InvalidEntityType("drones".into()), "drones" },
    action = { Error::InvalidAction("archive".into()), "archive" },
    status_action = { Error::InvalidStatusAction("Suspend".into()), "Suspend" },
)]
fn error_display_contains(err: Error, expected: &str) {
    assert!(err.to_string().contains(expected));
}

#[test]
fn unsupported_action_lists_supported_actions() {
    let err = Error::UnsupportedAction {
        entity_type: "alerts".into(),
        action: "delete".into(),
        supported: "update".into(),
    };
    let msg = err.to_string();
    assert!(msg.contains("alerts does not support 'delete'"));
    assert!(msg.contains("alerts supports: update"));
}

#[test]
fn invalid_payload_names_the_pair() {
    let err = Error::InvalidPayload {
        entity_type: "users".into(),
        action: "update_status".into(),
        reason: "missing field `userId`".into(),
    };
    assert!(err.to_string().starts_with("invalid payload for users/update_status"));
}

#[test]
fn error_from_json() {
    let json_err = serde_json::from_str::<()>("invalid").unwrap_err();
    let err: Error = json_err.into();
    assert!(matches!(err, Error::Json(_)));
}
