// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use chrono::TimeZone;
use yare::parameterized;

fn user() -> User {
    User {
        id: "42".into(),
        name: "Ada".into(),
        email: "ada@example.com".into(),
        role: Role::Reviewer,
        status: UserStatus::Active,
        created_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
    }
}

#[parameterized(
    block = { UserStatusAction::Block, UserStatus::Blocked },
    unblock = { UserStatusAction::Unblock, UserStatus::Active },
    activate = { UserStatusAction::Activate, UserStatus::Active },
    deactivate = { UserStatusAction::Deactivate, UserStatus::Inactive },
)]
fn status_action_resulting_status(action: UserStatusAction, expected: UserStatus) {
    assert_eq!(action.resulting_status(), expected);
}

#[test]
fn status_action_parses_case_insensitively() {
    assert_eq!("block".parse::<UserStatusAction>().unwrap(), UserStatusAction::Block);
    assert!("suspend".parse::<UserStatusAction>().is_err());
}

#[test]
fn user_patch_only_touches_present_fields() {
    let mut u = user();
    let patch = UserPatch { role: Some(Role::Manager), ..Default::default() };
    patch.apply_to(&mut u);
    assert_eq!(u.role, Role::Manager);
    assert_eq!(u.name, "Ada");
    assert_eq!(u.email, "ada@example.com");
}

#[test]
fn camera_patch_updates_location() {
    let mut camera = Camera {
        id: "cam-1".into(),
        name: "Dock".into(),
        location: "North".into(),
        stream_url: "rtsp://dock".into(),
        is_active: true,
        alert_count: 4,
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    };
    CameraPatch { location: Some("South".into()), ..Default::default() }.apply_to(&mut camera);
    assert_eq!(camera.location, "South");
    assert_eq!(camera.alert_count, 4);
}

#[test]
fn alert_patch_sets_notes_and_status() {
    let mut alert = Alert {
        id: "a-1".into(),
        camera_id: "cam-1".into(),
        alert_type: "no_helmet".into(),
        severity: Severity::High,
        status: AlertStatus::Open,
        notes: None,
        created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
    };
    let patch = AlertPatch {
        status: Some(AlertStatus::FalsePositive),
        notes: Some("shadow".into()),
        ..Default::default()
    };
    patch.apply_to(&mut alert);
    assert_eq!(alert.status, AlertStatus::FalsePositive);
    assert_eq!(alert.notes.as_deref(), Some("shadow"));
    assert_eq!(alert.severity, Severity::High);
}

#[test]
fn entities_use_camel_case_keys() {
    let json = serde_json::to_value(user()).unwrap();
    assert!(json.get("createdAt").is_some());
    assert_eq!(json["status"], "active");

    let patch = serde_json::to_value(CameraPatch {
        stream_url: Some("rtsp://x".into()),
        ..Default::default()
    })
    .unwrap();
    assert_eq!(patch, serde_json::json!({ "streamUrl": "rtsp://x" }));
}
