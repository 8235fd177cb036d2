// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::models::{AlertStatus, Role};
use serde_json::json;
use yare::parameterized;

#[test]
fn from_parts_decodes_user_status_change() {
    let m = Mutation::from_parts(
        EntityType::Users,
        Action::UpdateStatus,
        json!({ "userId": "42", "action": "Block" }),
    )
    .unwrap();

    assert_eq!(
        m,
        Mutation::Users(UserMutation::UpdateStatus(UserStatusChange {
            user_id: "42".into(),
            action: UserStatusAction::Block,
        }))
    );
    assert_eq!(m.entity_type(), EntityType::Users);
    assert_eq!(m.action(), Action::UpdateStatus);
    assert_eq!(m.entity_id(), Some("42"));
}

#[test]
fn from_parts_rejects_unsupported_pair() {
    let err = Mutation::from_parts(EntityType::Alerts, Action::Delete, json!({ "alertId": "a" }))
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedAction { .. }));
}

#[parameterized(
    missing_id = { EntityType::Cameras, Action::Delete, json!({}) },
    wrong_type = { EntityType::Cameras, Action::UpdateStatus, json!({ "cameraId": "c", "isActive": "yes" }) },
    bad_status = { EntityType::Users, Action::UpdateStatus, json!({ "userId": "1", "action": "Suspend" }) },
    not_object = { EntityType::Users, Action::Create, json!("ada") },
)]
fn from_parts_rejects_malformed_payload(entity: EntityType, action: Action, payload: Value) {
    let err = Mutation::from_parts(entity, action, payload).unwrap_err();
    assert!(matches!(err, Error::InvalidPayload { .. }), "got {err:?}");
}

#[parameterized(
    user_create = { EntityType::Users, Action::Create, json!({ "name": "Ada", "email": "a@x.io", "role": "admin" }) },
    user_update = { EntityType::Users, Action::Update, json!({ "userId": "1", "changes": { "name": "Bo" } }) },
    user_delete = { EntityType::Users, Action::Delete, json!({ "userId": "1" }) },
    camera_create = { EntityType::Cameras, Action::Create, json!({ "name": "Dock", "location": "N", "streamUrl": "rtsp://d" }) },
    camera_status = { EntityType::Cameras, Action::UpdateStatus, json!({ "cameraId": "c", "isActive": false }) },
    alert_update = { EntityType::Alerts, Action::Update, json!({ "alertId": "a", "changes": { "status": "resolved" } }) },
)]
fn payload_preserves_wire_shape(entity: EntityType, action: Action, payload: Value) {
    let m = Mutation::from_parts(entity, action, payload.clone()).unwrap();
    assert_eq!(m.entity_type(), entity);
    assert_eq!(m.action(), action);
    assert_eq!(m.payload().unwrap(), payload);
}

#[test]
fn creates_have_no_entity_id() {
    let m: Mutation = UserMutation::Create(NewUser {
        name: "Ada".into(),
        email: "a@x.io".into(),
        role: Role::Reviewer,
    })
    .into();
    assert_eq!(m.entity_id(), None);
    assert_eq!(m.action(), Action::Create);
}

#[test]
fn alert_update_converts_into_mutation() {
    let m: Mutation = AlertMutation::Update(AlertUpdate {
        alert_id: "a-9".into(),
        changes: AlertPatch { status: Some(AlertStatus::Acknowledged), ..Default::default() },
    })
    .into();
    assert_eq!(m.entity_type(), EntityType::Alerts);
    assert_eq!(m.entity_id(), Some("a-9"));
}

#[parameterized(
    blank_name = { json!({ "name": " ", "email": "a@x.io", "role": "admin" }) },
    no_at = { json!({ "name": "Ada", "email": "ada.x.io", "role": "admin" }) },
    empty_domain = { json!({ "name": "Ada", "email": "ada@", "role": "admin" }) },
)]
fn validate_rejects_bad_user_create(payload: Value) {
    let m = Mutation::from_parts(EntityType::Users, Action::Create, payload).unwrap();
    assert!(matches!(m.validate(), Err(Error::InvalidPayload { .. })));
}

#[test]
fn validate_rejects_blank_target_id() {
    let m = Mutation::from_parts(EntityType::Cameras, Action::Delete, json!({ "cameraId": "" }))
        .unwrap();
    let err = m.validate().unwrap_err();
    assert!(err.to_string().contains("target id is empty"));
}

#[test]
fn validate_accepts_partial_patch() {
    let m = Mutation::from_parts(
        EntityType::Users,
        Action::Update,
        json!({ "userId": "7", "changes": { "role": "manager" } }),
    )
    .unwrap();
    assert!(m.validate().is_ok());
}
