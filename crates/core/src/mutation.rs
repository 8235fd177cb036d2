// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Typed mutations queued for delivery to the dashboard API.
//!
//! A [`Mutation`] is a tagged union keyed by entity type and action. Each
//! variant carries its own payload shape, so adding a new remote call means
//! adding a variant and the compiler points at every executor and projector
//! that must handle it.
//!
//! The persisted queue keeps the untyped `(entityType, action, payload)`
//! triple; [`Mutation::from_parts`] is the single place where that triple is
//! validated and decoded.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::entity::{Action, EntityType};
use crate::error::{Error, Result};
use crate::models::{AlertPatch, CameraPatch, NewCamera, NewUser, UserPatch, UserStatusAction};

/// Identifies a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub user_id: String,
}

/// Field delta for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub user_id: String,
    pub changes: UserPatch,
}

/// Block/unblock style status change for a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStatusChange {
    pub user_id: String,
    pub action: UserStatusAction,
}

/// Identifies a single camera.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraRef {
    pub camera_id: String,
}

/// Field delta for a camera.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraUpdate {
    pub camera_id: String,
    pub changes: CameraPatch,
}

/// Enable or disable a camera feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraStatusChange {
    pub camera_id: String,
    pub is_active: bool,
}

/// Review update for an alert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertUpdate {
    pub alert_id: String,
    pub changes: AlertPatch,
}

/// Mutations against users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserMutation {
    Create(NewUser),
    Update(UserUpdate),
    UpdateStatus(UserStatusChange),
    Delete(UserRef),
}

/// Mutations against cameras.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraMutation {
    Create(NewCamera),
    Update(CameraUpdate),
    UpdateStatus(CameraStatusChange),
    Delete(CameraRef),
}

/// Mutations against alerts. Alerts are created server-side only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertMutation {
    Update(AlertUpdate),
}

/// Any mutation the sync queue can carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Users(UserMutation),
    Cameras(CameraMutation),
    Alerts(AlertMutation),
}

impl Mutation {
    /// Decodes an untyped `(entityType, action, payload)` triple.
    ///
    /// Fails with [`Error::UnsupportedAction`] when the pair is not in the
    /// supported table and [`Error::InvalidPayload`] when the payload does
    /// not match the pair's shape.
    pub fn from_parts(entity_type: EntityType, action: Action, payload: Value) -> Result<Self> {
        entity_type.check_action(action)?;

        let mutation = match (entity_type, action) {
            (EntityType::Users, Action::Create) => {
                Mutation::Users(UserMutation::Create(decode(entity_type, action, payload)?))
            }
            (EntityType::Users, Action::Update) => {
                Mutation::Users(UserMutation::Update(decode(entity_type, action, payload)?))
            }
            (EntityType::Users, Action::UpdateStatus) => {
                Mutation::Users(UserMutation::UpdateStatus(decode(entity_type, action, payload)?))
            }
            (EntityType::Users, Action::Delete) => {
                Mutation::Users(UserMutation::Delete(decode(entity_type, action, payload)?))
            }
            (EntityType::Cameras, Action::Create) => {
                Mutation::Cameras(CameraMutation::Create(decode(entity_type, action, payload)?))
            }
            (EntityType::Cameras, Action::Update) => {
                Mutation::Cameras(CameraMutation::Update(decode(entity_type, action, payload)?))
            }
            (EntityType::Cameras, Action::UpdateStatus) => Mutation::Cameras(
                CameraMutation::UpdateStatus(decode(entity_type, action, payload)?),
            ),
            (EntityType::Cameras, Action::Delete) => {
                Mutation::Cameras(CameraMutation::Delete(decode(entity_type, action, payload)?))
            }
            (EntityType::Alerts, Action::Update) => {
                Mutation::Alerts(AlertMutation::Update(decode(entity_type, action, payload)?))
            }
            // check_action rejected every other alert action above
            (EntityType::Alerts, _) => {
                return Err(Error::InvalidAction(action.as_str().to_string()));
            }
        };
        Ok(mutation)
    }

    /// Returns the entity type this mutation targets.
    pub fn entity_type(&self) -> EntityType {
        match self {
            Mutation::Users(_) => EntityType::Users,
            Mutation::Cameras(_) => EntityType::Cameras,
            Mutation::Alerts(_) => EntityType::Alerts,
        }
    }

    /// Returns the action this mutation performs.
    pub fn action(&self) -> Action {
        match self {
            Mutation::Users(UserMutation::Create(_))
            | Mutation::Cameras(CameraMutation::Create(_)) => Action::Create,
            Mutation::Users(UserMutation::Update(_))
            | Mutation::Cameras(CameraMutation::Update(_))
            | Mutation::Alerts(AlertMutation::Update(_)) => Action::Update,
            Mutation::Users(UserMutation::UpdateStatus(_))
            | Mutation::Cameras(CameraMutation::UpdateStatus(_)) => Action::UpdateStatus,
            Mutation::Users(UserMutation::Delete(_))
            | Mutation::Cameras(CameraMutation::Delete(_)) => Action::Delete,
        }
    }

    /// Returns the targeted entity's id. Creates have none yet.
    pub fn entity_id(&self) -> Option<&str> {
        match self {
            Mutation::Users(UserMutation::Create(_))
            | Mutation::Cameras(CameraMutation::Create(_)) => None,
            Mutation::Users(UserMutation::Update(u)) => Some(&u.user_id),
            Mutation::Users(UserMutation::UpdateStatus(u)) => Some(&u.user_id),
            Mutation::Users(UserMutation::Delete(u)) => Some(&u.user_id),
            Mutation::Cameras(CameraMutation::Update(c)) => Some(&c.camera_id),
            Mutation::Cameras(CameraMutation::UpdateStatus(c)) => Some(&c.camera_id),
            Mutation::Cameras(CameraMutation::Delete(c)) => Some(&c.camera_id),
            Mutation::Alerts(AlertMutation::Update(a)) => Some(&a.alert_id),
        }
    }

    /// Encodes the payload in its wire shape.
    pub fn payload(&self) -> Result<Value> {
        let value = match self {
            Mutation::Users(UserMutation::Create(p)) => serde_json::to_value(p)?,
            Mutation::Users(UserMutation::Update(p)) => serde_json::to_value(p)?,
            Mutation::Users(UserMutation::UpdateStatus(p)) => serde_json::to_value(p)?,
            Mutation::Users(UserMutation::Delete(p)) => serde_json::to_value(p)?,
            Mutation::Cameras(CameraMutation::Create(p)) => serde_json::to_value(p)?,
            Mutation::Cameras(CameraMutation::Update(p)) => serde_json::to_value(p)?,
            Mutation::Cameras(CameraMutation::UpdateStatus(p)) => serde_json::to_value(p)?,
            Mutation::Cameras(CameraMutation::Delete(p)) => serde_json::to_value(p)?,
            Mutation::Alerts(AlertMutation::Update(p)) => serde_json::to_value(p)?,
        };
        Ok(value)
    }
}

impl Mutation {
    /// Rejects payloads that decode but can never succeed remotely.
    ///
    /// Blank ids and names and emails without an `@` fail here with
    /// [`Error::InvalidPayload`] before anything is queued.
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidPayload {
            entity_type: self.entity_type().as_str().to_string(),
            action: self.action().as_str().to_string(),
            reason: reason.to_string(),
        };

        if let Some(id) = self.entity_id() {
            if id.trim().is_empty() {
                return Err(invalid("target id is empty"));
            }
        }

        match self {
            Mutation::Users(UserMutation::Create(user)) => {
                check_name(&user.name).map_err(invalid)?;
                check_email(&user.email).map_err(invalid)?;
            }
            Mutation::Users(UserMutation::Update(update)) => {
                if let Some(name) = &update.changes.name {
                    check_name(name).map_err(invalid)?;
                }
                if let Some(email) = &update.changes.email {
                    check_email(email).map_err(invalid)?;
                }
            }
            Mutation::Cameras(CameraMutation::Create(camera)) => {
                check_name(&camera.name).map_err(invalid)?;
                if camera.stream_url.trim().is_empty() {
                    return Err(invalid("stream URL is empty"));
                }
            }
            Mutation::Cameras(CameraMutation::Update(update)) => {
                if let Some(name) = &update.changes.name {
                    check_name(name).map_err(invalid)?;
                }
            }
            _ => {}
        }
        Ok(())
    }
}

fn check_name(name: &str) -> std::result::Result<(), &'static str> {
    if name.trim().is_empty() {
        Err("name is empty")
    } else {
        Ok(())
    }
}

fn check_email(email: &str) -> std::result::Result<(), &'static str> {
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err("email must look like name@domain"),
    }
}

impl From<UserMutation> for Mutation {
    fn from(m: UserMutation) -> Self {
        Mutation::Users(m)
    }
}

impl From<CameraMutation> for Mutation {
    fn from(m: CameraMutation) -> Self {
        Mutation::Cameras(m)
    }
}

impl From<AlertMutation> for Mutation {
    fn from(m: AlertMutation) -> Self {
        Mutation::Alerts(m)
    }
}

fn decode<T: DeserializeOwned>(entity_type: EntityType, action: Action, payload: Value) -> Result<T> {
    serde_json::from_value(payload).map_err(|e| Error::InvalidPayload {
        entity_type: entity_type.as_str().to_string(),
        action: action.as_str().to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
#[path = "mutation_tests.rs"]
mod tests;
