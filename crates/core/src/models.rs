// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Cached read-side entities and the typed field deltas applied to them.
//!
//! Wire format follows the dashboard REST API: camelCase keys, RFC 3339
//! timestamps.

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::entity::EntityType;
use crate::error::{Error, Result};

/// An entity that can live in a cached collection.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// The remote resource this entity belongs to.
    const ENTITY_TYPE: EntityType;

    /// Server (or temporary) identifier.
    fn id(&self) -> &str;
}

/// Role granted to a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Manager,
    Reviewer,
}

/// Account state of a dashboard user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStatus {
    Active,
    Inactive,
    Blocked,
}

/// Status change requested for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatusAction {
    Block,
    Unblock,
    Activate,
    Deactivate,
}

impl UserStatusAction {
    /// The status a user ends up in after this action.
    pub fn resulting_status(&self) -> UserStatus {
        match self {
            UserStatusAction::Block => UserStatus::Blocked,
            UserStatusAction::Unblock | UserStatusAction::Activate => UserStatus::Active,
            UserStatusAction::Deactivate => UserStatus::Inactive,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserStatusAction::Block => "Block",
            UserStatusAction::Unblock => "Unblock",
            UserStatusAction::Activate => "Activate",
            UserStatusAction::Deactivate => "Deactivate",
        }
    }
}

impl fmt::Display for UserStatusAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for UserStatusAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "block" => Ok(UserStatusAction::Block),
            "unblock" => Ok(UserStatusAction::Unblock),
            "activate" => Ok(UserStatusAction::Activate),
            "deactivate" => Ok(UserStatusAction::Deactivate),
            _ => Err(Error::InvalidStatusAction(s.to_string())),
        }
    }
}

/// A dashboard user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

impl Entity for User {
    const ENTITY_TYPE: EntityType = EntityType::Users;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Fields supplied when inviting a new user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Partial update of a user. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
}

impl UserPatch {
    pub fn apply_to(&self, user: &mut User) {
        if let Some(name) = &self.name {
            user.name.clone_from(name);
        }
        if let Some(email) = &self.email {
            user.email.clone_from(email);
        }
        if let Some(role) = self.role {
            user.role = role;
        }
    }
}

/// A monitored camera.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Camera {
    pub id: String,
    pub name: String,
    pub location: String,
    pub stream_url: String,
    pub is_active: bool,
    pub alert_count: u32,
    pub created_at: DateTime<Utc>,
}

impl Entity for Camera {
    const ENTITY_TYPE: EntityType = EntityType::Cameras;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Fields supplied when registering a camera.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCamera {
    pub name: String,
    pub location: String,
    pub stream_url: String,
}

/// Partial update of a camera.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CameraPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stream_url: Option<String>,
}

impl CameraPatch {
    pub fn apply_to(&self, camera: &mut Camera) {
        if let Some(name) = &self.name {
            camera.name.clone_from(name);
        }
        if let Some(location) = &self.location {
            camera.location.clone_from(location);
        }
        if let Some(stream_url) = &self.stream_url {
            camera.stream_url.clone_from(stream_url);
        }
    }
}

/// Severity assigned by the detection pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// Review state of an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Open,
    Acknowledged,
    Resolved,
    FalsePositive,
}

/// A safety alert raised against a camera.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub id: String,
    pub camera_id: String,
    pub alert_type: String,
    pub severity: Severity,
    pub status: AlertStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Entity for Alert {
    const ENTITY_TYPE: EntityType = EntityType::Alerts;

    fn id(&self) -> &str {
        &self.id
    }
}

/// Reviewer changes to an alert.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<AlertStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl AlertPatch {
    pub fn apply_to(&self, alert: &mut Alert) {
        if let Some(status) = self.status {
            alert.status = status;
        }
        if let Some(severity) = self.severity {
            alert.severity = severity;
        }
        if let Some(notes) = &self.notes {
            alert.notes = Some(notes.clone());
        }
    }
}

#[cfg(test)]
#[path = "models_tests.rs"]
mod tests;
