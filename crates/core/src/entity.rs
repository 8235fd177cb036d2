// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Entity kinds and the actions that can be queued against them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Kind of remote resource a queued mutation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Dashboard accounts (admins, managers, reviewers).
    Users,
    /// Monitored camera feeds.
    Cameras,
    /// Safety alerts raised by the detection pipeline.
    Alerts,
}

impl EntityType {
    /// All entity types, in display order.
    pub const ALL: [EntityType; 3] = [EntityType::Users, EntityType::Cameras, EntityType::Alerts];

    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Users => "users",
            EntityType::Cameras => "cameras",
            EntityType::Alerts => "alerts",
        }
    }

    /// Returns the actions this entity type accepts.
    pub fn supported_actions(&self) -> &'static [Action] {
        match self {
            EntityType::Users | EntityType::Cameras => &[
                Action::Create,
                Action::Update,
                Action::UpdateStatus,
                Action::Delete,
            ],
            EntityType::Alerts => &[Action::Update],
        }
    }

    /// Returns true if `action` may be queued for this entity type.
    pub fn supports(&self, action: Action) -> bool {
        self.supported_actions().contains(&action)
    }

    /// Checks `action` against the supported set.
    pub fn check_action(&self, action: Action) -> Result<()> {
        if self.supports(action) {
            return Ok(());
        }
        let supported: Vec<&str> = self.supported_actions().iter().map(Action::as_str).collect();
        Err(Error::UnsupportedAction {
            entity_type: self.as_str().to_string(),
            action: action.as_str().to_string(),
            supported: supported.join(", "),
        })
    }

    /// Human-readable singular noun for notifications.
    pub fn noun(&self) -> &'static str {
        match self {
            EntityType::Users => "User",
            EntityType::Cameras => "Camera",
            EntityType::Alerts => "Alert",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "users" | "user" => Ok(EntityType::Users),
            "cameras" | "camera" => Ok(EntityType::Cameras),
            "alerts" | "alert" => Ok(EntityType::Alerts),
            _ => Err(Error::InvalidEntityType(s.to_string())),
        }
    }
}

/// Kind of change a queued mutation performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Update,
    /// Status-only change (block/unblock a user, enable/disable a camera).
    UpdateStatus,
    Delete,
}

impl Action {
    /// Returns the string representation used in storage and display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::Update => "update",
            Action::UpdateStatus => "update_status",
            Action::Delete => "delete",
        }
    }

    /// Past-tense verb for notifications.
    pub fn past_tense(&self) -> &'static str {
        match self {
            Action::Create => "created",
            Action::Update => "updated",
            Action::UpdateStatus => "status updated",
            Action::Delete => "deleted",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "create" => Ok(Action::Create),
            "update" => Ok(Action::Update),
            "update_status" | "status" => Ok(Action::UpdateStatus),
            "delete" => Ok(Action::Delete),
            _ => Err(Error::InvalidAction(s.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "entity_tests.rs"]
mod tests;
