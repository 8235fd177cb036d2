// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing notifications.

use std::fmt;

use sw_core::{Action, EntityType};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A short message shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub entity_type: EntityType,
    pub action: Action,
}

impl Notification {
    /// A mutation was accepted locally and queued.
    pub fn accepted(entity_type: EntityType, action: Action) -> Self {
        Notification {
            level: NotificationLevel::Success,
            message: format!("{} {}", entity_type.noun(), action.past_tense()),
            entity_type,
            action,
        }
    }

    /// A mutation could not be accepted locally.
    pub fn rejected(entity_type: EntityType, action: Action, reason: &str) -> Self {
        Notification {
            level: NotificationLevel::Error,
            message: format!(
                "Failed to {} {}: {}",
                verb(action),
                entity_type.noun().to_lowercase(),
                reason
            ),
            entity_type,
            action,
        }
    }

    /// A queued mutation exhausted its retries and was dropped.
    pub fn evicted(entity_type: EntityType, action: Action, attempts: u32) -> Self {
        Notification {
            level: NotificationLevel::Error,
            message: format!("Failed to sync {entity_type} {action} after {attempts} attempts"),
            entity_type,
            action,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

fn verb(action: Action) -> &'static str {
    match action {
        Action::Create => "create",
        Action::Update => "update",
        Action::UpdateStatus => "update status of",
        Action::Delete => "delete",
    }
}

/// Sink for notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Emits notifications as log events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, n: Notification) {
        match n.level {
            NotificationLevel::Success => tracing::info!(
                entity_type = %n.entity_type,
                action = %n.action,
                "{}",
                n.message
            ),
            NotificationLevel::Error => tracing::warn!(
                entity_type = %n.entity_type,
                action = %n.action,
                "{}",
                n.message
            ),
        }
    }
}

#[cfg(test)]
#[path = "notify_tests.rs"]
mod tests;
