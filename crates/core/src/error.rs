// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for sw-core operations.

use thiserror::Error;

/// All possible errors that can occur in sw-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid entity type: '{0}'\n  hint: valid types are: users, cameras, alerts")]
    InvalidEntityType(String),

    #[error(
        "invalid action: '{0}'\n  hint: valid actions are: create, update, update_status, delete"
    )]
    InvalidAction(String),

    #[error("unsupported action: {entity_type} does not support '{action}'\n  hint: {entity_type} supports: {supported}")]
    UnsupportedAction {
        entity_type: String,
        action: String,
        supported: String,
    },

    #[error("invalid payload for {entity_type}/{action}: {reason}")]
    InvalidPayload {
        entity_type: String,
        action: String,
        reason: String,
    },

    #[error("invalid user status action: '{0}'\n  hint: valid actions are: Block, Unblock, Activate, Deactivate")]
    InvalidStatusAction(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for sw-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
