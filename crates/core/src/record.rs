// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queued operation records.
//!
//! An [`OperationRecord`] is one mutation waiting for delivery. Records keep
//! the untyped `(entityType, action, payload)` triple exactly as persisted;
//! [`OperationRecord::mutation`] decodes it on demand, so a record that no
//! longer decodes is still a record and goes through the normal bounded
//! retry path instead of poisoning the whole queue.

use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entity::{Action, EntityType};
use crate::error::Result;
use crate::mutation::Mutation;

/// Length of the random id suffix.
const ID_SUFFIX_LEN: usize = 9;

/// One pending mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRecord {
    /// Unique within the queue. See [`generate_record_id`].
    pub id: String,
    pub entity_type: EntityType,
    pub action: Action,
    /// Wire payload for the remote call.
    pub payload: Value,
    /// Milliseconds since Unix epoch at enqueue time.
    pub enqueued_at: u64,
    /// Failed delivery attempts so far.
    #[serde(default)]
    pub retry_count: u32,
}

impl OperationRecord {
    /// Builds a fresh record for `mutation` enqueued at `now_ms`.
    pub fn new(mutation: &Mutation, now_ms: u64) -> Result<Self> {
        let entity_type = mutation.entity_type();
        let action = mutation.action();
        Ok(OperationRecord {
            id: generate_record_id(entity_type, action, now_ms),
            entity_type,
            action,
            payload: mutation.payload()?,
            enqueued_at: now_ms,
            retry_count: 0,
        })
    }

    /// Decodes the typed mutation this record carries.
    pub fn mutation(&self) -> Result<Mutation> {
        Mutation::from_parts(self.entity_type, self.action, self.payload.clone())
    }

    /// Short `entity/action` label for logs and notifications.
    pub fn label(&self) -> String {
        format!("{}/{}", self.entity_type, self.action)
    }
}

/// Generates a record id: `{entity}_{action}_{millis}_{random}`.
///
/// The random suffix keeps ids unique for enqueues in the same millisecond.
pub fn generate_record_id(entity_type: EntityType, action: Action, now_ms: u64) -> String {
    format!("{}_{}_{}_{}", entity_type, action, now_ms, random_suffix())
}

pub(crate) fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ID_SUFFIX_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// Read-only snapshot of queue health for the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    pub pending_operations: usize,
    pub is_processing: bool,
    pub is_online: bool,
}

#[cfg(test)]
#[path = "record_tests.rs"]
mod tests;
