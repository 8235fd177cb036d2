// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Persistent queue store.
//!
//! The whole queue is stored as one JSON array under [`QUEUE_STORAGE_KEY`].
//! Loading never fails: missing data is an empty queue, and unreadable or
//! corrupt data is logged, discarded and treated as an empty queue so a bad
//! write can never wedge the client. A single entry that no longer decodes
//! is dropped on its own.
//!
//! Several processes may share one queue, so changes go through
//! [`QueueStore::update`] rather than overwriting the whole queue.

use std::sync::Arc;

use sw_core::OperationRecord;

use crate::storage::{KeyValueStore, StoreError, StoreResult};

/// Storage key holding the serialized queue.
pub const QUEUE_STORAGE_KEY: &str = "safewatch_sync_queue";

/// Decodes a stored queue. Only a value that is not a JSON array is an
/// error; entries that do not decode as records are logged and skipped so
/// their neighbours survive.
fn decode(raw: &str) -> serde_json::Result<Vec<OperationRecord>> {
    let entries: Vec<serde_json::Value> = serde_json::from_str(raw)?;
    let records = entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(index, error = %e, "dropping unreadable queued operation");
                None
            }
        })
        .collect();
    Ok(records)
}

/// Reads and writes the queue through a [`KeyValueStore`].
#[derive(Clone)]
pub struct QueueStore {
    kv: Arc<dyn KeyValueStore>,
}

impl QueueStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        QueueStore { kv }
    }

    /// Loads the persisted queue in stored order.
    pub fn load(&self) -> Vec<OperationRecord> {
        let raw = match self.kv.get(QUEUE_STORAGE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "queue storage unreadable, starting empty");
                return Vec::new();
            }
        };

        match decode(&raw) {
            Ok(records) => {
                tracing::debug!(count = records.len(), "loaded sync queue");
                records
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding corrupt sync queue");
                if let Err(e) = self.kv.remove(QUEUE_STORAGE_KEY) {
                    tracing::warn!(error = %e, "failed to remove corrupt sync queue");
                }
                Vec::new()
            }
        }
    }

    /// Like [`QueueStore::load`] but reports an unreadable store instead of
    /// treating it as empty.
    pub fn read(&self) -> StoreResult<Vec<OperationRecord>> {
        match self.kv.get(QUEUE_STORAGE_KEY)? {
            Some(raw) => Ok(decode(&raw).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "persisted sync queue is corrupt, reading as empty");
                Vec::new()
            })),
            None => Ok(Vec::new()),
        }
    }

    /// Replaces the persisted queue with `records`.
    pub fn save(&self, records: &[OperationRecord]) -> StoreResult<()> {
        let json = serde_json::to_string(records)?;
        self.kv.set(QUEUE_STORAGE_KEY, &json)
    }

    /// Applies `change` to the persisted queue while holding the store lock
    /// and returns the queue as written along with `change`'s result.
    ///
    /// Records other processes added since this one last looked are part
    /// of what `change` sees, so they are never overwritten.
    pub fn update<R>(
        &self,
        change: impl FnOnce(&mut Vec<OperationRecord>) -> R,
    ) -> StoreResult<(Vec<OperationRecord>, R)> {
        let mut change = Some(change);
        let mut applied = None;
        self.kv.update(QUEUE_STORAGE_KEY, &mut |raw| {
            let Some(change) = change.take() else {
                return Ok(None);
            };
            let mut records = match raw.as_deref().map(decode) {
                Some(Ok(records)) => records,
                Some(Err(e)) => {
                    tracing::warn!(error = %e, "overwriting corrupt sync queue");
                    Vec::new()
                }
                None => Vec::new(),
            };
            let result = change(&mut records);
            let json = serde_json::to_string(&records)?;
            applied = Some((records, result));
            Ok(Some(json))
        })?;
        applied.ok_or_else(|| StoreError::Unavailable("queue update was not applied".to_string()))
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
