// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The sync engine: a durable FIFO of pending mutations and the drain loop
//! that delivers them.
//!
//! # Invariants
//!
//! - Every change is a read-modify-write of the persisted queue under the
//!   store lock, and the in-memory queue adopts what was written. Records
//!   another process queued in the same store are carried along, never
//!   overwritten.
//! - A drain starts from the persisted queue, so it picks up records other
//!   processes queued since the last change.
//! - At most one drain runs at a time. A drain requested while another is
//!   running returns `None` without touching the queue.
//! - A drain works on a snapshot taken when it starts. Records enqueued
//!   meanwhile wait for the next drain.
//! - `retry_count` only grows, and a record is evicted (with exactly one
//!   failure notification) the moment it reaches `max_retries`.
//!
//! The queue mutex is never held across an executor call, so enqueues and
//! status reads stay responsive during slow deliveries.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use sw_core::{Action, Clock, EntityType, Mutation, OperationRecord, QueueStatus, SystemClock};
use tokio::sync::broadcast;

use super::executor::{Beacon, ExecutorError, RemoteExecutor};
use super::notify::{Notification, Notifier, TracingNotifier};
use super::store::QueueStore;
use crate::storage::StoreError;

/// Attempts a record gets before it is evicted.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Buffered events per subscriber before the slowest one starts lagging.
const EVENT_CAPACITY: usize = 256;

/// Error type for engine operations.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Core(#[from] sw_core::Error),

    #[error("failed to persist sync queue: {0}")]
    Store(#[from] StoreError),
}

/// Engine tuning.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub max_retries: u32,
    /// Initial connectivity assumption until the host reports otherwise.
    pub start_online: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_retries: DEFAULT_MAX_RETRIES,
            start_online: true,
        }
    }
}

/// Outcome counts for one drain pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrainReport {
    pub attempted: usize,
    pub delivered: usize,
    pub retried: usize,
    pub evicted: usize,
}

/// Everything observable that the engine does.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncEvent {
    Enqueued {
        record_id: String,
        entity_type: EntityType,
        action: Action,
    },
    DrainStarted {
        pending: usize,
    },
    Delivered {
        record_id: String,
        entity_type: EntityType,
        action: Action,
    },
    Failed {
        record_id: String,
        entity_type: EntityType,
        action: Action,
        retry_count: u32,
        error: String,
    },
    Evicted {
        record_id: String,
        entity_type: EntityType,
        action: Action,
        error: String,
    },
    Cleared {
        count: usize,
    },
    DrainFinished(DrainReport),
}

/// Resets the processing flag when a drain ends, however it ends.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

struct Inner {
    queue: Mutex<Vec<OperationRecord>>,
    store: QueueStore,
    executor: Arc<dyn RemoteExecutor>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    online: AtomicBool,
    processing: AtomicBool,
    max_retries: u32,
    events: broadcast::Sender<SyncEvent>,
}

impl Inner {
    fn lock_queue(&self) -> MutexGuard<'_, Vec<OperationRecord>> {
        self.queue.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Applies `change` to the persisted queue and adopts the result.
    /// On error `queue` is left as it was.
    fn commit<R>(
        &self,
        queue: &mut Vec<OperationRecord>,
        change: impl FnOnce(&mut Vec<OperationRecord>) -> R,
    ) -> Result<R, StoreError> {
        let (records, result) = self.store.update(change)?;
        *queue = records;
        Ok(result)
    }

    /// Commits a drain outcome. Failures are logged, not raised, and the
    /// change is applied to the in-memory queue alone.
    fn commit_quietly<R>(
        &self,
        queue: &mut Vec<OperationRecord>,
        mut change: impl FnMut(&mut Vec<OperationRecord>) -> R,
    ) -> R {
        match self.commit(queue, &mut change) {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(error = %e, pending = queue.len(), "failed to persist sync queue");
                change(queue)
            }
        }
    }

    /// Reloads the persisted queue, keeping the in-memory one if the store
    /// cannot be read.
    fn refresh(&self, queue: &mut Vec<OperationRecord>) {
        match self.store.read() {
            Ok(records) => *queue = records,
            Err(e) => tracing::warn!(error = %e, "sync queue unreadable, using in-memory copy"),
        }
    }

    fn emit(&self, event: SyncEvent) {
        // Err only means nobody is subscribed.
        let _ = self.events.send(event);
    }
}

/// Builder for [`SyncEngine`].
pub struct SyncEngineBuilder {
    store: QueueStore,
    executor: Arc<dyn RemoteExecutor>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    config: EngineConfig,
}

impl SyncEngineBuilder {
    pub fn notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads the persisted queue and builds the engine.
    pub fn build(self) -> SyncEngine {
        let queue = self.store.load();
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        tracing::debug!(pending = queue.len(), "sync engine ready");
        SyncEngine {
            inner: Arc::new(Inner {
                queue: Mutex::new(queue),
                store: self.store,
                executor: self.executor,
                notifier: self.notifier,
                clock: self.clock,
                online: AtomicBool::new(self.config.start_online),
                processing: AtomicBool::new(false),
                max_retries: self.config.max_retries.max(1),
                events,
            }),
        }
    }
}

/// Handle to the sync engine. Clones share one queue.
#[derive(Clone)]
pub struct SyncEngine {
    inner: Arc<Inner>,
}

impl SyncEngine {
    pub fn builder(store: QueueStore, executor: Arc<dyn RemoteExecutor>) -> SyncEngineBuilder {
        SyncEngineBuilder {
            store,
            executor,
            notifier: Arc::new(TracingNotifier),
            clock: Arc::new(SystemClock),
            config: EngineConfig::default(),
        }
    }

    /// Validates, records and persists `mutation`, returning the new
    /// record id. When online and idle a drain is requested right away.
    ///
    /// Nothing is queued if validation or persistence fails.
    pub fn enqueue(&self, mutation: Mutation) -> Result<String, SyncError> {
        mutation.validate()?;
        let record = OperationRecord::new(&mutation, self.inner.clock.now_ms())?;
        let record_id = record.id.clone();
        let (entity_type, action) = (record.entity_type, record.action);

        {
            let mut queue = self.inner.lock_queue();
            self.inner.commit(&mut queue, |records| records.push(record))?;
        }

        tracing::debug!(record_id = %record_id, %entity_type, %action, "enqueued operation");
        self.inner.emit(SyncEvent::Enqueued {
            record_id: record_id.clone(),
            entity_type,
            action,
        });

        if self.is_online() && !self.is_processing() {
            self.request_drain();
        }
        Ok(record_id)
    }

    /// Spawns a drain on the current runtime. Returns false when there is
    /// no runtime to spawn on; the next trigger picks the work up instead.
    pub fn request_drain(&self) -> bool {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let engine = self.clone();
                handle.spawn(async move {
                    engine.drain().await;
                });
                true
            }
            Err(_) => {
                tracing::debug!("no runtime, leaving drain to the next trigger");
                false
            }
        }
    }

    /// Attempts every record present when the pass starts, oldest first.
    ///
    /// Returns `None` when offline, when another drain is running, or when
    /// there is nothing to send.
    pub async fn drain(&self) -> Option<DrainReport> {
        let inner = &self.inner;
        if !self.is_online() {
            tracing::debug!("offline, skipping drain");
            return None;
        }
        if inner
            .processing
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!("drain already in progress");
            return None;
        }
        let _guard = ProcessingGuard(&inner.processing);

        let snapshot = {
            let mut queue = inner.lock_queue();
            inner.refresh(&mut queue);
            queue.clone()
        };
        if snapshot.is_empty() {
            return None;
        }

        tracing::debug!(pending = snapshot.len(), "drain started");
        inner.emit(SyncEvent::DrainStarted {
            pending: snapshot.len(),
        });

        let mut report = DrainReport::default();
        for record in snapshot {
            report.attempted += 1;
            let result = match record.mutation() {
                Ok(mutation) => inner.executor.execute(&record.id, &mutation).await,
                Err(e) => Err(ExecutorError::Undeliverable(e.to_string())),
            };
            match result {
                Ok(()) => self.on_delivered(&record, &mut report),
                Err(e) => self.on_failed(&record, &e, &mut report),
            }
        }

        tracing::info!(
            delivered = report.delivered,
            retried = report.retried,
            evicted = report.evicted,
            "drain finished"
        );
        inner.emit(SyncEvent::DrainFinished(report));
        Some(report)
    }

    fn on_delivered(&self, record: &OperationRecord, report: &mut DrainReport) {
        {
            let mut queue = self.inner.lock_queue();
            self.inner
                .commit_quietly(&mut queue, |records| records.retain(|r| r.id != record.id));
        }
        report.delivered += 1;
        tracing::debug!(
            record_id = %record.id,
            entity_type = %record.entity_type,
            action = %record.action,
            "delivered operation"
        );
        self.inner.emit(SyncEvent::Delivered {
            record_id: record.id.clone(),
            entity_type: record.entity_type,
            action: record.action,
        });
    }

    fn on_failed(&self, record: &OperationRecord, error: &ExecutorError, report: &mut DrainReport) {
        let max_retries = self.inner.max_retries;
        let outcome = {
            let mut queue = self.inner.lock_queue();
            self.inner.commit_quietly(&mut queue, |records| {
                let pos = records.iter().position(|r| r.id == record.id)?;
                records[pos].retry_count += 1;
                let retry_count = records[pos].retry_count;
                let evicted = retry_count >= max_retries;
                if evicted {
                    records.remove(pos);
                }
                Some((retry_count, evicted))
            })
        };
        let Some((retry_count, evicted)) = outcome else {
            // Cleared while the call was in flight.
            return;
        };

        if evicted {
            report.evicted += 1;
            tracing::warn!(
                record_id = %record.id,
                entity_type = %record.entity_type,
                action = %record.action,
                retry_count,
                error = %error,
                "evicting operation after final attempt"
            );
            self.inner.notifier.notify(Notification::evicted(
                record.entity_type,
                record.action,
                retry_count,
            ));
            self.inner.emit(SyncEvent::Evicted {
                record_id: record.id.clone(),
                entity_type: record.entity_type,
                action: record.action,
                error: error.to_string(),
            });
        } else {
            report.retried += 1;
            tracing::info!(
                record_id = %record.id,
                entity_type = %record.entity_type,
                action = %record.action,
                retry_count,
                transient = error.is_transient(),
                error = %error,
                "delivery failed, will retry"
            );
            self.inner.emit(SyncEvent::Failed {
                record_id: record.id.clone(),
                entity_type: record.entity_type,
                action: record.action,
                retry_count,
                error: error.to_string(),
            });
        }
    }

    /// Drains now if online, whatever asked for it.
    pub async fn force_sync(&self) -> Option<DrainReport> {
        if !self.is_online() {
            tracing::debug!("force sync requested while offline");
            return None;
        }
        self.drain().await
    }

    /// Drops every pending record without attempting delivery. Returns
    /// how many were dropped.
    pub fn clear_queue(&self) -> Result<usize, SyncError> {
        let count = {
            let mut queue = self.inner.lock_queue();
            self.inner
                .commit(&mut queue, |records| std::mem::take(records).len())?
        };
        tracing::info!(count, "cleared sync queue");
        self.inner.emit(SyncEvent::Cleared { count });
        Ok(count)
    }

    pub fn queue_status(&self) -> QueueStatus {
        QueueStatus {
            pending_operations: self.pending_count(),
            is_processing: self.is_processing(),
            is_online: self.is_online(),
        }
    }

    pub fn pending_count(&self) -> usize {
        self.inner.lock_queue().len()
    }

    /// Copy of the pending records in delivery order.
    pub fn records(&self) -> Vec<OperationRecord> {
        self.inner.lock_queue().clone()
    }

    pub fn is_online(&self) -> bool {
        self.inner.online.load(Ordering::Acquire)
    }

    pub fn is_processing(&self) -> bool {
        self.inner.processing.load(Ordering::Acquire)
    }

    /// Records connectivity. Returns true on an offline to online edge.
    pub fn set_online(&self, online: bool) -> bool {
        let was_online = self.inner.online.swap(online, Ordering::AcqRel);
        if was_online != online {
            tracing::debug!(online, "connectivity updated");
        }
        online && !was_online
    }

    /// Hands every pending record to `beacon` without waiting and without
    /// removing anything. Returns how many records were handed off.
    pub fn flush_on_unload(&self, beacon: &dyn Beacon) -> usize {
        let records = self.records();
        if records.is_empty() {
            return 0;
        }
        let count = records.len();
        if beacon.send(records) {
            tracing::info!(count, "handed pending operations to unload beacon");
            count
        } else {
            tracing::warn!(count, "unload beacon refused pending operations");
            0
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SyncEvent> {
        self.inner.events.subscribe()
    }

    pub(crate) fn now_ms(&self) -> u64 {
        self.inner.clock.now_ms()
    }

    pub(crate) fn notifier(&self) -> Arc<dyn Notifier> {
        Arc::clone(&self.inner.notifier)
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
