// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use sw_core::{Action, Entity, EntityType, Mutation, Projector};
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::cache::EntityCache;
use crate::sync::{
    CollectionSource, ExecResult, Notification, Notifier, SyncEngine, SyncError, SyncEvent,
};

/// Where an optimistic update stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    /// Projected locally and queued.
    Pending,
    /// Superseded by authoritative data.
    Confirmed,
    /// Snapshot restored.
    RolledBack,
}

/// Handle for one optimistic mutation.
#[derive(Debug, Clone)]
pub struct PendingUpdate<E> {
    record_id: String,
    entity_type: EntityType,
    action: Action,
    snapshot: Vec<E>,
    state: UpdateState,
}

impl<E> PendingUpdate<E> {
    /// Id of the queued record carrying this mutation.
    pub fn record_id(&self) -> &str {
        &self.record_id
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn action(&self) -> Action {
        self.action
    }

    /// Collection as it was before the projection.
    pub fn snapshot(&self) -> &[E] {
        &self.snapshot
    }

    pub fn state(&self) -> UpdateState {
        self.state
    }
}

/// Applies mutations to an [`EntityCache`] immediately and reconciles the
/// cache with what the sync engine later reports.
pub struct OptimisticBridge<E> {
    engine: SyncEngine,
    cache: EntityCache<E>,
    notifier: Arc<dyn Notifier>,
    /// Snapshots of updates still waiting for delivery, by record id.
    pending: Arc<Mutex<HashMap<String, Vec<E>>>>,
}

impl<E> Clone for OptimisticBridge<E> {
    fn clone(&self) -> Self {
        OptimisticBridge {
            engine: self.engine.clone(),
            cache: self.cache.clone(),
            notifier: Arc::clone(&self.notifier),
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<E: Entity> OptimisticBridge<E> {
    /// Uses the engine's notifier.
    pub fn new(engine: SyncEngine, cache: EntityCache<E>) -> Self {
        let notifier = engine.notifier();
        OptimisticBridge {
            engine,
            cache,
            notifier,
            pending: Arc::default(),
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn cache(&self) -> &EntityCache<E> {
        &self.cache
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashMap<String, Vec<E>>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Number of updates still waiting for delivery.
    pub fn pending_count(&self) -> usize {
        self.lock_pending().len()
    }

    /// Snapshots the cache, applies the projection, then enqueues.
    ///
    /// If the engine refuses the mutation the snapshot is restored before
    /// the failure notification goes out and the error is returned.
    pub fn mutate<M>(&self, mutation: M) -> Result<PendingUpdate<E>, SyncError>
    where
        M: Projector<E> + Into<Mutation>,
    {
        let now_ms = self.engine.now_ms();
        let snapshot = self
            .cache
            .update(|current| mutation.project(current, now_ms));
        let mutation: Mutation = mutation.into();
        let (entity_type, action) = (mutation.entity_type(), mutation.action());

        match self.engine.enqueue(mutation) {
            Ok(record_id) => {
                self.lock_pending()
                    .insert(record_id.clone(), snapshot.clone());
                self.notifier
                    .notify(Notification::accepted(entity_type, action));
                Ok(PendingUpdate {
                    record_id,
                    entity_type,
                    action,
                    snapshot,
                    state: UpdateState::Pending,
                })
            }
            Err(e) => {
                self.cache.restore(snapshot);
                let message = e.to_string();
                let reason = message.lines().next().unwrap_or_default();
                tracing::debug!(%entity_type, %action, error = %e, "optimistic update rolled back");
                self.notifier
                    .notify(Notification::rejected(entity_type, action, reason));
                Err(e)
            }
        }
    }

    /// Restores the update's snapshot. Returns whether the cache changed;
    /// repeated calls and calls after delivery do nothing.
    pub fn rollback(&self, update: &mut PendingUpdate<E>) -> bool {
        if update.state != UpdateState::Pending {
            return false;
        }
        update.state = UpdateState::RolledBack;
        let still_pending = self.lock_pending().remove(&update.record_id).is_some();
        if still_pending {
            self.cache.restore(update.snapshot.clone());
        }
        still_pending
    }

    /// Marks the cache stale, refetches and installs the authoritative
    /// collection. On fetch failure the optimistic state stays in place.
    pub async fn confirm(
        &self,
        update: &mut PendingUpdate<E>,
        source: &dyn CollectionSource<E>,
    ) -> ExecResult<()> {
        self.cache.invalidate();
        let fresh = source.fetch_all().await?;
        self.cache.replace(fresh);
        self.lock_pending().remove(&update.record_id);
        if update.state == UpdateState::Pending {
            update.state = UpdateState::Confirmed;
        }
        Ok(())
    }

    /// Refetches when the cache is stale. Returns whether it refetched.
    pub async fn refresh(&self, source: &dyn CollectionSource<E>) -> ExecResult<bool> {
        if !self.cache.is_stale() {
            return Ok(false);
        }
        let fresh = source.fetch_all().await?;
        self.cache.replace(fresh);
        Ok(true)
    }

    /// Reconciles the cache with one engine event. Returns whether the
    /// event concerned this bridge.
    pub fn handle_event(&self, event: &SyncEvent) -> bool {
        match event {
            SyncEvent::Delivered {
                record_id,
                entity_type,
                ..
            } if *entity_type == E::ENTITY_TYPE => {
                self.lock_pending().remove(record_id);
                self.cache.invalidate();
                true
            }
            SyncEvent::Evicted {
                record_id,
                entity_type,
                ..
            } if *entity_type == E::ENTITY_TYPE => {
                // The engine already told the user; roll back quietly.
                let snapshot = self.lock_pending().remove(record_id);
                match snapshot {
                    Some(snapshot) => {
                        tracing::debug!(record_id = %record_id, "rolling back evicted update");
                        self.cache.restore(snapshot);
                        true
                    }
                    None => false,
                }
            }
            SyncEvent::Cleared { .. } => {
                let had_pending = {
                    let mut pending = self.lock_pending();
                    let had = !pending.is_empty();
                    pending.clear();
                    had
                };
                if had_pending {
                    self.cache.invalidate();
                }
                had_pending
            }
            _ => false,
        }
    }

    /// Follows engine events until `cancel` fires.
    pub fn listen(&self, cancel: CancellationToken) -> JoinHandle<()> {
        let bridge = self.clone();
        let mut events = self.engine.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    event = events.recv() => match event {
                        Ok(event) => {
                            bridge.handle_event(&event);
                        }
                        Err(RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "bridge lagged behind sync events, marking cache stale");
                            bridge.cache.invalidate();
                        }
                        Err(RecvError::Closed) => break,
                    },
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "bridge_tests.rs"]
mod tests;
