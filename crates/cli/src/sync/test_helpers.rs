// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fakes for sync and optimistic update tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::json;
use sw_core::{
    CameraMutation, CameraRef, Entity, ManualClock, Mutation, OperationRecord, UserMutation,
    UserStatusAction, UserStatusChange,
};
use tokio::sync::Semaphore;

use super::engine::{EngineConfig, SyncEngine};
use super::executor::{Beacon, CollectionSource, ExecResult, ExecutorError, RemoteExecutor};
use super::notify::{Notification, Notifier};
use super::probe::HealthCheck;
use super::store::{QueueStore, QUEUE_STORAGE_KEY};
use crate::storage::MemoryStore;

/// Fixed start time for engine clocks.
pub const T0: u64 = 1_760_000_000_000;

/// Executor that records calls and replays scripted outcomes.
///
/// Outcomes are consumed in order; once the script runs out every call
/// gets the fallback (success unless set with [`MockExecutor::failing`]).
#[derive(Clone, Default)]
pub struct MockExecutor {
    calls: Arc<Mutex<Vec<(String, Mutation)>>>,
    script: Arc<Mutex<VecDeque<ExecResult<()>>>>,
    fallback: Arc<Mutex<Option<ExecutorError>>>,
    gate: Option<Arc<Semaphore>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call fails with `error`.
    pub fn failing(error: ExecutorError) -> Self {
        let exec = Self::default();
        *exec.fallback.lock().unwrap() = Some(error);
        exec
    }

    /// Every call waits for a permit from the returned semaphore first.
    pub fn gated() -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        let exec = MockExecutor {
            gate: Some(Arc::clone(&gate)),
            ..Self::default()
        };
        (exec, gate)
    }

    pub fn push_outcome(&self, outcome: ExecResult<()>) {
        self.script.lock().unwrap().push_back(outcome);
    }

    pub fn calls(&self) -> Vec<(String, Mutation)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl RemoteExecutor for MockExecutor {
    fn execute<'a>(
        &'a self,
        record_id: &'a str,
        mutation: &'a Mutation,
    ) -> Pin<Box<dyn Future<Output = ExecResult<()>> + Send + 'a>> {
        Box::pin(async move {
            self.calls
                .lock()
                .unwrap()
                .push((record_id.to_string(), mutation.clone()));
            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            if let Some(outcome) = self.script.lock().unwrap().pop_front() {
                return outcome;
            }
            match self.fallback.lock().unwrap().clone() {
                Some(error) => Err(error),
                None => Ok(()),
            }
        })
    }
}

/// Notifier that keeps everything it is given.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    seen: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn all(&self) -> Vec<Notification> {
        self.seen.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.seen.lock().unwrap().push(notification);
    }
}

/// Beacon that records hand-offs.
#[derive(Clone)]
pub struct RecordingBeacon {
    sent: Arc<Mutex<Vec<Vec<OperationRecord>>>>,
    accept: bool,
}

impl RecordingBeacon {
    pub fn accepting() -> Self {
        RecordingBeacon {
            sent: Arc::default(),
            accept: true,
        }
    }

    pub fn refusing() -> Self {
        RecordingBeacon {
            sent: Arc::default(),
            accept: false,
        }
    }

    pub fn sent(&self) -> Vec<Vec<OperationRecord>> {
        self.sent.lock().unwrap().clone()
    }
}

impl Beacon for RecordingBeacon {
    fn send(&self, records: Vec<OperationRecord>) -> bool {
        if self.accept {
            self.sent.lock().unwrap().push(records);
        }
        self.accept
    }
}

/// Collection source backed by a vector, standing in for the server.
#[derive(Clone)]
pub struct FakeSource<E> {
    items: Arc<Mutex<Vec<E>>>,
    fetches: Arc<AtomicUsize>,
    fail: Arc<AtomicBool>,
}

impl<E: Entity> FakeSource<E> {
    pub fn new(items: Vec<E>) -> Self {
        FakeSource {
            items: Arc::new(Mutex::new(items)),
            fetches: Arc::default(),
            fail: Arc::default(),
        }
    }

    pub fn set_items(&self, items: Vec<E>) {
        *self.items.lock().unwrap() = items;
    }

    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl<E: Entity> CollectionSource<E> for FakeSource<E> {
    fn fetch_all(&self) -> Pin<Box<dyn Future<Output = ExecResult<Vec<E>>> + Send + '_>> {
        Box::pin(async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(ExecutorError::Network("unreachable".into()));
            }
            Ok(self.items.lock().unwrap().clone())
        })
    }
}

/// Health check answering from a flag.
#[derive(Clone, Default)]
pub struct FakeHealth {
    reachable: Arc<AtomicBool>,
    checks: Arc<AtomicUsize>,
}

impl FakeHealth {
    pub fn set(&self, reachable: bool) {
        self.reachable.store(reachable, Ordering::SeqCst);
    }

    pub fn checks(&self) -> usize {
        self.checks.load(Ordering::SeqCst)
    }
}

impl HealthCheck for FakeHealth {
    fn check(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>> {
        Box::pin(async move {
            self.checks.fetch_add(1, Ordering::SeqCst);
            self.reachable.load(Ordering::SeqCst)
        })
    }
}

/// An engine wired to in-memory fakes.
pub struct Harness {
    pub engine: SyncEngine,
    pub executor: MockExecutor,
    pub notifier: RecordingNotifier,
    pub kv: MemoryStore,
    pub clock: Arc<ManualClock>,
}

impl Harness {
    /// Builds an engine over `kv` (which may already hold a queue).
    pub fn with_store(executor: MockExecutor, kv: MemoryStore, online: bool) -> Self {
        let notifier = RecordingNotifier::default();
        let clock = Arc::new(ManualClock::new(T0));
        let engine = SyncEngine::builder(QueueStore::new(Arc::new(kv.clone())), Arc::new(executor.clone()))
            .notifier(Arc::new(notifier.clone()))
            .clock(clock.clone())
            .config(EngineConfig {
                start_online: online,
                ..EngineConfig::default()
            })
            .build();
        Harness {
            engine,
            executor,
            notifier,
            kv,
            clock,
        }
    }

    pub fn offline(executor: MockExecutor) -> Self {
        Self::with_store(executor, MemoryStore::new(), false)
    }

    pub fn online(executor: MockExecutor) -> Self {
        Self::with_store(executor, MemoryStore::new(), true)
    }

    /// Number of records currently persisted.
    pub fn persisted_len(&self) -> usize {
        match self.kv.raw(QUEUE_STORAGE_KEY) {
            Some(raw) => serde_json::from_str::<Vec<serde_json::Value>>(&raw).unwrap().len(),
            None => 0,
        }
    }

    pub fn persisted(&self) -> Vec<OperationRecord> {
        self.kv
            .raw(QUEUE_STORAGE_KEY)
            .map(|raw| serde_json::from_str(&raw).unwrap())
            .unwrap_or_default()
    }
}

pub fn block_user(user_id: &str) -> Mutation {
    Mutation::Users(UserMutation::UpdateStatus(UserStatusChange {
        user_id: user_id.to_string(),
        action: UserStatusAction::Block,
    }))
}

pub fn delete_camera(camera_id: &str) -> Mutation {
    Mutation::Cameras(CameraMutation::Delete(CameraRef {
        camera_id: camera_id.to_string(),
    }))
}

/// A persisted record whose payload no longer decodes.
pub fn undecodable_record(id: &str) -> serde_json::Value {
    json!({
        "id": id,
        "entityType": "users",
        "action": "update_status",
        "payload": { "userId": "1", "action": "Suspend" },
        "enqueuedAt": T0,
        "retryCount": 0
    })
}

/// Yields until `cond` holds or a generous bound is hit.
pub async fn wait_until(mut cond: impl FnMut() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
