// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Trigger surface for the sync engine.
//!
//! [`SyncService`] owns one background task that turns outside signals into
//! drain requests:
//!
//! - a periodic timer (every `interval` while online)
//! - connectivity restored (offline to online edge)
//! - visibility restored (hidden to visible while online)
//! - unload, which hands the queue to the beacon instead of draining
//!
//! The host reports connectivity, visibility and unload through an
//! [`EnvironmentHandle`]. Drains run as tracked tasks so a slow delivery
//! never blocks event handling; the engine drops any drain that overlaps a
//! running one.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::engine::SyncEngine;
use super::executor::Beacon;

/// Default period of the drain timer.
pub const DEFAULT_SYNC_INTERVAL: Duration = Duration::from_secs(30);

/// Signals from the hosting environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentEvent {
    Connectivity(bool),
    Visibility(bool),
    Unload,
}

/// Cloneable sender for [`EnvironmentEvent`]s.
///
/// Every method returns false once the service has stopped.
#[derive(Debug, Clone)]
pub struct EnvironmentHandle {
    tx: mpsc::UnboundedSender<EnvironmentEvent>,
}

impl EnvironmentHandle {
    pub fn send(&self, event: EnvironmentEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    pub fn set_online(&self, online: bool) -> bool {
        self.send(EnvironmentEvent::Connectivity(online))
    }

    pub fn set_visible(&self, visible: bool) -> bool {
        self.send(EnvironmentEvent::Visibility(visible))
    }

    pub fn unload(&self) -> bool {
        self.send(EnvironmentEvent::Unload)
    }
}

/// Runs the sync triggers between `start()` and `stop()`.
pub struct SyncService {
    engine: SyncEngine,
    beacon: Arc<dyn Beacon>,
    interval: Duration,
    env_tx: mpsc::UnboundedSender<EnvironmentEvent>,
    env_rx: Option<mpsc::UnboundedReceiver<EnvironmentEvent>>,
    cancel: CancellationToken,
    drains: TaskTracker,
    task: Option<JoinHandle<()>>,
}

impl SyncService {
    pub fn new(engine: SyncEngine, beacon: Arc<dyn Beacon>, interval: Duration) -> Self {
        let (env_tx, env_rx) = mpsc::unbounded_channel();
        SyncService {
            engine,
            beacon,
            interval,
            env_tx,
            env_rx: Some(env_rx),
            cancel: CancellationToken::new(),
            drains: TaskTracker::new(),
            task: None,
        }
    }

    pub fn environment(&self) -> EnvironmentHandle {
        EnvironmentHandle {
            tx: self.env_tx.clone(),
        }
    }

    pub fn engine(&self) -> &SyncEngine {
        &self.engine
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Spawns the trigger loop. A service starts at most once; later calls
    /// return false.
    pub fn start(&mut self) -> bool {
        let Some(env_rx) = self.env_rx.take() else {
            return false;
        };
        let triggers = Triggers {
            engine: self.engine.clone(),
            beacon: Arc::clone(&self.beacon),
            drains: self.drains.clone(),
            visible: true,
        };
        let interval = self.interval;
        let cancel = self.cancel.clone();

        tracing::debug!(interval_secs = interval.as_secs(), "sync service starting");
        self.task = Some(tokio::spawn(triggers.run(interval, env_rx, cancel)));
        true
    }

    /// Cancels the trigger loop and waits for it, any in-flight drain and
    /// any beacon send still under way.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "sync service task failed");
            }
        }
        self.drains.close();
        self.drains.wait().await;
        self.beacon.settle().await;
        tracing::debug!("sync service stopped");
    }
}

struct Triggers {
    engine: SyncEngine,
    beacon: Arc<dyn Beacon>,
    drains: TaskTracker,
    visible: bool,
}

impl Triggers {
    async fn run(
        mut self,
        interval: Duration,
        mut env_rx: mpsc::UnboundedReceiver<EnvironmentEvent>,
        cancel: CancellationToken,
    ) {
        let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // Events queued before stop() are still handled, so an unload
            // sent right before shutdown reaches the beacon.
            tokio::select! {
                biased;
                event = env_rx.recv() => match event {
                    Some(event) => self.handle(event),
                    None => break,
                },
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if self.engine.is_online() && self.engine.pending_count() > 0 {
                        self.spawn_drain("timer");
                    }
                }
            }
        }
    }

    fn handle(&mut self, event: EnvironmentEvent) {
        tracing::trace!(?event, "environment event");
        match event {
            EnvironmentEvent::Connectivity(online) => {
                if self.engine.set_online(online) {
                    self.spawn_drain("connectivity restored");
                }
            }
            EnvironmentEvent::Visibility(visible) => {
                let was_visible = std::mem::replace(&mut self.visible, visible);
                if visible && !was_visible && self.engine.is_online() {
                    self.spawn_drain("visibility restored");
                }
            }
            EnvironmentEvent::Unload => {
                self.engine.flush_on_unload(self.beacon.as_ref());
            }
        }
    }

    fn spawn_drain(&self, trigger: &'static str) {
        tracing::debug!(trigger, "drain requested");
        let engine = self.engine.clone();
        self.drains.spawn(async move {
            engine.drain().await;
        });
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
