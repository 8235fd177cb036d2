// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline mutation queue and sync engine.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐  enqueue  ┌─────────────┐  execute  ┌─────────────┐
//! │  Optimistic │──────────►│ SyncEngine  │──────────►│  Executor   │
//! │   Bridge    │◄──────────│  (drain)    │           │ (HttpExec.) │
//! └─────────────┘  events   └─────────────┘           └─────────────┘
//!                             ▲        │
//!          drain requests     │        ▼
//! ┌─────────────┐             │  ┌─────────────┐
//! │ SyncService │─────────────┘  │ QueueStore  │  (persisted JSON)
//! │ (triggers)  │                └─────────────┘
//! └─────────────┘
//! ```
//!
//! - Persisted FIFO that survives restarts
//! - Bounded retries with eviction and one failure notification
//! - Timer, connectivity, visibility and unload triggers
//! - Injectable executor, notifier, beacon and clock for testing

mod engine;
mod executor;
mod http;
mod notify;
mod probe;
mod service;
mod store;

pub use engine::{
    DrainReport, EngineConfig, SyncEngine, SyncEngineBuilder, SyncError, SyncEvent,
    DEFAULT_MAX_RETRIES,
};
pub use executor::{Beacon, CollectionSource, ExecResult, ExecutorError, RemoteExecutor};
pub use http::{route, HttpExecutor, Route, IDEMPOTENCY_HEADER};
pub use notify::{Notification, NotificationLevel, Notifier, TracingNotifier};
pub use probe::{ConnectivityProbe, HealthCheck};
pub use service::{EnvironmentEvent, EnvironmentHandle, SyncService, DEFAULT_SYNC_INTERVAL};
pub use store::{QueueStore, QUEUE_STORAGE_KEY};

#[cfg(test)]
pub(crate) mod test_helpers;
