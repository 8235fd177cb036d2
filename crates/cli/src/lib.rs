// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! swrs - offline mutation queue and sync engine for the SafeWatch dashboard.
//!
//! This crate provides everything behind the `safewatch` CLI: a persistent
//! FIFO of pending mutations, the engine that delivers them with bounded
//! retries, the triggers that decide when to deliver, and a bridge that
//! applies changes optimistically to cached collections.
//!
//! # Main Components
//!
//! - [`SyncEngine`] - queue ownership, drain, force sync, clear, status
//! - [`SyncService`] - timer, connectivity, visibility and unload triggers
//! - [`HttpExecutor`] - delivers mutations to the REST API
//! - [`OptimisticBridge`] - optimistic cache updates with rollback
//! - [`Config`] - project configuration in `.safewatch/config.toml`
//!
//! # Embedding
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use swrs::{HttpExecutor, QueueStore, SyncEngine, SyncService};
//! use swrs::storage::FileStore;
//!
//! let http = Arc::new(HttpExecutor::new("https://dash.example.com/api", None, timeout)?);
//! let store = QueueStore::new(Arc::new(FileStore::open(state_dir)?));
//! let engine = SyncEngine::builder(store, http.clone()).build();
//! let mut service = SyncService::new(engine.clone(), http, DEFAULT_SYNC_INTERVAL);
//! service.start();
//! engine.enqueue(mutation)?;
//! ```

mod cli;
pub mod colors;
mod commands;
pub mod help;
pub mod logging;

pub mod config;
pub mod env;
pub mod error;
pub mod optimistic;
pub mod storage;
pub mod sync;

pub use cli::{Cli, Command, OutputFormat};
pub use config::{find_work_dir, init_work_dir, Config};
pub use error::{Error, Result};
pub use optimistic::{EntityCache, OptimisticBridge, PendingUpdate, UpdateState};
pub use sync::{
    HttpExecutor, QueueStore, SyncEngine, SyncError, SyncEvent, SyncService,
    DEFAULT_SYNC_INTERVAL,
};

use std::future::Future;

use clap::CommandFactory;
use clap_complete::generate;

/// Runs `fut` on a fresh multi-threaded runtime.
fn block_on<F: Future<Output = Result<()>>>(fut: F) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| Error::Runtime(e.to_string()))?;
    runtime.block_on(fut)
}

/// Execute a CLI command. This is the main entry point for library users
/// and provides a testable way to run commands without process execution.
pub fn run(command: Command) -> Result<()> {
    match command {
        Command::Init { api_url, path } => commands::init::run(api_url, path),
        Command::Enqueue {
            entity,
            action,
            payload,
            now,
        } => block_on(commands::enqueue::run(entity, action, payload, now)),
        Command::Status { output } => block_on(commands::queue::status(output)),
        Command::List { output } => commands::queue::list(output),
        Command::Sync { output } => block_on(commands::queue::sync(output)),
        Command::Clear => commands::queue::clear(),
        Command::Run => block_on(commands::run::run()),
        Command::Completion { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "safewatch", &mut std::io::stdout());
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
