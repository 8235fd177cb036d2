// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod enqueue;
pub mod init;
pub mod queue;
pub mod run;
#[cfg(test)]
#[path = "mod_tests.rs"]
pub mod testing;

use std::path::PathBuf;
use std::sync::Arc;

use crate::colors;
use crate::config::{find_work_dir, resolve_state_dir, Config};
use crate::env;
use crate::error::Result;
use crate::storage::FileStore;
use crate::sync::{
    HttpExecutor, Notification, NotificationLevel, Notifier, QueueStore, RemoteExecutor,
    SyncEngine,
};

/// Everything a command needs to reach the queue and the API.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub work_dir: PathBuf,
    pub state_dir: PathBuf,
}

impl Context {
    /// Locates `.safewatch/`, loads its config and applies environment
    /// overrides.
    pub fn open() -> Result<Self> {
        let work_dir = find_work_dir()?;
        let config = Config::load(&work_dir)?.with_overrides(env::api_url(), env::api_token());
        config.validate()?;
        let state_dir =
            resolve_state_dir(&work_dir, &config, env::state_dir(), env::xdg_state_home());
        tracing::debug!(state_dir = %state_dir.display(), api = %config.api.base_url, "context");
        Ok(Context {
            config,
            work_dir,
            state_dir,
        })
    }

    pub fn queue_store(&self) -> Result<QueueStore> {
        let kv = FileStore::open(&self.state_dir)?;
        Ok(QueueStore::new(Arc::new(kv)))
    }

    pub fn http(&self) -> Result<Arc<HttpExecutor>> {
        Ok(Arc::new(HttpExecutor::from_config(&self.config.api)?))
    }

    /// Builds an engine over the on-disk queue.
    pub fn engine(
        &self,
        executor: Arc<dyn RemoteExecutor>,
        notifier: Arc<dyn Notifier>,
        start_online: bool,
    ) -> Result<SyncEngine> {
        Ok(SyncEngine::builder(self.queue_store()?, executor)
            .notifier(notifier)
            .config(self.config.engine_config(start_online))
            .build())
    }
}

/// Prints notifications for the operator.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutNotifier;

impl StdoutNotifier {
    pub fn format(n: &Notification) -> String {
        match n.level {
            NotificationLevel::Success => colors::success(&n.message),
            NotificationLevel::Error => colors::error(&n.message),
        }
    }
}

impl Notifier for StdoutNotifier {
    fn notify(&self, n: Notification) {
        tracing::debug!(entity_type = %n.entity_type, action = %n.action, "notification");
        println!("{}", Self::format(&n));
    }
}
