// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connectivity probe.
//!
//! A headless process has no browser telling it when the network comes and
//! goes, so the probe polls a health check and reports transitions to the
//! sync service as [`EnvironmentEvent::Connectivity`] events.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::service::EnvironmentHandle;

/// Answers whether the remote side is reachable.
pub trait HealthCheck: Send + Sync {
    fn check(&self) -> Pin<Box<dyn Future<Output = bool> + Send + '_>>;
}

/// Periodic reachability poller.
pub struct ConnectivityProbe {
    check: Arc<dyn HealthCheck>,
    interval: Duration,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ConnectivityProbe {
    pub fn new(check: Arc<dyn HealthCheck>, interval: Duration) -> Self {
        ConnectivityProbe {
            check,
            interval,
            cancel: CancellationToken::new(),
            task: None,
        }
    }

    /// Starts polling. The first check runs immediately and is always
    /// reported; later checks are reported only when the answer changes.
    pub fn start(&mut self, env: EnvironmentHandle) {
        if self.task.is_some() {
            return;
        }
        let check = Arc::clone(&self.check);
        let interval = self.interval;
        let cancel = self.cancel.clone();

        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            let mut last: Option<bool> = None;

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        let reachable = tokio::select! {
                            _ = cancel.cancelled() => break,
                            reachable = check.check() => reachable,
                        };
                        if last != Some(reachable) {
                            tracing::info!(online = reachable, "connectivity changed");
                            last = Some(reachable);
                            if !env.set_online(reachable) {
                                break;
                            }
                        }
                    }
                }
            }
            tracing::debug!("connectivity probe stopped");
        }));
    }

    /// Stops polling and waits for the task to exit.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "connectivity probe task failed");
            }
        }
    }
}

#[cfg(test)]
#[path = "probe_tests.rs"]
mod tests;
