// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `safewatch run`: the sync service in the foreground.
//!
//! The connectivity probe stands in for browser online/offline events.
//! Ctrl-C is treated like a page unload: pending records go out through the
//! beacon (they stay queued), then every trigger is torn down.

use std::future::Future;
use std::sync::Arc;

use super::{Context, StdoutNotifier};
use crate::error::{Error, Result};
use crate::sync::{ConnectivityProbe, SyncService};

pub async fn run() -> Result<()> {
    let ctx = Context::open()?;
    let http = ctx.http()?;
    let engine = ctx.engine(http.clone(), Arc::new(StdoutNotifier), false)?;
    let pending = engine.pending_count();

    let mut service = SyncService::new(engine, http.clone(), ctx.config.sync_interval());
    let mut probe = ConnectivityProbe::new(http.clone(), ctx.config.probe_interval());

    println!(
        "Syncing {} pending operation{} to {} (Ctrl-C to stop)",
        pending,
        if pending == 1 { "" } else { "s" },
        http.base_url()
    );

    run_impl(&mut service, &mut probe, shutdown_signal()).await?;
    println!("Stopped with {} pending", service.engine().pending_count());
    Ok(())
}

/// Starts `service` and `probe`, waits for `shutdown`, then flushes and
/// stops both.
pub(crate) async fn run_impl(
    service: &mut SyncService,
    probe: &mut ConnectivityProbe,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    if !service.start() {
        return Err(Error::Runtime("sync service was already started".to_string()));
    }
    let env = service.environment();
    probe.start(env.clone());

    shutdown.await;
    tracing::info!("shutting down");

    env.unload();
    probe.stop().await;
    service.stop().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
