// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `safewatch enqueue`: persist one mutation, optionally deliver it.

use std::sync::Arc;

use serde_json::Value;
use sw_core::{Action, EntityType, Mutation};

use super::{Context, StdoutNotifier};
use crate::error::{Error, Result};
use crate::sync::{HttpExecutor, Notification, SyncEngine};

pub async fn run(entity: String, action: String, payload: String, now: bool) -> Result<()> {
    let ctx = Context::open()?;
    let mutation = parse_mutation(&entity, &action, &payload)?;

    let http = ctx.http()?;
    // Queue while offline so nothing is sent until we decide to deliver.
    let engine = ctx.engine(http.clone(), Arc::new(StdoutNotifier), false)?;
    let id = run_impl(&engine, mutation)?;
    println!("{}", id);

    if now {
        deliver_now(&engine, &http).await;
    }
    Ok(())
}

/// Decodes the command line triple into a typed mutation.
pub(crate) fn parse_mutation(entity: &str, action: &str, payload: &str) -> Result<Mutation> {
    let entity_type: EntityType = entity.parse()?;
    let action: Action = action.parse()?;
    let payload: Value =
        serde_json::from_str(payload).map_err(|e| Error::InvalidPayloadJson(e.to_string()))?;
    if !payload.is_object() {
        return Err(Error::InvalidPayloadJson("expected a JSON object".to_string()));
    }
    Ok(Mutation::from_parts(entity_type, action, payload)?)
}

/// Enqueues `mutation` and reports acceptance through the engine's notifier.
pub(crate) fn run_impl(engine: &SyncEngine, mutation: Mutation) -> Result<String> {
    let entity_type = mutation.entity_type();
    let action = mutation.action();
    match engine.enqueue(mutation) {
        Ok(id) => Ok(id),
        Err(e) => {
            let message = e.to_string();
            let reason = message.lines().next().unwrap_or_default();
            engine
                .notifier()
                .notify(Notification::rejected(entity_type, action, reason));
            Err(e.into())
        }
    }
}

async fn deliver_now(engine: &SyncEngine, http: &HttpExecutor) {
    if !http.ping().await {
        println!("API unreachable, kept in queue");
        return;
    }
    engine.set_online(true);
    if let Some(report) = engine.force_sync().await {
        tracing::debug!(?report, "delivered on enqueue");
    }
}

#[cfg(test)]
#[path = "enqueue_tests.rs"]
mod tests;
