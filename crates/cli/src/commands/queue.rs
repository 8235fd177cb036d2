// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Queue inspection and maintenance: `status`, `list`, `sync`, `clear`.

use std::io::Write;
use std::sync::Arc;

use sw_core::clock::to_datetime;
use sw_core::{OperationRecord, QueueStatus};

use super::{Context, StdoutNotifier};
use crate::cli::OutputFormat;
use crate::colors;
use crate::error::Result;
use crate::sync::{DrainReport, SyncEngine};

pub async fn status(output: OutputFormat) -> Result<()> {
    let ctx = Context::open()?;
    let http = ctx.http()?;
    let online = http.ping().await;
    let engine = ctx.engine(http, Arc::new(StdoutNotifier), online)?;
    write_status(&mut std::io::stdout(), &engine.queue_status(), output)
}

pub fn list(output: OutputFormat) -> Result<()> {
    let ctx = Context::open()?;
    let engine = ctx.engine(ctx.http()?, Arc::new(StdoutNotifier), false)?;
    write_records(&mut std::io::stdout(), &engine.records(), output)
}

pub async fn sync(output: OutputFormat) -> Result<()> {
    let ctx = Context::open()?;
    let engine = ctx.engine(ctx.http()?, Arc::new(StdoutNotifier), true)?;
    let report = sync_impl(&engine).await;
    write_report(&mut std::io::stdout(), report.as_ref(), engine.pending_count(), output)
}

pub fn clear() -> Result<()> {
    let ctx = Context::open()?;
    let engine = ctx.engine(ctx.http()?, Arc::new(StdoutNotifier), false)?;
    let count = engine.clear_queue()?;
    println!("Cleared {} pending operation{}", count, plural(count));
    Ok(())
}

/// One delivery pass over everything queued, whatever the probe says.
pub(crate) async fn sync_impl(engine: &SyncEngine) -> Option<DrainReport> {
    engine.set_online(true);
    engine.force_sync().await
}

pub(crate) fn write_status(
    out: &mut impl Write,
    status: &QueueStatus,
    output: OutputFormat,
) -> Result<()> {
    match output {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string(status)?)?,
        OutputFormat::Text => {
            writeln!(out, "Pending:    {}", status.pending_operations)?;
            writeln!(out, "Processing: {}", yes_no(status.is_processing))?;
            let online = if status.is_online {
                colors::success("yes")
            } else {
                colors::error("no")
            };
            writeln!(out, "Online:     {}", online)?;
        }
    }
    Ok(())
}

pub(crate) fn write_records(
    out: &mut impl Write,
    records: &[OperationRecord],
    output: OutputFormat,
) -> Result<()> {
    match output {
        OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(records)?)?,
        OutputFormat::Text => {
            if records.is_empty() {
                writeln!(out, "No pending operations")?;
                return Ok(());
            }
            for record in records {
                let enqueued = to_datetime(record.enqueued_at).format("%Y-%m-%d %H:%M:%S");
                let retries = if record.retry_count > 0 {
                    colors::context(&format!(" (retries: {})", record.retry_count))
                } else {
                    String::new()
                };
                writeln!(
                    out,
                    "{}  {}  {}{}",
                    colors::literal(&record.id),
                    record.label(),
                    enqueued,
                    retries
                )?;
            }
        }
    }
    Ok(())
}

pub(crate) fn write_report(
    out: &mut impl Write,
    report: Option<&DrainReport>,
    remaining: usize,
    output: OutputFormat,
) -> Result<()> {
    match (output, report) {
        (OutputFormat::Json, _) => {
            let value = serde_json::json!({ "report": report, "remaining": remaining });
            writeln!(out, "{}", value)?;
        }
        (OutputFormat::Text, None) => writeln!(out, "Nothing to sync")?,
        (OutputFormat::Text, Some(r)) => {
            writeln!(
                out,
                "Delivered {} of {}, {} will retry, {} dropped",
                r.delivered, r.attempted, r.retried, r.evicted
            )?;
            if remaining > 0 {
                writeln!(out, "{} operation{} still pending", remaining, plural(remaining))?;
            }
        }
    }
    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
