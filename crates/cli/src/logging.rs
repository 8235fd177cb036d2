// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tracing subscriber setup.
//!
//! Logs go to stderr so command output on stdout stays scriptable.
//! `RUST_LOG` takes precedence over `-v`.

use tracing_subscriber::EnvFilter;

use crate::env;

/// Filter used when `RUST_LOG` is unset.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "safewatch=debug,swrs=debug,sw_core=debug"
    } else {
        "warn"
    }
}

/// Builds the filter for this process.
pub fn filter(verbose: bool) -> EnvFilter {
    if env::rust_log_set() {
        if let Ok(filter) = EnvFilter::try_from_default_env() {
            return filter;
        }
    }
    EnvFilter::new(default_directive(verbose))
}

/// Installs the global subscriber. Safe to call more than once.
pub fn init(verbose: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_ansi(crate::colors::should_colorize())
        .with_target(verbose)
        .try_init();
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
