// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use crate::colors;
use crate::help;
use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "safewatch")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(disable_version_flag = true)]
#[command(about = "Offline mutation queue for the SafeWatch dashboard")]
#[command(
    long_about = "Offline mutation queue for the SafeWatch dashboard.\n\n\
    Mutations are persisted locally and delivered to the API in order when it is reachable, \
    with bounded retries and a notification for anything that cannot be delivered."
)]
#[command(help_template = help::template())]
#[command(before_help = help::commands())]
#[command(after_help = help::quickstart())]
#[command(styles = help::styles())]
#[allow(clippy::manual_non_exhaustive)]
pub struct Cli {
    /// Run as if safewatch was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    /// Log sync activity to stderr
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Print version
    #[arg(short = 'V', long = "version", action = clap::ArgAction::Version)]
    version: (),

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    // ─────────────────────────────────────────────────────────────────────────
    // Sync queue
    // ─────────────────────────────────────────────────────────────────────────
    /// Queue a mutation for delivery
    #[command(after_help = colors::examples("\
Examples:
  safewatch enqueue users update_status -p '{\"userId\":\"42\",\"action\":\"Block\"}'    Block a user
  safewatch enqueue cameras delete -p '{\"cameraId\":\"c1\"}'                           Delete a camera
  safewatch enqueue alerts update -p '{\"alertId\":\"a9\",\"changes\":{\"status\":\"resolved\"}}'"))]
    Enqueue {
        /// Entity type (users, cameras, alerts)
        entity: String,

        /// Action (create, update, update_status, delete)
        action: String,

        /// JSON payload for the mutation
        #[arg(long, short = 'p', value_name = "JSON")]
        payload: String,

        /// Deliver immediately if the API is reachable
        #[arg(long)]
        now: bool,
    },

    /// Show queue status
    Status {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// List pending operations in delivery order
    List {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Deliver pending operations now
    Sync {
        /// Output format (text, json)
        #[arg(long = "output", short = 'o', value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Drop all pending operations without delivering them
    Clear,

    // ─────────────────────────────────────────────────────────────────────────
    // Setup & service
    // ─────────────────────────────────────────────────────────────────────────
    /// Initialize safewatch in the current directory
    Init {
        /// API base URL (default: http://localhost:8000/api)
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,

        /// Directory to initialize (default: current directory)
        #[arg(long)]
        path: Option<String>,
    },

    /// Run the sync service in the foreground until interrupted
    Run,

    /// Generate shell completions
    #[command(arg_required_else_help = true)]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
