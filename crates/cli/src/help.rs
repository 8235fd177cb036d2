// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Help text generation with colorization support.

use crate::colors;
use clap::builder::styling::Styles;

/// Generate clap Styles for help output.
pub fn styles() -> Styles {
    if !colors::should_colorize() {
        return Styles::plain();
    }

    use anstyle::{Ansi256Color, Color, Style};

    let fg = |code: u8| Style::new().fg_color(Some(Color::Ansi256(Ansi256Color(code))));
    let header = fg(colors::codes::HEADER);

    Styles::styled()
        .header(header)
        .usage(header)
        .literal(fg(colors::codes::LITERAL))
        .placeholder(fg(colors::codes::CONTEXT))
        .valid(fg(colors::codes::CONTEXT))
        .error(fg(colors::codes::ERROR))
}

/// Main help template with colorized Options header.
pub fn template() -> String {
    format!(
        "{{about-with-newline}}
{{usage-heading}} {{usage}}

{{before-help}}{}
{{options}}{{after-help}}",
        colors::header("Options:")
    )
}

/// Commands list shown before options in main help.
pub fn commands() -> String {
    format!(
        "\
{header_queue}
  {enqueue}     Queue a mutation for delivery
  {status}      Show queue status
  {list}        List pending operations
  {sync}        Deliver pending operations now
  {clear}       Drop all pending operations

{header_setup}
  {init}        Initialize safewatch in this directory
  {run}         Run the background sync service
  {completion}  Generate shell completions
",
        header_queue = colors::header("Sync Queue:"),
        header_setup = colors::header("Setup & Service:"),
        enqueue = colors::literal("enqueue"),
        status = colors::literal("status "),
        list = colors::literal("list   "),
        sync = colors::literal("sync   "),
        clear = colors::literal("clear  "),
        init = colors::literal("init      "),
        run = colors::literal("run       "),
        completion = colors::literal("completion"),
    )
}

/// Quickstart help shown after options in main help.
pub fn quickstart() -> String {
    colors::examples(
        "\
Get started:
  safewatch init                                  Create .safewatch/config.toml
  safewatch enqueue cameras delete -p '{\"cameraId\":\"c1\"}'   Queue a mutation
  safewatch status                                Show pending count
  safewatch sync                                  Deliver now",
    )
}

#[cfg(test)]
#[path = "help_tests.rs"]
mod tests;
