// SPDX-License-Identifier: MIT

use clap::{Parser, Subcommand};

const HELP_TEMPLATE: &str = "{about-with-newline}
{usage-heading} {usage}

{before-help}Options:
{options}{after-help}";

const COMMANDS_HELP: &str = "\
Sessions:
  (default)   Connect to this project's remote session
  list        List active remote sessions
  kill        Kill a session and its sync session

Forced sync:
  push        One-way sync local state to the remote
  pull        One-way sync remote state to local";

const QUICKSTART_HELP: &str = "\
Get started:
  sinc                    Connect (creates session and sync)
  sinc -r                 Resume an existing session
  sinc list               Show active sessions
  sinc kill <id>          Tear a session down";

#[derive(Parser)]
#[command(name = "sinc")]
#[command(version)]
#[command(about = "Work locally, run remotely: persistent remote agent sessions with live file sync")]
#[command(help_template = HELP_TEMPLATE)]
#[command(before_help = COMMANDS_HELP)]
#[command(after_help = QUICKSTART_HELP)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Resume an existing session instead of creating one
    #[arg(short = 'r', long, global = true)]
    pub resume: bool,

    /// Suppress non-essential output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Emit extra diagnostics
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Emit machine-readable events on stdout (one JSON object per line)
    #[arg(long, global = true)]
    pub json: bool,

    /// Skip confirmation for destructive operations
    #[arg(short = 'y', long, global = true)]
    pub yes: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// List active remote sessions and their sync state
    List,

    /// Kill a remote session and terminate its sync session
    Kill {
        /// Session name, e.g. sinc-myapp-a1b2c3
        session: String,
    },

    /// Force a one-way sync: overwrite remote files with local state
    Push,

    /// Force a one-way sync: overwrite local files with remote state
    Pull,
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
