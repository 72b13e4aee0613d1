// SPDX-License-Identifier: MIT

//! sincrs - the `sinc` CLI over [`sinc_core`].
//!
//! This crate owns flag parsing, output-mode wiring, and the mapping
//! from command outcomes to process exit codes. All orchestration logic
//! lives in `sinc_core`; the command modules here are thin adapters from
//! parsed arguments to core calls.

mod cli;
mod commands;

pub use cli::{Cli, Command};
pub use sinc_core::error::{Error, Result};

use sinc_core::config::Config;
use sinc_core::output::OutputCtx;
use sinc_core::sync::SyncDirection;

/// Run one parsed invocation to completion and return the process exit
/// code. Never panics and never calls `exit` itself, so it stays
/// testable.
pub fn run(cli: Cli) -> i32 {
    let ctx = OutputCtx::new(cli.quiet, cli.verbose, cli.json);
    if cli.verbose {
        init_tracing();
    }

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {}", e);
            return e.exit_code();
        }
    };

    let result = match cli.command {
        None => commands::connect::run(&config, ctx, cli.resume),
        Some(Command::List) => commands::list::run(&config, ctx),
        Some(Command::Kill { ref session }) => commands::kill::run(&config, ctx, session),
        Some(Command::Push) => {
            commands::force::run(&config, ctx, cli.yes, SyncDirection::LocalToRemote)
        }
        Some(Command::Pull) => {
            commands::force::run(&config, ctx, cli.yes, SyncDirection::RemoteToLocal)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("error: {}", e);
            e.exit_code()
        }
    }
}

/// Diagnostics go to stderr so stdout stays reserved for JSON events.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sinc=debug,sinc_core=debug"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
