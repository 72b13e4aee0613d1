// SPDX-License-Identifier: MIT

//! List active remote sessions and their sync state.

use serde::Serialize;

use sinc_core::config::Config;
use sinc_core::error::{Result, EXIT_SUCCESS};
use sinc_core::output::OutputCtx;
use sinc_core::session::list_sessions;
use sinc_core::sync::{SyncCoordinator, SyncStatus};

#[derive(Serialize)]
struct SessionEntry {
    session: String,
    sync: &'static str,
}

#[derive(Serialize)]
struct ListEvent<'a> {
    event: &'static str,
    sessions: &'a [SessionEntry],
}

pub fn run(config: &Config, ctx: OutputCtx) -> Result<i32> {
    let sessions = list_sessions(config)?;
    let sync = SyncCoordinator::new();
    let engine_available = sync.is_engine_installed();

    let mut entries = Vec::with_capacity(sessions.len());
    for name in sessions {
        let state = if engine_available {
            describe_sync(&sync.status(&name)?)
        } else {
            "no sync"
        };
        entries.push(SessionEntry {
            session: name,
            sync: state,
        });
    }

    ctx.emit_json(&ListEvent {
        event: "session-list",
        sessions: &entries,
    });

    if entries.is_empty() {
        ctx.log("No active sessions");
    } else {
        ctx.log("Active sessions:");
        for entry in &entries {
            ctx.log(&format!("  {} ({})", entry.session, entry.sync));
        }
    }
    Ok(EXIT_SUCCESS)
}

/// One-word sync indicator for the listing.
fn describe_sync(status: &SyncStatus) -> &'static str {
    if !status.exists {
        "no sync"
    } else if status.status.to_lowercase().contains("paused") {
        "paused"
    } else {
        "syncing"
    }
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
