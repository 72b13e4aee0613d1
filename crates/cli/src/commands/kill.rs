// SPDX-License-Identifier: MIT

//! Tear down a session: the remote tmux session and its sync session.

use serde::Serialize;

use sinc_core::config::Config;
use sinc_core::error::{Error, Result, EXIT_SUCCESS};
use sinc_core::output::OutputCtx;
use sinc_core::session::kill_session;
use sinc_core::sync::SyncCoordinator;

#[derive(Serialize)]
struct KillEvent<'a> {
    event: &'static str,
    session: &'a str,
    terminated: bool,
    tmux: bool,
    sync: bool,
}

/// Kill both halves of a session. Killing either half counts as
/// success; the two can legitimately exist without each other (a crashed
/// agent leaves sync behind, a sync-disabled config leaves only tmux).
pub fn run(config: &Config, ctx: OutputCtx, session: &str) -> Result<i32> {
    let tmux_killed = kill_session(config, session)?;

    let sync = SyncCoordinator::new();
    let sync_terminated = if sync.is_engine_installed() {
        sync.terminate(session).unwrap_or(false)
    } else {
        false
    };

    let terminated = tmux_killed || sync_terminated;
    ctx.emit_json(&KillEvent {
        event: "session-kill",
        session,
        terminated,
        tmux: tmux_killed,
        sync: sync_terminated,
    });

    if terminated {
        ctx.log(&format!("Session {} terminated", session));
        Ok(EXIT_SUCCESS)
    } else {
        Err(Error::General(format!("session {} not found", session)))
    }
}
