// SPDX-License-Identifier: MIT

//! The top-level connect/resume flow.
//!
//! One invocation walks `preflight → existence check → workspace prep →
//! sync bring-up → attach(+reconnect) → drain`. The orchestrator owns
//! the configuration and session identity for the whole run and lends
//! them to the other components; the only concurrent piece is the
//! conflict monitor, which is stopped unconditionally when the attach
//! phase returns.

use serde::Serialize;
use std::path::Path;
use std::time::Duration;

use crate::config::{Config, SyncMode};
use crate::error::{Error, Result};
use crate::exec::test_connection;
use crate::ignore::{load_sync_ignore, merge_ignore_patterns};
use crate::monitor::{ConflictMonitor, MONITOR_INTERVAL};
use crate::output::OutputCtx;
use crate::reconnect::attach_with_reconnect;
use crate::session::{ensure_remote_dir, has_session, remote_project_path};
use crate::session_id::session_identity;
use crate::sync::{Mutagen, SyncCoordinator, SyncEngine};

const READY_POLL_ATTEMPTS: u32 = 30;
const READY_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Serialize)]
struct SyncStatusEvent<'a> {
    event: &'static str,
    session: &'a str,
    exists: bool,
    status: &'a str,
    watching: bool,
}

/// Check the existence/resume contract before touching anything.
///
/// An existing session without `--resume` is a misuse (never silently
/// attach to a live session), as is `--resume` without a session
/// (resume must be honest about expectations).
pub fn validate_session_state(exists: bool, resume: bool, name: &str) -> Result<()> {
    if exists && !resume {
        return Err(Error::Misuse {
            message: format!("session {} already exists", name),
            suggestion: "use -r to resume it".to_string(),
        });
    }
    if !exists && resume {
        return Err(Error::Misuse {
            message: format!("session {} does not exist", name),
            suggestion: "run without -r to start a new session".to_string(),
        });
    }
    Ok(())
}

/// Connect (or resume) the remote session for a project. Returns the
/// interactive session's final exit code.
pub fn connect(
    config: &Config,
    ctx: OutputCtx,
    project_path: &Path,
    resume: bool,
) -> Result<i32> {
    connect_with(config, ctx, project_path, resume, SyncCoordinator::new())
}

/// The flow itself, generic over the sync engine.
pub fn connect_with<E>(
    config: &Config,
    ctx: OutputCtx,
    project_path: &Path,
    resume: bool,
    sync: SyncCoordinator<E>,
) -> Result<i32>
where
    E: SyncEngine + Clone + Send + 'static,
{
    let session_name = session_identity(project_path);
    let remote_path = remote_project_path(config, project_path);
    let sync_enabled = config.sync.mode != SyncMode::None;

    // Preflight: fail before any remote state is touched.
    if sync_enabled && !sync.is_engine_installed() {
        return Err(Error::Unavailable {
            tool: "mutagen".to_string(),
            suggestion: "install it from https://mutagen.io/ or set sync.mode to \"none\""
                .to_string(),
        });
    }
    ctx.log_verbose("Checking connection...");
    test_connection(config)?;
    ctx.log(&format!("Connected to {}", config.vps.hostname));

    let exists = has_session(config, &session_name)?;
    validate_session_state(exists, resume, &session_name)?;

    // tmux refuses to root a session at a missing directory.
    ensure_remote_dir(config, &remote_path)?;

    if sync_enabled {
        bring_up_sync(config, ctx, project_path, &session_name, &remote_path, &sync)?;
    }

    let monitor = if sync_enabled {
        let poll_sync = sync.clone();
        let poll_name = session_name.clone();
        Some(ConflictMonitor::spawn(MONITOR_INTERVAL, ctx, move || {
            poll_sync.conflicts(&poll_name).unwrap_or_default()
        }))
    } else {
        None
    };

    ctx.log_verbose(&format!("Attaching {} in {}", session_name, remote_path));
    let attach_result = attach_with_reconnect(
        config,
        ctx,
        &session_name,
        &remote_path,
        config.agent.command(),
    );

    // Single cancellation point: the monitor never outlives the attach
    // phase, whichever way it ended.
    if let Some(monitor) = monitor {
        monitor.stop();
    }
    let exit_code = attach_result?;

    drain(config, ctx, &session_name, sync_enabled, &sync)?;
    Ok(exit_code)
}

/// Create the sync session if absent, then wait (bounded) for the
/// engine to reach its watching state. Timing out is non-fatal: sync
/// catching up during interactive use is fine, a vanished session is
/// not.
fn bring_up_sync<E: SyncEngine>(
    config: &Config,
    ctx: OutputCtx,
    project_path: &Path,
    session_name: &str,
    remote_path: &str,
    sync: &SyncCoordinator<E>,
) -> Result<()> {
    let status = sync.status(session_name)?;
    ctx.emit_json(&SyncStatusEvent {
        event: "sync-status",
        session: session_name,
        exists: status.exists,
        status: &status.status,
        watching: status.watching,
    });
    if status.exists {
        ctx.log(&format!("Sync status: {}", status.status));
    } else {
        ctx.log("Sync status: not found");
    }

    if !status.exists {
        let file_ignore = load_sync_ignore(project_path)?;
        let patterns = merge_ignore_patterns(&config.sync.ignore, &file_ignore);
        let local = project_path.to_string_lossy();
        sync.create_session(config, session_name, &local, remote_path, &patterns)?;
    }

    for _ in 0..READY_POLL_ATTEMPTS {
        let status = sync.status(session_name)?;
        if status.watching {
            ctx.log("File sync active");
            return Ok(());
        }
        std::thread::sleep(READY_POLL_INTERVAL);
    }
    ctx.log("File sync still settling; continuing");
    Ok(())
}

/// Exit-time cleanup. A session that no longer exists on the remote is
/// a genuine end: flush and terminate sync. A session that still exists
/// means the user detached; flush but leave sync running so a future
/// resume finds it already synchronized.
fn drain<E: SyncEngine>(
    config: &Config,
    ctx: OutputCtx,
    session_name: &str,
    sync_enabled: bool,
    sync: &SyncCoordinator<E>,
) -> Result<()> {
    let still_exists = has_session(config, session_name)?;
    if !sync_enabled {
        return Ok(());
    }

    ctx.log("Syncing final changes...");
    sync.flush(session_name)?;
    if !still_exists {
        ctx.log_verbose("Session ended; terminating sync session");
        sync.terminate(session_name)?;
    }
    ctx.log("Sync complete");
    Ok(())
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
