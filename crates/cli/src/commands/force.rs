// SPDX-License-Identifier: MIT

//! Forced one-way sync: `push` (local wins) and `pull` (remote wins).
//!
//! Both run through a temporary one-way-replica session while the
//! project's persistent session is paused, so the two never reconcile
//! against each other mid-force.

use serde::Serialize;

use sinc_core::config::Config;
use sinc_core::error::{Error, Result, EXIT_SUCCESS};
use sinc_core::ignore::{load_sync_ignore, merge_ignore_patterns};
use sinc_core::output::OutputCtx;
use sinc_core::session::remote_project_path;
use sinc_core::session_id::session_identity;
use sinc_core::sync::{SyncCoordinator, SyncDirection};

#[derive(Serialize)]
struct ForceEvent<'a> {
    event: &'static str,
    session: &'a str,
    direction: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(
    config: &Config,
    ctx: OutputCtx,
    yes: bool,
    direction: SyncDirection,
) -> Result<i32> {
    let sync = SyncCoordinator::new();
    if !sync.is_engine_installed() {
        return Err(Error::Unavailable {
            tool: "mutagen".to_string(),
            suggestion: "install it from https://mutagen.io/".to_string(),
        });
    }

    let project_path = super::project_root()?;
    let session_name = session_identity(&project_path);
    let remote_path = remote_project_path(config, &project_path);

    let status = sync.status(&session_name)?;
    if !status.exists {
        return Err(Error::Misuse {
            message: format!("no sync session for {}", project_path.display()),
            suggestion: "run `sinc` here first to create one".to_string(),
        });
    }

    match direction {
        SyncDirection::LocalToRemote => ctx.log(&format!(
            "This will overwrite remote files in {} with local state",
            remote_path
        )),
        SyncDirection::RemoteToLocal => ctx.log(&format!(
            "This will overwrite local files in {} with remote state",
            project_path.display()
        )),
    }
    if !yes {
        return Err(Error::Misuse {
            message: "confirmation required".to_string(),
            suggestion: "re-run with --yes to proceed".to_string(),
        });
    }

    ctx.emit_json(&ForceEvent {
        event: "sync-force",
        session: &session_name,
        direction: direction.as_str(),
        error: None,
    });

    let file_ignore = load_sync_ignore(&project_path)?;
    let patterns = merge_ignore_patterns(&config.sync.ignore, &file_ignore);
    let local = project_path.to_string_lossy();

    let paused = sync.pause(&session_name)?;
    let outcome = sync.force_direction(
        config,
        &session_name,
        &local,
        &remote_path,
        &patterns,
        direction,
    );
    if paused {
        match sync.resume(&session_name) {
            Ok(true) => {}
            Ok(false) => ctx.log("warning: could not resume the persistent sync session"),
            Err(e) => ctx.log(&format!(
                "warning: could not resume the persistent sync session: {}",
                e
            )),
        }
    }

    match outcome {
        Ok(()) => {
            ctx.emit_json(&ForceEvent {
                event: "sync-force-complete",
                session: &session_name,
                direction: direction.as_str(),
                error: None,
            });
            match direction {
                SyncDirection::LocalToRemote => ctx.log("Push complete"),
                SyncDirection::RemoteToLocal => ctx.log("Pull complete"),
            }
            Ok(EXIT_SUCCESS)
        }
        Err(e) => {
            ctx.emit_json(&ForceEvent {
                event: "sync-force-error",
                session: &session_name,
                direction: direction.as_str(),
                error: Some(e.to_string()),
            });
            Err(e)
        }
    }
}
