// SPDX-License-Identifier: MIT

//! Persistent remote session management.
//!
//! The remote tmux server is the source of truth for session state;
//! nothing is cached client-side, every query is a fresh round trip.
//! Attach commands are built as explicit argument vectors with the inner
//! tmux command as one opaque token, so the only shell tokenization that
//! happens is the remote shell splitting that single command.

use std::path::Path;
use std::process::Command;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::exec::ssh_exec;
use crate::protocol::{build_remote_command, Protocol};
use crate::session_id::SESSION_PREFIX;

/// True if a session with this exact name exists on the remote host.
pub fn has_session(config: &Config, name: &str) -> Result<bool> {
    let result = ssh_exec(
        config,
        &format!("tmux has-session -t {} 2>/dev/null", name),
    )?;
    Ok(result.success)
}

/// List remote sessions created by this tool, in tmux's own order.
pub fn list_sessions(config: &Config) -> Result<Vec<String>> {
    let result = ssh_exec(
        config,
        "tmux list-sessions -F '#{session_name}' 2>/dev/null || true",
    )?;
    if !result.success {
        // No tmux server running is a normal empty state.
        return Ok(Vec::new());
    }
    Ok(parse_session_list(&result.stdout))
}

/// Filter raw `list-sessions` output down to our own session names.
pub fn parse_session_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .map(str::trim)
        .filter(|line| line.starts_with(SESSION_PREFIX))
        .map(str::to_string)
        .collect()
}

/// Kill a named remote session. False when it did not exist.
pub fn kill_session(config: &Config, name: &str) -> Result<bool> {
    let result = ssh_exec(config, &format!("tmux kill-session -t {}", name))?;
    Ok(result.success)
}

/// Ensure the remote working directory exists. tmux refuses to root a
/// new session at a nonexistent directory, so this runs before any
/// attach. Idempotent.
pub fn ensure_remote_dir(config: &Config, dir: &str) -> Result<()> {
    let result = ssh_exec(config, &format!("mkdir -p {}", dir))?;
    if result.success {
        Ok(())
    } else {
        Err(Error::General(format!(
            "failed to create remote directory {}: {}",
            dir,
            result.stderr.trim()
        )))
    }
}

/// Build the full argv that creates-or-attaches the named session rooted
/// at `work_dir`, running `initial_command` as its first program.
///
/// The SSH variant gets `-t` for TTY allocation; et and mosh allocate
/// one themselves.
pub fn build_attach_command(
    config: &Config,
    protocol: Protocol,
    name: &str,
    work_dir: &str,
    initial_command: &str,
) -> Vec<String> {
    let tmux_cmd = format!(
        "tmux new-session -A -s {} -c {} '{}'",
        name, work_dir, initial_command
    );
    let mut args = build_remote_command(config, protocol, &tmux_cmd);
    if protocol == Protocol::Ssh && !args.iter().any(|a| a == "-t") {
        args.insert(1, "-t".to_string());
    }
    args
}

/// Attach interactively: spawn the transport with the local process's
/// standard streams connected directly and block until it exits.
///
/// Returns the subprocess exit code. Non-zero does not distinguish a
/// deliberate detach from a dropped transport; the reconnect loop treats
/// any non-zero code as retryable.
pub fn attach_session(
    config: &Config,
    protocol: Protocol,
    name: &str,
    work_dir: &str,
    initial_command: &str,
) -> Result<i32> {
    let argv = build_attach_command(config, protocol, name, work_dir, initial_command);
    let (program, args) = argv.split_first().ok_or_else(|| {
        Error::General("empty attach command".to_string())
    })?;

    tracing::debug!(program, session = name, "attaching");
    let status = Command::new(program).args(args).status().map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::Unavailable {
                tool: program.to_string(),
                suggestion: format!("install {} or adjust connection.protocols", program),
            }
        } else {
            Error::Io(e)
        }
    })?;

    Ok(status.code().unwrap_or(-1))
}

/// The remote workspace directory for a project: `<remoteBase>/<name>`.
pub fn remote_project_path(config: &Config, project_path: &Path) -> String {
    format!(
        "{}/{}",
        config.sync.remote_base.trim_end_matches('/'),
        crate::session_id::project_name(project_path)
    )
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
