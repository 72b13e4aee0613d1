// SPDX-License-Identifier: MIT

//! Sync-engine lifecycle coordination.
//!
//! The synchronization algorithm itself belongs to the engine (mutagen);
//! this module only drives session lifecycle and interprets status
//! output. The engine sits behind the [`SyncEngine`] trait so lifecycle
//! semantics can be tested against a recording fake.

use std::process::{Command, Stdio};
use std::time::Duration;

use crate::config::Config;
use crate::conflicts::{extract_conflicts_from_str, Conflict};
use crate::error::{Error, Result};
use crate::exec::ExecResult;

/// Engine status text meaning initial reconciliation is done and the
/// session is monitoring for changes. This is the readiness gate.
pub const WATCHING_STATUS: &str = "Watching for changes";

const DEFAULT_POLL_ATTEMPTS: u32 = 30;
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Which side is primary in a one-way force sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncDirection {
    LocalToRemote,
    RemoteToLocal,
}

impl SyncDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncDirection::LocalToRemote => "local-to-remote",
            SyncDirection::RemoteToLocal => "remote-to-local",
        }
    }
}

impl std::fmt::Display for SyncDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Observed state of a named sync session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncStatus {
    pub exists: bool,
    pub status: String,
    /// True only in the engine's steady "watching for changes" state.
    pub watching: bool,
}

impl SyncStatus {
    fn not_found() -> Self {
        SyncStatus {
            exists: false,
            status: "not found".to_string(),
            watching: false,
        }
    }
}

/// The seam between lifecycle coordination and the engine binary.
pub trait SyncEngine {
    /// Run one engine invocation with the given arguments.
    fn run(&self, args: &[String]) -> Result<ExecResult>;
}

/// The real engine: spawns `mutagen` and captures its output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mutagen;

impl SyncEngine for Mutagen {
    fn run(&self, args: &[String]) -> Result<ExecResult> {
        let output = Command::new("mutagen")
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::Unavailable {
                        tool: "mutagen".to_string(),
                        suggestion: "install it from https://mutagen.io/".to_string(),
                    }
                } else {
                    Error::Io(e)
                }
            })?;
        let exit_code = output.status.code().unwrap_or(-1);
        Ok(ExecResult {
            success: exit_code == 0,
            exit_code,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// The sync-engine remote endpoint: `user@host[:port]:path`, with the
/// port segment omitted on the default SSH port.
pub fn remote_endpoint(config: &Config, remote_path: &str) -> String {
    if config.vps.port == 22 {
        format!("{}:{}", config.ssh_host(), remote_path)
    } else {
        format!("{}:{}:{}", config.ssh_host(), config.vps.port, remote_path)
    }
}

/// Drives create/inspect/flush/terminate against a [`SyncEngine`].
///
/// Stateless between calls; polling bounds are configurable so tests
/// can exercise the timeout path without sleeping.
#[derive(Debug, Clone)]
pub struct SyncCoordinator<E: SyncEngine> {
    engine: E,
    poll_attempts: u32,
    poll_interval: Duration,
}

impl SyncCoordinator<Mutagen> {
    /// Coordinator over the real mutagen binary.
    pub fn new() -> Self {
        SyncCoordinator::with_engine(Mutagen)
    }
}

impl Default for SyncCoordinator<Mutagen> {
    fn default() -> Self {
        SyncCoordinator::new()
    }
}

impl<E: SyncEngine> SyncCoordinator<E> {
    pub fn with_engine(engine: E) -> Self {
        SyncCoordinator {
            engine,
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the force-sync polling bounds.
    pub fn with_polling(mut self, attempts: u32, interval: Duration) -> Self {
        self.poll_attempts = attempts;
        self.poll_interval = interval;
        self
    }

    /// True if the engine binary responds to `version`.
    pub fn is_engine_installed(&self) -> bool {
        match self.engine.run(&["version".to_string()]) {
            Ok(result) => result.success,
            Err(_) => false,
        }
    }

    /// Create the persistent two-way-safe session for a project.
    pub fn create_session(
        &self,
        config: &Config,
        name: &str,
        local_path: &str,
        remote_path: &str,
        ignore: &[String],
    ) -> Result<()> {
        let endpoint = remote_endpoint(config, remote_path);
        self.create(name, "two-way-safe", local_path, &endpoint, ignore)
    }

    fn create(
        &self,
        name: &str,
        mode: &str,
        alpha: &str,
        beta: &str,
        ignore: &[String],
    ) -> Result<()> {
        let mut args = vec![
            "sync".to_string(),
            "create".to_string(),
            format!("--name={}", name),
            format!("--sync-mode={}", mode),
        ];
        for pattern in ignore {
            args.push("--ignore".to_string());
            args.push(pattern.clone());
        }
        args.push("--ignore-vcs".to_string());
        args.push(alpha.to_string());
        args.push(beta.to_string());

        let result = self.engine.run(&args)?;
        if result.success {
            Ok(())
        } else {
            Err(Error::Sync(result.stderr.trim().to_string()))
        }
    }

    /// Query a session by name. A missing session is a normal
    /// `exists == false` status, not an error.
    pub fn status(&self, name: &str) -> Result<SyncStatus> {
        let result = self.engine.run(&[
            "sync".to_string(),
            "list".to_string(),
            format!("--name={}", name),
            "--output=json".to_string(),
        ])?;

        if !result.success {
            return Ok(SyncStatus::not_found());
        }
        Ok(parse_status(&result.stdout))
    }

    /// Current conflicts for a session; empty on any parse trouble.
    pub fn conflicts(&self, name: &str) -> Result<Vec<Conflict>> {
        let result = self.engine.run(&[
            "sync".to_string(),
            "list".to_string(),
            format!("--name={}", name),
            "--output=json".to_string(),
        ])?;
        if !result.success {
            return Ok(Vec::new());
        }
        Ok(extract_conflicts_from_str(&result.stdout))
    }

    /// Force a full synchronization cycle now.
    pub fn flush(&self, name: &str) -> Result<bool> {
        self.lifecycle_op("flush", name)
    }

    pub fn pause(&self, name: &str) -> Result<bool> {
        self.lifecycle_op("pause", name)
    }

    pub fn resume(&self, name: &str) -> Result<bool> {
        self.lifecycle_op("resume", name)
    }

    pub fn terminate(&self, name: &str) -> Result<bool> {
        self.lifecycle_op("terminate", name)
    }

    fn lifecycle_op(&self, op: &str, name: &str) -> Result<bool> {
        let result = self.engine.run(&[
            "sync".to_string(),
            op.to_string(),
            format!("--name={}", name),
        ])?;
        Ok(result.success)
    }

    /// One-shot forced one-way sync through a temporary replica session.
    ///
    /// The temporary session is named `<name>-force-<direction>` and is
    /// terminated on every path out of this function, success or not;
    /// it must never outlive the call.
    pub fn force_direction(
        &self,
        config: &Config,
        name: &str,
        local_path: &str,
        remote_path: &str,
        ignore: &[String],
        direction: SyncDirection,
    ) -> Result<()> {
        let temp_name = format!("{}-force-{}", name, direction);
        let outcome = self.run_forced(config, &temp_name, local_path, remote_path, ignore, direction);
        if let Err(e) = self.terminate(&temp_name) {
            tracing::warn!(session = %temp_name, error = %e, "failed to terminate temporary sync session");
        }
        outcome
    }

    fn run_forced(
        &self,
        config: &Config,
        temp_name: &str,
        local_path: &str,
        remote_path: &str,
        ignore: &[String],
        direction: SyncDirection,
    ) -> Result<()> {
        let endpoint = remote_endpoint(config, remote_path);
        // In one-way-replica mode beta mirrors alpha, so the source side
        // goes first.
        let (alpha, beta) = match direction {
            SyncDirection::LocalToRemote => (local_path, endpoint.as_str()),
            SyncDirection::RemoteToLocal => (endpoint.as_str(), local_path),
        };
        self.create(temp_name, "one-way-replica", alpha, beta, ignore)?;
        self.flush(temp_name)?;

        for _ in 0..self.poll_attempts {
            let status = self.status(temp_name)?;
            if status.watching {
                return Ok(());
            }
            if is_error_status(&status.status) {
                return Err(Error::Sync(status.status));
            }
            std::thread::sleep(self.poll_interval);
        }
        Err(Error::Sync(format!(
            "timed out waiting for forced {} sync to settle",
            direction
        )))
    }
}

/// Interpret `sync list --output=json` stdout. Non-JSON output is kept
/// verbatim as the status text (the session does exist, the engine just
/// spoke prose).
fn parse_status(stdout: &str) -> SyncStatus {
    let parsed: std::result::Result<serde_json::Value, _> = serde_json::from_str(stdout);
    let Ok(payload) = parsed else {
        return SyncStatus {
            exists: true,
            status: stdout.trim().to_string(),
            watching: false,
        };
    };

    let Some(session) = payload
        .get("sessions")
        .and_then(|s| s.as_array())
        .and_then(|s| s.first())
    else {
        return SyncStatus::not_found();
    };

    let status = session
        .get("status")
        .and_then(|s| s.as_str())
        .unwrap_or("unknown")
        .to_string();
    let watching = status == WATCHING_STATUS;
    SyncStatus {
        exists: true,
        status,
        watching,
    }
}

/// Status texts that mean the session halted rather than settling.
fn is_error_status(status: &str) -> bool {
    let lower = status.to_lowercase();
    lower.contains("error") || lower.contains("halt")
}

#[cfg(test)]
#[path = "sync_tests.rs"]
mod tests;
