// SPDX-License-Identifier: MIT

//! Remote-access transport selection.
//!
//! The configured preference list is filtered down to transports whose
//! client binary exists locally; the first survivor wins. Availability is
//! re-checked on every call because tools can be installed mid-session
//! (reconnect attempts deliberately re-run selection).
//!
//! When nothing is available we still return the first preference rather
//! than guessing: the executor then fails with a clear "binary not found"
//! error instead of this module inventing a fallback.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::Config;

/// A remote-access transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Ssh,
    Et,
    Mosh,
}

impl Protocol {
    /// The local client binary this transport runs through.
    pub fn binary(&self) -> &'static str {
        match self {
            Protocol::Ssh => "ssh",
            Protocol::Et => "et",
            Protocol::Mosh => "mosh",
        }
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.binary())
    }
}

/// Pure selection core: first preference whose binary is available,
/// else the first preference, else ssh for an empty list.
pub fn select_from<F>(preferences: &[Protocol], is_available: F) -> Protocol
where
    F: Fn(Protocol) -> bool,
{
    preferences
        .iter()
        .copied()
        .find(|p| is_available(*p))
        .or_else(|| preferences.first().copied())
        .unwrap_or(Protocol::Ssh)
}

/// Select a transport from the configured preference list based on which
/// client binaries exist on `PATH`. Existence check only, no probe.
pub fn select_protocol(config: &Config) -> Protocol {
    let selected = select_from(&config.connection.protocols, |p| {
        binary_on_path(p.binary())
    });
    tracing::debug!(protocol = %selected, "selected transport");
    selected
}

/// True if an executable with this name exists in some `PATH` entry.
fn binary_on_path(name: &str) -> bool {
    let Some(path) = std::env::var_os("PATH") else {
        return false;
    };
    std::env::split_paths(&path).any(|dir| is_executable(&dir.join(name)))
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Build the argv that runs `remote_cmd` on the host over `protocol`.
///
/// Each transport maps the port and keepalive options its own way; the
/// remote command is always the final single token.
pub fn build_remote_command(
    config: &Config,
    protocol: Protocol,
    remote_cmd: &str,
) -> Vec<String> {
    let host = config.ssh_host();
    let port = config.vps.port.to_string();
    match protocol {
        Protocol::Et => vec![
            "et".to_string(),
            "-t".to_string(),
            remote_cmd.to_string(),
            "-p".to_string(),
            port,
            host,
        ],
        Protocol::Mosh => vec![
            "mosh".to_string(),
            "-p".to_string(),
            port,
            host,
            "--".to_string(),
            remote_cmd.to_string(),
        ],
        Protocol::Ssh => vec![
            "ssh".to_string(),
            "-o".to_string(),
            format!("ServerAliveInterval={}", config.ssh.keepalive_interval),
            "-o".to_string(),
            "ServerAliveCountMax=3".to_string(),
            "-p".to_string(),
            port,
            host,
            remote_cmd.to_string(),
        ],
    }
}

#[cfg(test)]
#[path = "protocol_tests.rs"]
mod tests;
