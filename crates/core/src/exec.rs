// SPDX-License-Identifier: MIT

//! One-shot remote command execution over SSH.
//!
//! Commands run in `BatchMode` so a misconfigured key fails fast instead
//! of hanging on a password prompt. Both output streams are captured in
//! full; success means exit code zero.

use std::process::{Command, Stdio};

use crate::config::Config;
use crate::error::{Error, Result};

/// Captured result of one remote invocation.
#[derive(Debug, Clone)]
pub struct ExecResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Pure argv builder for a one-shot `ssh` invocation (everything after
/// the program name).
pub fn ssh_args(config: &Config, command: &str) -> Vec<String> {
    let mut args = vec![
        "-o".to_string(),
        format!("ConnectTimeout={}", config.ssh.connect_timeout),
        "-o".to_string(),
        format!("ServerAliveInterval={}", config.ssh.keepalive_interval),
        "-o".to_string(),
        "ServerAliveCountMax=3".to_string(),
        "-o".to_string(),
        "BatchMode=yes".to_string(),
    ];
    if let Some(identity) = &config.ssh.identity_file {
        args.push("-i".to_string());
        args.push(identity.clone());
    }
    args.push("-p".to_string());
    args.push(config.vps.port.to_string());
    args.push(config.ssh_host());
    args.push(command.to_string());
    args
}

/// Run one command on the remote host, capturing exit code and both
/// streams. Fails only on local spawn errors; a remote non-zero exit is
/// a normal `ExecResult` with `success == false`.
pub fn ssh_exec(config: &Config, command: &str) -> Result<ExecResult> {
    let args = ssh_args(config, command);
    tracing::debug!(command, "remote exec");

    let output = Command::new("ssh")
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Unavailable {
                    tool: "ssh".to_string(),
                    suggestion: "install an OpenSSH client".to_string(),
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

/// Verify the remote host is reachable by running `echo ok`.
///
/// On failure the raw stderr is classified into a short human-readable
/// reason plus a suggestion, surfaced as a `Connect` error.
pub fn test_connection(config: &Config) -> Result<()> {
    let result = ssh_exec(config, "echo ok")?;
    if result.success {
        return Ok(());
    }
    let (reason, suggestion) = classify_failure(&result.stderr);
    Err(Error::Connect { reason, suggestion })
}

/// Map raw SSH stderr to a (reason, suggestion) pair.
pub fn classify_failure(stderr: &str) -> (String, String) {
    if stderr.contains("Connection timed out") {
        (
            "connection timed out".to_string(),
            "check the hostname and network".to_string(),
        )
    } else if stderr.contains("Connection refused") {
        (
            "connection refused".to_string(),
            "check if SSH is running on the remote host".to_string(),
        )
    } else if stderr.contains("Permission denied") {
        (
            "permission denied".to_string(),
            "check your SSH key".to_string(),
        )
    } else if stderr.contains("Could not resolve hostname") {
        (
            "could not resolve hostname".to_string(),
            "check the configured hostname".to_string(),
        )
    } else {
        let trimmed = stderr.trim();
        let reason = if trimmed.is_empty() {
            "unknown connection error".to_string()
        } else {
            trimmed.to_string()
        };
        (reason, "check VPS hostname and SSH key".to_string())
    }
}

#[cfg(test)]
#[path = "exec_tests.rs"]
mod tests;
