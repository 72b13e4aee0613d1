// SPDX-License-Identifier: MIT

//! Connection, sync, and agent configuration.
//!
//! Configuration is stored as JSON at `$XDG_CONFIG_HOME/sinc/config.json`
//! (falling back to `~/.config`). A missing file yields built-in defaults.
//! A file that exists but cannot be read or parsed is a hard error: a
//! broken explicit config must never masquerade as "no config".
//!
//! Unknown fields are ignored so older binaries tolerate newer configs.
//! The loaded value is immutable for the lifetime of the invocation and
//! owned by the orchestrator.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::protocol::Protocol;

const CONFIG_DIR_NAME: &str = "sinc";
const CONFIG_FILE_NAME: &str = "config.json";

/// Top-level configuration for one invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// The remote host the session lives on.
    pub vps: VpsTarget,
    /// File synchronization settings.
    pub sync: SyncConfig,
    /// Which coding agent the session launches.
    pub agent: Agent,
    /// SSH transport tuning.
    pub ssh: SshConfig,
    /// Protocol preference and reconnect policy.
    pub connection: ConnectionConfig,
}

/// Remote host coordinates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VpsTarget {
    pub hostname: String,
    pub user: String,
    pub port: u16,
}

/// Direction policy for the background sync session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// No sync session at all.
    None,
    Pull,
    Push,
    /// Two-way-safe (default).
    Both,
}

/// File synchronization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SyncConfig {
    pub mode: SyncMode,
    /// Base ignore patterns, merged with the project's `.syncignore`.
    pub ignore: Vec<String>,
    /// Remote directory under which project workspaces are created.
    pub remote_base: String,
}

/// The coding agent launched as the session's first program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Agent {
    Opencode,
    Claude,
}

impl Agent {
    /// The command run inside the fresh remote session.
    pub fn command(&self) -> &'static str {
        match self {
            Agent::Opencode => "opencode",
            Agent::Claude => "claude",
        }
    }
}

/// SSH transport tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SshConfig {
    /// `ConnectTimeout` in seconds.
    pub connect_timeout: u32,
    /// `ServerAliveInterval` in seconds.
    pub keepalive_interval: u32,
    /// Optional private key passed with `-i`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity_file: Option<String>,
}

/// Protocol preference and reconnect policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionConfig {
    /// Ordered transport preference list.
    pub protocols: Vec<Protocol>,
    pub reconnect: ReconnectPolicy,
}

/// Bounds for the reconnection state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for VpsTarget {
    fn default() -> Self {
        VpsTarget {
            hostname: "localhost".to_string(),
            user: "ubuntu".to_string(),
            port: 22,
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            mode: SyncMode::Both,
            ignore: vec![
                "node_modules".to_string(),
                ".venv".to_string(),
                ".git".to_string(),
                "__pycache__".to_string(),
                ".DS_Store".to_string(),
            ],
            remote_base: "~/workspace".to_string(),
        }
    }
}

impl Default for Agent {
    fn default() -> Self {
        Agent::Opencode
    }
}

impl Default for SshConfig {
    fn default() -> Self {
        SshConfig {
            connect_timeout: 10,
            keepalive_interval: 60,
            identity_file: None,
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        ConnectionConfig {
            protocols: vec![Protocol::Ssh, Protocol::Et, Protocol::Mosh],
            reconnect: ReconnectPolicy::default(),
        }
    }
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        ReconnectPolicy {
            max_attempts: 5,
            base_delay_ms: 1000,
            max_delay_ms: 10_000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            vps: VpsTarget::default(),
            sync: SyncConfig::default(),
            agent: Agent::default(),
            ssh: SshConfig::default(),
            connection: ConnectionConfig::default(),
        }
    }
}

impl Config {
    /// `user@host` for SSH-style addressing.
    pub fn ssh_host(&self) -> String {
        format!("{}@{}", self.vps.user, self.vps.hostname)
    }

    /// Load from the per-user config path; defaults when the file is absent.
    pub fn load() -> Result<Config> {
        Config::load_from(&config_path())
    }

    /// Load from an explicit path. Missing file yields defaults; a present
    /// but unreadable or invalid file is a `Config` error.
    pub fn load_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Config::default());
        }

        let raw = fs::read_to_string(path).map_err(|e| Error::Config {
            path: path.display().to_string(),
            reason: format!("unable to read file: {}", e),
        })?;

        let config: Config = serde_json::from_str(&raw).map_err(|e| Error::Config {
            path: path.display().to_string(),
            reason: format!("invalid JSON: {}", e),
        })?;

        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.vps.hostname.is_empty() {
            return Err(Error::Config {
                path: path.display().to_string(),
                reason: "vps.hostname must not be empty".to_string(),
            });
        }
        if self.vps.user.is_empty() {
            return Err(Error::Config {
                path: path.display().to_string(),
                reason: "vps.user must not be empty".to_string(),
            });
        }
        if self.connection.protocols.is_empty() {
            return Err(Error::Config {
                path: path.display().to_string(),
                reason: "connection.protocols must list at least one protocol".to_string(),
            });
        }
        if self.connection.reconnect.max_attempts == 0 {
            return Err(Error::Config {
                path: path.display().to_string(),
                reason: "connection.reconnect.maxAttempts must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// The per-user config file path: `$XDG_CONFIG_HOME/sinc/config.json`,
/// falling back to `~/.config/sinc/config.json`.
pub fn config_path() -> PathBuf {
    let base = std::env::var_os("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .filter(|p| !p.as_os_str().is_empty())
        .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
        .unwrap_or_else(|| PathBuf::from(".config"));
    base.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
