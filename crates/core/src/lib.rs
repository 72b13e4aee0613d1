// SPDX-License-Identifier: MIT

//! sinc-core - remote session orchestration for the `sinc` CLI.
//!
//! This crate coordinates three independently failing external
//! subsystems: a remote-access transport (ssh/et/mosh), a terminal
//! multiplexer (tmux) on the remote host, and a file-synchronization
//! engine (mutagen). It owns the connect/resume flow, transport
//! selection, bounded reconnection, and sync lifecycle; the sync
//! algorithm and multiplexer semantics stay external.
//!
//! # Main components
//!
//! - [`Config`] - typed, validated connection/sync/agent settings
//! - [`protocol`] - transport selection from a preference list
//! - [`exec`] - one-shot remote command execution
//! - [`session`] - persistent remote session management
//! - [`sync`] - sync-engine lifecycle coordination
//! - [`reconnect`] - attach with bounded exponential backoff
//! - [`orchestrator`] - the top-level connect/resume flow
//! - [`Error`] - error taxonomy with per-category exit codes

pub mod config;
pub mod conflicts;
pub mod error;
pub mod exec;
pub mod ignore;
pub mod monitor;
pub mod orchestrator;
pub mod output;
pub mod protocol;
pub mod reconnect;
pub mod session;
pub mod session_id;
pub mod sync;

pub use config::{Config, SyncMode};
pub use error::{Error, Result};
pub use output::OutputCtx;
pub use protocol::Protocol;
pub use session_id::{session_identity, SESSION_PREFIX};
