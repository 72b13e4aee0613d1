// SPDX-License-Identifier: MIT

//! Error types for sinc-core operations.
//!
//! Every user-facing error carries a short message and, where one exists,
//! a corrective hint. Each variant maps to a distinct process exit code so
//! scripts can tell a bad invocation from an unreachable host.

use thiserror::Error;

/// Process exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Process exit code for unclassified failures.
pub const EXIT_GENERAL: i32 = 1;
/// Process exit code for invalid invocations or inconsistent session state.
pub const EXIT_MISUSE: i32 = 2;
/// Process exit code for unreadable or invalid configuration.
pub const EXIT_CONFIG: i32 = 3;
/// Process exit code for an unreachable remote host.
pub const EXIT_CONNECT: i32 = 4;
/// Process exit code for a missing required external tool.
pub const EXIT_UNAVAILABLE: i32 = 5;

/// All possible errors that can occur in sinc-core operations.
#[derive(Debug, Error)]
pub enum Error {
    #[error("config error: {reason}\n  hint: fix or remove {path}")]
    Config { path: String, reason: String },

    #[error("connection failed: {reason}\n  hint: {suggestion}")]
    Connect { reason: String, suggestion: String },

    #[error("{message}\n  hint: {suggestion}")]
    Misuse { message: String, suggestion: String },

    #[error("{tool} is required but was not found\n  hint: {suggestion}")]
    Unavailable { tool: String, suggestion: String },

    #[error("sync engine error: {0}")]
    Sync(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    General(String),
}

impl Error {
    /// The process exit code this error maps to.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Config { .. } => EXIT_CONFIG,
            Error::Connect { .. } => EXIT_CONNECT,
            Error::Misuse { .. } => EXIT_MISUSE,
            Error::Unavailable { .. } => EXIT_UNAVAILABLE,
            Error::Sync(_) | Error::Io(_) | Error::Json(_) | Error::General(_) => EXIT_GENERAL,
        }
    }
}

/// A specialized Result type for sinc-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
