// SPDX-License-Identifier: MIT

//! Deterministic session identity derivation.
//!
//! Every project maps to exactly one remote session name of the form
//! `sinc-<slug>-<hash>`, where the slug is the sanitized project basename
//! and the hash is the first six hex characters of the SHA-256 of the
//! absolute project path. Same path, same name; different paths collide
//! only with negligible probability even when basenames match.
//!
//! The name doubles as the sync-engine session name, so it must stay
//! within the character set both tmux and mutagen accept.

use sha2::{Digest, Sha256};
use std::path::Path;

/// Prefix shared by every session this tool creates. Used to filter
/// `list-sessions` output down to our own sessions.
pub const SESSION_PREFIX: &str = "sinc-";

const HASH_LEN: usize = 6;

/// Slugified project name from a path's basename: lowercase, whitespace
/// collapsed to `-`, anything outside `[a-z0-9-]` dropped, runs of `-`
/// collapsed, leading/trailing `-` trimmed. Falls back to `"project"`
/// when nothing survives.
pub fn project_name(path: &Path) -> String {
    let base = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let mut slug = String::with_capacity(base.len());
    let mut last_dash = true; // trim leading dashes
    for ch in base.to_lowercase().chars() {
        let mapped = if ch.is_whitespace() { '-' } else { ch };
        if mapped == '-' || mapped.is_ascii_lowercase() || mapped.is_ascii_digit() {
            if mapped == '-' {
                if !last_dash {
                    slug.push('-');
                    last_dash = true;
                }
            } else {
                slug.push(mapped);
                last_dash = false;
            }
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }

    if slug.is_empty() {
        "project".to_string()
    } else {
        slug
    }
}

/// Derive the session identity for an absolute project path.
pub fn session_identity(absolute_path: &Path) -> String {
    let digest = Sha256::digest(absolute_path.to_string_lossy().as_bytes());
    let hash = &hex::encode(digest)[..HASH_LEN];
    format!("{}{}-{}", SESSION_PREFIX, project_name(absolute_path), hash)
}

#[cfg(test)]
#[path = "session_id_tests.rs"]
mod tests;
