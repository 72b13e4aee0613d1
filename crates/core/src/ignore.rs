// SPDX-License-Identifier: MIT

//! Ignore-pattern loading and merging.
//!
//! Base patterns come from the config; a project can add its own in a
//! `.syncignore` file. The merge preserves first-seen order because the
//! sync engine applies ignore rules in priority order.

use std::fs;
use std::path::Path;

use crate::error::Result;

const IGNORE_FILE_NAME: &str = ".syncignore";

/// Read the project's `.syncignore`, stripping comments and blank
/// lines. A missing file is a normal empty result.
pub fn load_sync_ignore(project_path: &Path) -> Result<Vec<String>> {
    let path = project_path.join(IGNORE_FILE_NAME);
    let contents = match fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Concatenate base and extra patterns, de-duplicating while keeping
/// the first occurrence and relative order.
pub fn merge_ignore_patterns(base: &[String], extra: &[String]) -> Vec<String> {
    let mut merged = Vec::with_capacity(base.len() + extra.len());
    for pattern in base.iter().chain(extra.iter()) {
        if pattern.is_empty() || merged.contains(pattern) {
            continue;
        }
        merged.push(pattern.clone());
    }
    merged
}

#[cfg(test)]
#[path = "ignore_tests.rs"]
mod tests;
