// SPDX-License-Identifier: MIT

//! Conflict extraction from sync-engine status payloads.
//!
//! The engine's JSON shape has drifted across releases, so extraction
//! tolerates several field spellings and never fails: malformed input is
//! simply zero conflicts. A conflict's identity is its path; the monitor
//! de-duplicates on that.

use serde_json::Value;

/// One conflicting path, with whichever side descriptors the payload
/// carried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub path: String,
    pub alpha_version: Option<String>,
    pub beta_version: Option<String>,
}

/// Pull per-path conflict entries out of a `sync list` JSON payload.
pub fn extract_conflicts(payload: &Value) -> Vec<Conflict> {
    let Some(sessions) = payload.get("sessions").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut conflicts = Vec::new();
    for session in sessions {
        let Some(entries) = session.get("conflicts").and_then(Value::as_array) else {
            continue;
        };
        for entry in entries {
            let Some(path) = first_string(entry, &["path", "relativePath", "file"]) else {
                continue;
            };
            conflicts.push(Conflict {
                path,
                alpha_version: side_descriptor(entry, "alphaVersion", "alpha"),
                beta_version: side_descriptor(entry, "betaVersion", "beta"),
            });
        }
    }
    conflicts
}

/// Parse raw engine stdout and extract conflicts; non-JSON yields none.
pub fn extract_conflicts_from_str(stdout: &str) -> Vec<Conflict> {
    match serde_json::from_str::<Value>(stdout) {
        Ok(payload) => extract_conflicts(&payload),
        Err(_) => Vec::new(),
    }
}

fn first_string(entry: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| entry.get(*k).and_then(Value::as_str))
        .map(str::to_string)
        .next()
}

/// Side descriptor: flat `<side>Version`, or nested `<side>.version` /
/// `<side>.path`.
fn side_descriptor(entry: &Value, flat_key: &str, side: &str) -> Option<String> {
    if let Some(v) = entry.get(flat_key).and_then(Value::as_str) {
        return Some(v.to_string());
    }
    let nested = entry.get(side)?;
    first_string(nested, &["version", "path"])
}

/// Human-readable rendering: one line per conflict, with side
/// descriptors in parentheses when present.
pub fn format_conflicts(conflicts: &[Conflict]) -> String {
    if conflicts.is_empty() {
        return "No conflicts".to_string();
    }
    conflicts
        .iter()
        .map(|c| {
            let mut sides = Vec::new();
            if let Some(alpha) = &c.alpha_version {
                sides.push(format!("alpha: {}", alpha));
            }
            if let Some(beta) = &c.beta_version {
                sides.push(format!("beta: {}", beta));
            }
            if sides.is_empty() {
                c.path.clone()
            } else {
                format!("{} ({})", c.path, sides.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
#[path = "conflicts_tests.rs"]
mod tests;
