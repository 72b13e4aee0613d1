// SPDX-License-Identifier: MIT

//! Explicit output context threaded through every component.
//!
//! Human-readable text goes to standard error; structured events go to
//! standard output as one JSON object per line when `--json` is active.
//! The split keeps stdout scriptable without regex-parsing prose.

use serde::Serialize;

/// Output mode for a single invocation.
///
/// There is no global output state: the context is constructed once from
/// the CLI flags and lent to each component that produces output.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputCtx {
    /// Suppress non-essential prose.
    pub quiet: bool,
    /// Emit extra diagnostics.
    pub verbose: bool,
    /// Emit machine-readable events on stdout.
    pub json: bool,
}

impl OutputCtx {
    /// Create a context from the resolved CLI flags.
    pub fn new(quiet: bool, verbose: bool, json: bool) -> Self {
        OutputCtx {
            quiet,
            verbose,
            json,
        }
    }

    /// Print a line of prose to stderr unless quiet.
    pub fn log(&self, message: &str) {
        if !self.quiet {
            eprintln!("{}", message);
        }
    }

    /// Print a line of prose to stderr only in verbose mode.
    pub fn log_verbose(&self, message: &str) {
        if self.verbose && !self.quiet {
            eprintln!("{}", message);
        }
    }

    /// Print an error with an optional one-line suggestion. Errors are
    /// never suppressed by quiet mode.
    pub fn error(&self, message: &str, suggestion: Option<&str>) {
        eprintln!("error: {}", message);
        if let Some(hint) = suggestion {
            eprintln!("  hint: {}", hint);
        }
    }

    /// Emit one JSON object per line on stdout when in JSON mode.
    ///
    /// Serialization failures are reported on stderr rather than
    /// propagated; an unprintable event must not abort the flow.
    pub fn emit_json<T: Serialize>(&self, event: &T) {
        if !self.json {
            return;
        }
        match serde_json::to_string(event) {
            Ok(line) => println!("{}", line),
            Err(e) => eprintln!("error: failed to serialize event: {}", e),
        }
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
