// SPDX-License-Identifier: MIT

//! Background conflict monitor.
//!
//! While the interactive attach blocks the main flow, a background
//! thread polls the sync engine and reports each newly seen conflict
//! exactly once, keyed by path. The monitor is owned by the
//! orchestrator and must be stopped on every exit path from the attach;
//! the cancel channel doubles as the tick timer via `recv_timeout`, so
//! stopping is immediate rather than waiting out the interval.
//!
//! Only the monitor thread touches the seen-path set, so no locking is
//! needed.

use std::collections::HashSet;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::conflicts::{format_conflicts, Conflict};
use crate::output::OutputCtx;

/// Default poll interval for the conflict monitor.
pub const MONITOR_INTERVAL: Duration = Duration::from_secs(5);

/// A cancellable background conflict poller.
pub struct ConflictMonitor {
    cancel: mpsc::Sender<()>,
    handle: JoinHandle<()>,
}

impl ConflictMonitor {
    /// Spawn the monitor. `poll` returns the engine's current conflict
    /// list; failures inside it should be reported as an empty list.
    pub fn spawn<F>(interval: Duration, ctx: OutputCtx, mut poll: F) -> Self
    where
        F: FnMut() -> Vec<Conflict> + Send + 'static,
    {
        let (cancel, ticks) = mpsc::channel::<()>();
        let handle = std::thread::spawn(move || {
            let mut seen = HashSet::new();
            loop {
                match ticks.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let fresh = filter_new_conflicts(&mut seen, poll());
                        if !fresh.is_empty() {
                            ctx.log(&format!(
                                "Sync conflict detected:\n{}",
                                format_conflicts(&fresh)
                            ));
                        }
                    }
                    // Cancelled, or the sender vanished.
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                }
            }
        });
        ConflictMonitor { cancel, handle }
    }

    /// Cancel and wait for the thread to exit. The single cancellation
    /// point for every orchestrator exit path.
    pub fn stop(self) {
        let _ = self.cancel.send(());
        if self.handle.join().is_err() {
            tracing::warn!("conflict monitor thread panicked");
        }
    }
}

/// Keep only conflicts whose path has not been seen this run, and mark
/// them seen.
pub fn filter_new_conflicts(
    seen: &mut HashSet<String>,
    conflicts: Vec<Conflict>,
) -> Vec<Conflict> {
    conflicts
        .into_iter()
        .filter(|c| seen.insert(c.path.clone()))
        .collect()
}

#[cfg(test)]
#[path = "monitor_tests.rs"]
mod tests;
