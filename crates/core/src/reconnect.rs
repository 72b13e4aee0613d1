// SPDX-License-Identifier: MIT

//! Attach-with-reconnect: bounded exponential backoff around the
//! interactive attach.
//!
//! Each attempt re-runs protocol selection, because transport
//! availability can change between attempts (a tool installed
//! mid-session). Any non-zero attach exit is treated as retryable; the
//! exit code alone cannot distinguish a deliberate detach from a
//! dropped transport, and we preserve that ambiguity rather than invent
//! a disambiguation.
//!
//! Both bounds are hard invariants: delays cap at `max_delay_ms` and the
//! loop stops after `max_attempts`. On exhaustion the last real exit
//! code is returned so callers stay scriptable.

use std::time::Duration;

use crate::config::{Config, ReconnectPolicy};
use crate::error::Result;
use crate::output::OutputCtx;
use crate::protocol::{select_protocol, Protocol};
use crate::session::attach_session;

/// Backoff before retry `attempt` (1-based): `base * 2^(attempt-1)`,
/// capped at `max`.
pub fn backoff_delay(attempt: u32, base_delay_ms: u64, max_delay_ms: u64) -> u64 {
    let exp = attempt.saturating_sub(1).min(63);
    base_delay_ms
        .saturating_mul(1u64.checked_shl(exp).unwrap_or(u64::MAX))
        .min(max_delay_ms)
}

/// Attach to the named session, retrying with backoff until the attach
/// exits cleanly or attempts are exhausted. Returns the final exit code.
pub fn attach_with_reconnect(
    config: &Config,
    ctx: OutputCtx,
    session_name: &str,
    work_dir: &str,
    initial_command: &str,
) -> Result<i32> {
    run_with_backoff(
        &config.connection.reconnect,
        ctx,
        || {
            let protocol = select_protocol(config);
            ctx.log(&format!("Using protocol: {}", protocol));
            attach_session(config, protocol, session_name, work_dir, initial_command)
                .map(|code| (protocol, code))
        },
        |delay| std::thread::sleep(Duration::from_millis(delay)),
    )
}

/// The state machine itself, generic over the attach attempt and the
/// sleep so the loop is testable without processes or wall-clock time.
pub fn run_with_backoff<A, S>(
    policy: &ReconnectPolicy,
    ctx: OutputCtx,
    mut attempt_fn: A,
    mut sleep_fn: S,
) -> Result<i32>
where
    A: FnMut() -> Result<(Protocol, i32)>,
    S: FnMut(u64),
{
    let mut attempt = 0u32;
    let mut last_exit_code = 1;

    while attempt < policy.max_attempts {
        let (protocol, exit_code) = attempt_fn()?;
        if exit_code == 0 {
            return Ok(0);
        }
        last_exit_code = exit_code;
        attempt += 1;
        tracing::debug!(attempt, %protocol, exit_code, "attach exited non-zero");
        if attempt >= policy.max_attempts {
            break;
        }

        let delay = backoff_delay(attempt, policy.base_delay_ms, policy.max_delay_ms);
        ctx.log(&format!(
            "Connection lost. Reconnecting in {}s...",
            delay.div_ceil(1000)
        ));
        sleep_fn(delay);
    }

    ctx.error(
        "connection lost",
        Some(&format!(
            "failed to reconnect after {} attempts",
            policy.max_attempts
        )),
    );
    Ok(last_exit_code)
}

#[cfg(test)]
#[path = "reconnect_tests.rs"]
mod tests;
