// SPDX-License-Identifier: MIT

//! The default command: connect to (or resume) this project's session.

use sinc_core::config::Config;
use sinc_core::error::Result;
use sinc_core::orchestrator;
use sinc_core::output::OutputCtx;

/// Run the full connect flow for the current directory. Returns the
/// interactive session's exit code.
pub fn run(config: &Config, ctx: OutputCtx, resume: bool) -> Result<i32> {
    let project_path = super::project_root()?;
    orchestrator::connect(config, ctx, &project_path, resume)
}
