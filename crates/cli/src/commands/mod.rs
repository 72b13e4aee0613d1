// SPDX-License-Identifier: MIT

pub mod connect;
pub mod force;
pub mod kill;
pub mod list;

use std::path::PathBuf;

use sinc_core::error::Result;

/// The project root for this invocation: the current directory,
/// canonicalized so session identity is stable across symlinks.
pub fn project_root() -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    Ok(cwd.canonicalize()?)
}
