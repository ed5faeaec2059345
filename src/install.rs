// SPDX-License-Identifier: MIT
//! Installer capability for the Periphery executable.
//!
//! Distribution (release resolution, download, archive extraction) happens
//! outside this crate; the orchestrator only needs this narrow surface to
//! place a binary and repoint itself at it.

use std::path::Path;

use crate::error::Result;

pub trait Installer {
    /// Resolve the concrete version this installer would install.
    fn resolve_version(&self) -> Result<String>;

    /// Install the executable at `dest`. `force` overwrites an existing
    /// file; without it an existing file is an error.
    fn install(&self, dest: &Path, force: bool) -> Result<()>;
}
