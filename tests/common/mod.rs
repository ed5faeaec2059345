// SPDX-License-Identifier: MIT
//! Shared helpers for black-box tests: fake Periphery executables backed by
//! shell scripts in a scratch directory.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

/// Write an executable `/bin/sh` script acting as the Periphery binary.
#[cfg(unix)]
pub fn fake_tool(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    let mut permissions = fs::metadata(&path).unwrap().permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).unwrap();
    path
}

/// Checkstyle output covering two files, with repository-relative names so
/// no path relativization is involved.
pub const CHECKSTYLE_OUTPUT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<checkstyle version="4.3">
  <file name="main.swift">
    <error line="19" column="10" severity="warning" message="Function 'unusedMethod()' is unused"/>
  </file>
  <file name="generated.swift">
    <error line="3" column="1" severity="warning" message="Typealias 'Unused' is unused"/>
  </file>
</checkstyle>"#;

/// A script body that prints the canned checkstyle output.
pub fn checkstyle_tool_body() -> String {
    format!("cat <<'EOF'\n{CHECKSTYLE_OUTPUT}\nEOF")
}
