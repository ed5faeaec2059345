// SPDX-License-Identifier: MIT
//! Data model for scan findings.

use serde::{Deserialize, Serialize};

/// A single analysis finding reported by Periphery.
///
/// `path` is relative to the working directory whenever the reported file
/// lives under it; paths outside the working directory are kept as-is.
/// Lives for the duration of one scan invocation — no identity beyond
/// structural equality.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File the finding points at.
    pub path: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
    /// Human-readable diagnostic message.
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        path: impl Into<String>,
        line: u32,
        column: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            line,
            column,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {}",
            self.path, self.line, self.column, self.message
        )
    }
}
