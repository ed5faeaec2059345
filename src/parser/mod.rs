// SPDX-License-Identifier: MIT
//! Parsers for Periphery's machine-readable output formats.
//!
//! Two formats are supported: `checkstyle` (XML) and `json`. Dispatch is a
//! closed set — anything else fails with [`Error::UnsupportedFormat`] before
//! the subprocess is spawned.

mod checkstyle;
mod json;

use std::path::{Path, PathBuf};

pub use checkstyle::CheckstyleParser;
pub use json::JsonParser;

use crate::error::{Error, Result};
use crate::model::Diagnostic;

pub const FORMAT_CHECKSTYLE: &str = "checkstyle";
pub const FORMAT_JSON: &str = "json";

/// One of the supported output parsers, selected by format name.
#[derive(Debug)]
pub enum OutputParser {
    Checkstyle(CheckstyleParser),
    Json(JsonParser),
}

impl OutputParser {
    pub fn for_format(format: &str) -> Result<Self> {
        match format {
            FORMAT_CHECKSTYLE => Ok(OutputParser::Checkstyle(CheckstyleParser::new())),
            FORMAT_JSON => Ok(OutputParser::Json(JsonParser::new())),
            other => Err(Error::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn parse(&self, input: &str) -> Result<Vec<Diagnostic>> {
        match self {
            OutputParser::Checkstyle(parser) => parser.parse(input),
            OutputParser::Json(parser) => parser.parse(input),
        }
    }
}

/// Strip `base` from `path` when the file lives under it; otherwise keep the
/// path untouched.
pub(crate) fn relativize(path: &str, base: &Path) -> String {
    Path::new(path)
        .strip_prefix(base)
        .map(|relative| relative.to_string_lossy().into_owned())
        .unwrap_or_else(|_| path.to_string())
}

pub(crate) fn working_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}
