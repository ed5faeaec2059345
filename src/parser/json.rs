// SPDX-License-Identifier: MIT
//! Parser for Periphery's `--format json` output.
//!
//! Unlike the checkstyle format, the JSON output carries semantic metadata
//! (declaration kind and hint) instead of a ready-made message, so the
//! message is synthesized here to match what Periphery's own text formatter
//! would print.

use std::path::PathBuf;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::model::Diagnostic;
use crate::parser::{relativize, working_dir};

#[derive(Debug)]
pub struct JsonParser {
    base: PathBuf,
}

#[derive(Debug, Deserialize)]
struct Entry {
    location: String,
    name: Option<String>,
    kind: Option<String>,
    #[serde(default)]
    hints: Vec<String>,
}

impl JsonParser {
    /// Parser that relativizes file paths against the working directory.
    pub fn new() -> Self {
        Self {
            base: working_dir(),
        }
    }

    /// Parser that relativizes file paths against an explicit base.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn parse(&self, input: &str) -> Result<Vec<Diagnostic>> {
        let entries: Vec<Entry> = serde_json::from_str(input)?;
        entries
            .into_iter()
            .map(|entry| {
                let (path, line, column) = self.parse_location(&entry.location)?;
                let message =
                    compose_message(entry.name.as_deref(), entry.kind.as_deref(), &entry.hints);
                Ok(Diagnostic {
                    path,
                    line,
                    column,
                    message,
                })
            })
            .collect()
    }

    /// Split a `<path>:<line>:<column>` location. Paths may contain colons,
    /// so the two numeric fields are anchored from the right.
    fn parse_location(&self, location: &str) -> Result<(String, u32, u32)> {
        let mut fields = location.rsplitn(3, ':');
        let column = fields.next().and_then(|field| field.parse().ok());
        let line = fields.next().and_then(|field| field.parse().ok());
        let path = fields.next().filter(|path| !path.is_empty());
        match (path, line, column) {
            (Some(path), Some(line), Some(column)) => {
                Ok((relativize(path, &self.base), line, column))
            }
            _ => Err(Error::MalformedLocation(location.to_string())),
        }
    }
}

impl Default for JsonParser {
    fn default() -> Self {
        Self::new()
    }
}

fn compose_message(name: Option<&str>, kind: Option<&str>, hints: &[String]) -> String {
    let Some(name) = name else {
        return "unused".to_string();
    };

    let mut message = String::new();
    if let Some(kind) = kind {
        message.push_str(&capitalize(display_name(kind)));
    }
    message.push(' ');
    message.push('\'');
    message.push_str(name);
    message.push('\'');
    message.push(' ');

    // Periphery's JSON formatter emits exactly one hint per entry, so only
    // the first is consulted.
    match hints.first().map(String::as_str) {
        Some("unused") => message.push_str("is unused"),
        Some("assignOnlyProperty") => message.push_str("is assigned, but never used"),
        Some("redundantProtocol") => {
            message.push_str("is redundant as it's never used as an existential type");
        }
        Some("redundantConformance") => message.push_str("conformance is redundant"),
        // The JSON output carries no module name, unlike Periphery's other
        // formatters, so the phrasing stays generic. Known upstream gap.
        Some("redundantPublicAccessibility") => {
            message.push_str("is declared public, but not used outside of the module");
        }
        _ => {}
    }
    message
}

/// Human-readable category for a declaration kind token.
fn display_name(kind: &str) -> &str {
    match kind {
        "enumelement" => "enum case",
        "function.constructor" => "initializer",
        "var.parameter" => "parameter",
        "generic_type_param" => "generic type parameter",
        kind if kind.starts_with("var") => "property",
        kind => kind.split('.').next().unwrap_or(kind),
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
