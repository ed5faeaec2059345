// SPDX-License-Identifier: MIT
//! Streaming parser for Periphery's `--format checkstyle` output.
//!
//! The document is a flat tree: `file` elements each holding zero or more
//! `error` children. Only those two tags matter, so this walks the event
//! stream with a single piece of push-down state (the current file path)
//! instead of building a DOM. Malformed markup fails loudly.

use std::path::PathBuf;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::Result;
use crate::model::Diagnostic;
use crate::parser::{relativize, working_dir};

#[derive(Debug)]
pub struct CheckstyleParser {
    base: PathBuf,
}

impl CheckstyleParser {
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
        let mut reader = Reader::from_str(input);
        // Mismatched end tags must fail the parse, not drop diagnostics.
        reader.config_mut().check_end_names = true;
        let mut diagnostics = Vec::new();
        // None outside any file element, so stray errors cannot leak into
        // the previous file's context.
        let mut current_file: Option<String> = None;

        loop {
            match reader.read_event()? {
                Event::Start(tag) => self.open_tag(&tag, &mut current_file, &mut diagnostics)?,
                Event::Empty(tag) => {
                    // A self-closing tag opens and closes in one event.
                    self.open_tag(&tag, &mut current_file, &mut diagnostics)?;
                    if tag.name().as_ref() == b"file" {
                        current_file = None;
                    }
                }
                Event::End(tag) if tag.name().as_ref() == b"file" => current_file = None,
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(diagnostics)
    }

    fn open_tag(
        &self,
        tag: &BytesStart<'_>,
        current_file: &mut Option<String>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<()> {
        match tag.name().as_ref() {
            b"file" => {
                *current_file = attribute(tag, "name")?.map(|name| relativize(&name, &self.base));
            }
            b"error" => {
                if let Some(path) = current_file {
                    diagnostics.push(Diagnostic {
                        path: path.clone(),
                        line: integer_attribute(tag, "line")?,
                        column: integer_attribute(tag, "column")?,
                        message: attribute(tag, "message")?.unwrap_or_default(),
                    });
                }
            }
            _ => {}
        }
        Ok(())
    }
}

impl Default for CheckstyleParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Look up an attribute by name, with XML entities decoded.
fn attribute(tag: &BytesStart<'_>, name: &str) -> Result<Option<String>> {
    for attribute in tag.attributes() {
        let attribute = attribute.map_err(quick_xml::Error::InvalidAttr)?;
        if attribute.key.as_ref() == name.as_bytes() {
            return Ok(Some(attribute.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

fn integer_attribute(tag: &BytesStart<'_>, name: &str) -> Result<u32> {
    // Lenient like the original: a missing or garbage attribute becomes 0.
    Ok(attribute(tag, name)?
        .and_then(|value| value.parse().ok())
        .unwrap_or(0))
}
