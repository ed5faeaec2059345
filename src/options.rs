// SPDX-License-Identifier: MIT
//! Scan option mapping, before translation to command-line syntax.
//!
//! Options keep their insertion order — the argument builder iterates them
//! in the order the caller supplied them. Keys are plain strings; underscores
//! are converted to hyphens at translation time, not here.

/// Key whose value is forwarded verbatim to the underlying build tool,
/// appended after a literal `--` separator.
pub const BUILD_ARGS_KEY: &str = "build_args";

/// A single option value: a flag, a scalar, or an ordered list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// `Flag(true)` emits the bare flag; `Flag(false)` emits nothing.
    Flag(bool),
    /// Emits the flag followed by one argument token.
    Value(String),
    /// Emits the flag followed by the elements, comma-joined or repeated
    /// depending on the Periphery version in use.
    List(Vec<String>),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Flag(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Value(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Value(value)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(value: Vec<String>) -> Self {
        OptionValue::List(value)
    }
}

impl From<Vec<&str>> for OptionValue {
    fn from(value: Vec<&str>) -> Self {
        OptionValue::List(value.into_iter().map(str::to_string).collect())
    }
}

impl From<&[&str]> for OptionValue {
    fn from(value: &[&str]) -> Self {
        OptionValue::List(value.iter().map(|s| s.to_string()).collect())
    }
}

/// Ordered option-name → value mapping passed through to Periphery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOptions {
    entries: Vec<(String, OptionValue)>,
}

impl ScanOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an option, replacing any existing value for the same key in place
    /// so the mapping keeps its original position for that key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> &mut Self {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    /// Builder-style variant of [`set`](Self::set).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any option (other than the build passthrough) carries a list
    /// value. Only then does argument encoding depend on the tool version.
    pub fn has_list_values(&self) -> bool {
        self.entries
            .iter()
            .any(|(key, value)| key != BUILD_ARGS_KEY && matches!(value, OptionValue::List(_)))
    }
}
