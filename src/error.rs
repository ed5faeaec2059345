// SPDX-License-Identifier: MIT
//! Error taxonomy for the scan pipeline.
//!
//! Every failure here is an environment or configuration problem; nothing is
//! retried. Errors surface synchronously from `scan`/`version`/`install`.

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The Periphery executable could not be launched.
    #[error("periphery executable `{path}` could not be found")]
    ExecutableNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Periphery exited with a non-zero status code.
    #[error("`{command}` exited with status code {code}. {stderr}")]
    ProcessFailed {
        command: String,
        code: i32,
        stderr: String,
    },

    /// Periphery was terminated by an uncaught signal.
    #[error("`{command}` was terminated by signal {signal}")]
    ProcessSignaled { command: String, signal: String },

    /// The orchestrator was configured with an unknown output format.
    #[error("`{0}` is an unsupported output format")]
    UnsupportedFormat(String),

    /// A JSON entry's location did not match `path:line:column`.
    #[error("`{0}` is not a valid location")]
    MalformedLocation(String),

    /// The legacy postprocessor returned something other than null, a
    /// boolean, or a 4-element replacement array.
    #[error(
        "postprocessor must return one of null, true, false or an array of \
         4 elements (path, line, column, message), got `{0}`"
    )]
    InvalidPostprocessorResult(serde_json::Value),

    /// Periphery reported a version string that is not dotted-numeric.
    #[error("could not parse periphery version `{version}`")]
    InvalidVersion {
        version: String,
        #[source]
        source: semver::Error,
    },

    /// Malformed or incomplete checkstyle markup.
    #[error("malformed checkstyle output: {0}")]
    Checkstyle(#[from] quick_xml::Error),

    /// The tool output was not valid JSON.
    #[error("malformed JSON output: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
