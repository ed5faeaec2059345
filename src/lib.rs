// SPDX-License-Identifier: MIT
//! Report unused Swift code on pull requests.
//!
//! This crate drives [Periphery](https://github.com/peripheryapp/periphery)
//! against a Swift codebase, parses its diagnostics, keeps only findings
//! that touch files changed in the current review diff, and hands the
//! survivors to a code-review report sink as warnings or blocking errors.
//!
//! The review host, version control, and binary distribution stay behind
//! narrow traits ([`ReportSink`], [`DiffSource`], [`Installer`]); everything
//! in between — argument building, subprocess management, output parsing,
//! diff reconciliation, postprocessing — lives here.
//!
//! ```no_run
//! # async fn example(git: impl periphery_review::DiffSource,
//! #                  sink: impl periphery_review::ReportSink) -> periphery_review::Result<()> {
//! use periphery_review::{PeripheryReview, ScanOptions};
//!
//! let mut review = PeripheryReview::new(git, sink);
//! let options = ScanOptions::new()
//!     .with("project", "Foo.xcodeproj")
//!     .with("schemes", vec!["foo", "bar"])
//!     .with("clean_build", true);
//! review.scan(options).await
//! # }
//! ```

mod args;
pub mod diff;
pub mod error;
pub mod install;
pub mod model;
pub mod options;
pub mod parser;
pub mod review;
pub mod runner;

pub use diff::{files_in_diff, DiffSource, RenamedFile};
pub use error::{Error, Result};
pub use install::Installer;
pub use model::Diagnostic;
pub use options::{OptionValue, ScanOptions, BUILD_ARGS_KEY};
pub use parser::{CheckstyleParser, JsonParser};
pub use review::{PeripheryReview, Postprocessor, ReportSink};
pub use runner::Runner;
