// SPDX-License-Identifier: MIT
//! Scan orchestrator: runs Periphery, filters diagnostics to the review
//! diff, applies postprocessing, and reports what survives to the review
//! sink.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, warn};

use crate::diff::{files_in_diff, DiffSource};
use crate::error::{Error, Result};
use crate::install::Installer;
use crate::model::Diagnostic;
use crate::options::ScanOptions;
use crate::parser::{OutputParser, FORMAT_CHECKSTYLE};
use crate::runner::{Runner, SpawnObserver};

/// The code-review host: where accepted diagnostics end up.
pub trait ReportSink {
    /// Record a non-blocking review warning.
    fn record_warning(&mut self, path: &str, line: u32, message: &str);

    /// Record a review-blocking error.
    fn record_error(&mut self, path: &str, line: u32, message: &str);

    /// Record a file-less notice (deprecation messages). No-op by default.
    fn record_notice(&mut self, message: &str) {
        let _ = message;
    }
}

/// Legacy per-diagnostic postprocessor: receives (path, line, column,
/// message) and returns a loosely-typed verdict — `null`/`false` to
/// suppress, `true` to accept unchanged, or a 4-element replacement array.
/// Anything else fails the scan with
/// [`Error::InvalidPostprocessorResult`].
pub type Postprocessor = Box<dyn Fn(&str, u32, u32, &str) -> Value + Send + Sync>;

/// Outcome of the per-diagnostic postprocessing step.
enum Postprocessed {
    Suppress,
    Accept,
    Replace(Diagnostic),
}

/// Options forced on every scan; caller-supplied values for these keys are
/// overridden. `format` is forced separately from the configured format.
const OPTION_OVERRIDES: [(&str, bool); 2] = [("disable_update_check", true), ("quiet", true)];

const POSTPROCESSOR_DEPRECATION: &str = "periphery-review: the 4-argument postprocessor is \
     deprecated; pass a filter closure to `scan_filtered` instead";

/// Scans a Swift codebase with Periphery and reports unused-code findings
/// that touch files changed in the current review diff.
pub struct PeripheryReview<G, S> {
    /// Path to the Periphery executable. `None` looks up `periphery` on
    /// `$PATH`.
    pub binary_path: Option<PathBuf>,
    /// Report findings in every scanned file instead of only files in the
    /// review diff.
    pub scan_all_files: bool,
    /// Report findings as review-blocking errors instead of warnings.
    pub warning_as_error: bool,
    /// Mirror Periphery's output to this process's stdout/stderr.
    pub verbose: bool,
    format: String,
    postprocessor: Option<Postprocessor>,
    on_spawn: Option<SpawnObserver>,
    git: G,
    sink: S,
}

impl<G: DiffSource, S: ReportSink> PeripheryReview<G, S> {
    pub fn new(git: G, sink: S) -> Self {
        Self {
            binary_path: None,
            scan_all_files: false,
            warning_as_error: false,
            verbose: false,
            format: FORMAT_CHECKSTYLE.to_string(),
            postprocessor: None,
            on_spawn: None,
            git,
            sink,
        }
    }

    /// Select the output format used for the next scans. Validity is checked
    /// at scan time, before the subprocess is spawned.
    pub fn set_format(&mut self, format: impl Into<String>) {
        self.format = format.into();
    }

    pub fn format(&self) -> &str {
        &self.format
    }

    /// Set the legacy postprocessor. Deprecated in favor of
    /// [`scan_filtered`](Self::scan_filtered).
    pub fn set_postprocessor(&mut self, postprocessor: Postprocessor) {
        warn!("{POSTPROCESSOR_DEPRECATION}");
        self.sink.record_notice(POSTPROCESSOR_DEPRECATION);
        self.postprocessor = Some(postprocessor);
    }

    /// Convenience setter for [`set_postprocessor`](Self::set_postprocessor)
    /// taking a plain closure.
    pub fn process_warnings<F>(&mut self, postprocessor: F)
    where
        F: Fn(&str, u32, u32, &str) -> Value + Send + Sync + 'static,
    {
        self.set_postprocessor(Box::new(postprocessor));
    }

    /// Observe the pid of each spawned Periphery process, e.g. to cancel a
    /// scan externally by sending it a signal.
    pub fn on_spawn<F>(&mut self, observer: F)
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        self.on_spawn = Some(std::sync::Arc::new(observer));
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Scan and report every accepted diagnostic.
    pub async fn scan(&mut self, options: ScanOptions) -> Result<()> {
        self.run_scan(options, None::<fn(&mut Diagnostic) -> bool>)
            .await
    }

    /// Scan with a per-diagnostic filter. Returning `false` suppresses the
    /// diagnostic; the filter may also edit the message in place before
    /// returning `true`. Supplying a filter bypasses the legacy
    /// postprocessor entirely.
    pub async fn scan_filtered<F>(&mut self, options: ScanOptions, filter: F) -> Result<()>
    where
        F: FnMut(&mut Diagnostic) -> bool,
    {
        self.run_scan(options, Some(filter)).await
    }

    /// The version of the underlying Periphery executable.
    pub async fn version(&self) -> Result<String> {
        self.runner().version().await
    }

    /// Install Periphery via the given installer and point `binary_path` at
    /// the installed location.
    pub fn install(
        &mut self,
        installer: &dyn Installer,
        path: impl AsRef<Path>,
        force: bool,
    ) -> Result<()> {
        installer.install(path.as_ref(), force)?;
        self.binary_path = Some(std::path::absolute(path.as_ref())?);
        Ok(())
    }

    async fn run_scan<F>(&mut self, mut options: ScanOptions, mut filter: Option<F>) -> Result<()>
    where
        F: FnMut(&mut Diagnostic) -> bool,
    {
        // Resolve the parser first: an unsupported format should fail before
        // a (possibly expensive) build-and-scan is started.
        let parser = OutputParser::for_format(&self.format)?;

        for (key, value) in OPTION_OVERRIDES {
            options.set(key, value);
        }
        options.set("format", self.format.as_str());

        let output = self.runner().scan(&options).await?;
        let diagnostics = parser.parse(&output)?;
        debug!(count = diagnostics.len(), "parsed periphery diagnostics");

        let files = if self.scan_all_files {
            None
        } else {
            Some(files_in_diff(&self.git))
        };

        for mut diagnostic in diagnostics {
            if let Some(files) = &files {
                if !files.contains(&diagnostic.path) {
                    continue;
                }
            }

            let outcome = match filter.as_mut() {
                Some(filter) => {
                    if filter(&mut diagnostic) {
                        Postprocessed::Accept
                    } else {
                        Postprocessed::Suppress
                    }
                }
                None => match &self.postprocessor {
                    Some(postprocessor) => legacy_outcome(postprocessor, &diagnostic)?,
                    None => Postprocessed::Accept,
                },
            };

            let accepted = match outcome {
                Postprocessed::Suppress => continue,
                Postprocessed::Accept => diagnostic,
                Postprocessed::Replace(replacement) => replacement,
            };

            if self.warning_as_error {
                self.sink
                    .record_error(&accepted.path, accepted.line, &accepted.message);
            } else {
                self.sink
                    .record_warning(&accepted.path, accepted.line, &accepted.message);
            }
        }

        Ok(())
    }

    fn runner(&self) -> Runner {
        let mut runner = Runner::new(self.binary_path.clone()).verbose(self.verbose);
        if let Some(observer) = &self.on_spawn {
            runner = runner.on_spawn_observer(observer.clone());
        }
        runner
    }
}

fn legacy_outcome(postprocessor: &Postprocessor, diagnostic: &Diagnostic) -> Result<Postprocessed> {
    let verdict = postprocessor(
        &diagnostic.path,
        diagnostic.line,
        diagnostic.column,
        &diagnostic.message,
    );
    match verdict {
        Value::Null | Value::Bool(false) => Ok(Postprocessed::Suppress),
        Value::Bool(true) => Ok(Postprocessed::Accept),
        Value::Array(items) if items.len() == 4 => {
            let fields = (
                items[0].as_str(),
                items[1].as_u64(),
                items[2].as_u64(),
                items[3].as_str(),
            );
            match fields {
                (Some(path), Some(line), Some(column), Some(message)) => {
                    Ok(Postprocessed::Replace(Diagnostic::new(
                        path,
                        line as u32,
                        column as u32,
                        message,
                    )))
                }
                _ => Err(Error::InvalidPostprocessorResult(Value::Array(items))),
            }
        }
        other => Err(Error::InvalidPostprocessorResult(other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn diagnostic() -> Diagnostic {
        Diagnostic::new("main.swift", 19, 10, "Function 'unusedMethod()' is unused")
    }

    fn boxed<F>(f: F) -> Postprocessor
    where
        F: Fn(&str, u32, u32, &str) -> Value + Send + Sync + 'static,
    {
        Box::new(f)
    }

    #[test]
    fn legacy_true_accepts_unchanged() {
        let postprocessor = boxed(|_, _, _, _| json!(true));
        assert!(matches!(
            legacy_outcome(&postprocessor, &diagnostic()).unwrap(),
            Postprocessed::Accept
        ));
    }

    #[test]
    fn legacy_falsy_suppresses() {
        for verdict in [json!(null), json!(false)] {
            let postprocessor = boxed(move |_, _, _, _| verdict.clone());
            assert!(matches!(
                legacy_outcome(&postprocessor, &diagnostic()).unwrap(),
                Postprocessed::Suppress
            ));
        }
    }

    #[test]
    fn legacy_replacement_array_is_honored() {
        let postprocessor =
            boxed(|path, line, column, message| json!([path, line + 1, column, message]));
        match legacy_outcome(&postprocessor, &diagnostic()).unwrap() {
            Postprocessed::Replace(replaced) => assert_eq!(replaced.line, 20),
            _ => panic!("expected a replacement"),
        }
    }

    #[test]
    fn legacy_other_value_is_a_configuration_error() {
        for verdict in [json!(42), json!("yes"), json!([1, 2, 3]), json!({})] {
            let postprocessor = boxed(move |_, _, _, _| verdict.clone());
            assert!(matches!(
                legacy_outcome(&postprocessor, &diagnostic()),
                Err(Error::InvalidPostprocessorResult(_))
            ));
        }
    }

    #[test]
    fn legacy_array_with_wrong_types_is_a_configuration_error() {
        let postprocessor = boxed(|_, _, _, _| json!([1, "two", 3, "four"]));
        assert!(matches!(
            legacy_outcome(&postprocessor, &diagnostic()),
            Err(Error::InvalidPostprocessorResult(_))
        ));
    }
}
