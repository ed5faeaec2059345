// SPDX-License-Identifier: MIT
//! Subprocess runner for the Periphery executable.
//!
//! Spawns `periphery scan <args>` (or `periphery version`) with stdin closed
//! and both output pipes drained concurrently, so a child blocked writing to
//! a full stderr pipe can never deadlock against a parent reading only
//! stdout. With `verbose` enabled each stream is additionally mirrored to
//! this process's own stdout/stderr as data arrives.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;

use semver::Version;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::process::Command;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::args::{self, ListEncoding};
use crate::error::{Error, Result};
use crate::options::ScanOptions;

/// Executable name looked up on `$PATH` when no explicit path is configured.
const DEFAULT_BINARY: &str = "periphery";

/// Callback invoked with the child pid right after spawn. Lets an external
/// observer cancel a scan by signaling the process.
pub type SpawnObserver = Arc<dyn Fn(u32) + Send + Sync>;

/// Runs the Periphery executable and captures its output.
pub struct Runner {
    binary_path: PathBuf,
    verbose: bool,
    on_spawn: Option<SpawnObserver>,
    // Cached for the lifetime of this runner so a scan with several
    // list-valued options spawns `periphery version` at most once.
    version: OnceCell<Version>,
}

impl Runner {
    pub fn new(binary_path: Option<PathBuf>) -> Self {
        Self {
            binary_path: binary_path.unwrap_or_else(|| PathBuf::from(DEFAULT_BINARY)),
            verbose: false,
            on_spawn: None,
            version: OnceCell::new(),
        }
    }

    /// Mirror subprocess output to this process's stdout/stderr while
    /// capturing it.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Observe the child pid right after spawn.
    pub fn on_spawn<F>(mut self, observer: F) -> Self
    where
        F: Fn(u32) + Send + Sync + 'static,
    {
        self.on_spawn = Some(Arc::new(observer));
        self
    }

    pub(crate) fn on_spawn_observer(mut self, observer: SpawnObserver) -> Self {
        self.on_spawn = Some(observer);
        self
    }

    pub fn binary_path(&self) -> &Path {
        &self.binary_path
    }

    /// Run `periphery scan` with the given options and return its stdout.
    pub async fn scan(&self, options: &ScanOptions) -> Result<String> {
        let mut arguments = vec!["scan".to_string()];
        arguments.extend(self.scan_arguments(options).await?);
        self.capture(&arguments).await
    }

    /// Translate options into the argument vector `scan` would use.
    ///
    /// Queries the executable's version when any list-valued option is
    /// present: Periphery 2.18.0 changed list parsing from one comma-joined
    /// token to repeated tokens.
    pub async fn scan_arguments(&self, options: &ScanOptions) -> Result<Vec<String>> {
        let encoding = if options.has_list_values() {
            if *self.tool_version().await? >= Version::new(2, 18, 0) {
                ListEncoding::Repeated
            } else {
                ListEncoding::CommaJoined
            }
        } else {
            ListEncoding::CommaJoined
        };
        Ok(args::scan_arguments(options, encoding))
    }

    /// Run `periphery version` and return the trimmed version string.
    pub async fn version(&self) -> Result<String> {
        let output = self.capture(&["version".to_string()]).await?;
        Ok(output.trim().to_string())
    }

    async fn tool_version(&self) -> Result<&Version> {
        self.version
            .get_or_try_init(|| async {
                let raw = self.version().await?;
                Version::parse(&raw).map_err(|source| Error::InvalidVersion {
                    version: raw,
                    source,
                })
            })
            .await
    }

    /// Spawn the executable, drain both pipes concurrently, wait for exit,
    /// and classify the result.
    async fn capture(&self, arguments: &[String]) -> Result<String> {
        debug!(binary = %self.binary_path.display(), ?arguments, "spawning periphery");

        let mut child = Command::new(&self.binary_path)
            .args(arguments)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| {
                if source.kind() == std::io::ErrorKind::NotFound {
                    Error::ExecutableNotFound {
                        path: self.binary_path.clone(),
                        source,
                    }
                } else {
                    Error::Io(source)
                }
            })?;

        if let (Some(observer), Some(pid)) = (&self.on_spawn, child.id()) {
            observer(pid);
        }

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("child stdout not captured"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("child stderr not captured"))?;

        // One drain task per pipe, joined after the child exits. Each buffer
        // is written only by its own task and read only after the join.
        let stdout_task = tokio::spawn(drain(stdout, self.verbose.then(tokio::io::stdout)));
        let stderr_task = tokio::spawn(drain(stderr, self.verbose.then(tokio::io::stderr)));

        let status = child.wait().await?;
        let stdout_buf = stdout_task.await.map_err(std::io::Error::other)??;
        let stderr_buf = stderr_task.await.map_err(std::io::Error::other)??;

        if status.success() {
            return Ok(String::from_utf8_lossy(&stdout_buf).into_owned());
        }

        let command = self.render_command(arguments);
        match status.code() {
            Some(code) => Err(Error::ProcessFailed {
                command,
                code,
                stderr: String::from_utf8_lossy(&stderr_buf).into_owned(),
            }),
            None => Err(Error::ProcessSignaled {
                command,
                signal: signal_name(&status),
            }),
        }
    }

    /// Render the command line for error messages. Arguments containing
    /// whitespace are quoted so token boundaries stay unambiguous.
    fn render_command(&self, arguments: &[String]) -> String {
        let mut command = self.binary_path.display().to_string();
        for argument in arguments {
            command.push(' ');
            if argument.chars().any(char::is_whitespace) {
                command.push('"');
                command.push_str(argument);
                command.push('"');
            } else {
                command.push_str(argument);
            }
        }
        command
    }
}

/// Read a pipe to EOF into a buffer, optionally teeing each chunk to one of
/// this process's own output streams as it arrives.
async fn drain<R, W>(mut source: R, mut tee: Option<W>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut chunk = [0u8; 8192];
    let mut captured = Vec::new();
    loop {
        let read = source.read(&mut chunk).await?;
        if read == 0 {
            break;
        }
        captured.extend_from_slice(&chunk[..read]);
        if let Some(out) = tee.as_mut() {
            out.write_all(&chunk[..read]).await?;
            out.flush().await?;
        }
    }
    Ok(captured)
}

#[cfg(unix)]
fn signal_name(status: &std::process::ExitStatus) -> String {
    use std::os::unix::process::ExitStatusExt;

    match status.signal() {
        Some(1) => "SIGHUP".to_string(),
        Some(2) => "SIGINT".to_string(),
        Some(3) => "SIGQUIT".to_string(),
        Some(6) => "SIGABRT".to_string(),
        Some(9) => "SIGKILL".to_string(),
        Some(11) => "SIGSEGV".to_string(),
        Some(13) => "SIGPIPE".to_string(),
        Some(15) => "SIGTERM".to_string(),
        Some(other) => format!("SIG{other}"),
        None => "unknown".to_string(),
    }
}

#[cfg(not(unix))]
fn signal_name(_status: &std::process::ExitStatus) -> String {
    "unknown".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_bare_executable_name() {
        let runner = Runner::new(None);
        assert_eq!(runner.binary_path(), Path::new("periphery"));
    }

    #[test]
    fn keeps_explicit_binary_path() {
        let runner = Runner::new(Some(PathBuf::from("/opt/periphery")));
        assert_eq!(runner.binary_path(), Path::new("/opt/periphery"));
    }

    #[test]
    fn rendered_command_quotes_arguments_with_whitespace() {
        let runner = Runner::new(Some(PathBuf::from("/opt/periphery")));
        let rendered = runner.render_command(&[
            "scan".to_string(),
            "--project".to_string(),
            "My App.xcodeproj".to_string(),
        ]);
        assert_eq!(rendered, r#"/opt/periphery scan --project "My App.xcodeproj""#);
    }

    #[tokio::test]
    async fn scan_arguments_skip_version_query_without_lists() {
        // No list-valued options: the encoding decision never needs the
        // (nonexistent) executable, so this must not error.
        let runner = Runner::new(Some(PathBuf::from("/nonexistent/periphery")));
        let options = ScanOptions::new()
            .with("project", "test.xcodeproj")
            .with("clean_build", true);
        let arguments = runner.scan_arguments(&options).await.unwrap();
        assert_eq!(
            arguments,
            vec!["--project", "test.xcodeproj", "--clean-build"]
        );
    }
}
