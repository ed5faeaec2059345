// SPDX-License-Identifier: MIT
//! Black-box tests for the subprocess runner, using fake Periphery
//! executables implemented as shell scripts.

#![cfg(unix)]

mod common;

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use periphery_review::{Error, Runner, ScanOptions};

use common::fake_tool;

#[tokio::test]
async fn scan_returns_captured_stdout_on_success() {
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(dir.path(), "periphery", r#"echo "warning: something smells""#);

    let output = Runner::new(Some(tool)).scan(&ScanOptions::new()).await.unwrap();
    assert_eq!(output, "warning: something smells\n");
}

#[tokio::test]
async fn nonzero_exit_fails_with_code_and_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(dir.path(), "periphery", "echo foo >&2\nexit 42");

    let err = Runner::new(Some(tool)).scan(&ScanOptions::new()).await.unwrap_err();
    match &err {
        Error::ProcessFailed { code, stderr, .. } => {
            assert_eq!(*code, 42);
            assert_eq!(stderr.trim(), "foo");
        }
        other => panic!("expected ProcessFailed, got {other:?}"),
    }
    let message = err.to_string();
    assert!(message.contains("42"));
    assert!(message.contains("foo"));
}

#[tokio::test]
async fn signal_termination_is_reported_by_name() {
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(dir.path(), "periphery", "kill -TERM $$");

    let err = Runner::new(Some(tool)).scan(&ScanOptions::new()).await.unwrap_err();
    assert!(matches!(err, Error::ProcessSignaled { .. }), "got {err:?}");
    assert!(err.to_string().contains("SIGTERM"));
}

#[tokio::test]
async fn missing_executable_is_its_own_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("periphery");

    let err = Runner::new(Some(missing.clone()))
        .scan(&ScanOptions::new())
        .await
        .unwrap_err();
    assert!(
        matches!(err, Error::ExecutableNotFound { path, .. } if path == missing),
        "expected ExecutableNotFound"
    );
}

#[tokio::test]
async fn large_stderr_does_not_deadlock_the_child() {
    let dir = tempfile::tempdir().unwrap();
    // Well past any pipe buffer: the child would block writing stderr if the
    // parent only drained stdout.
    let tool = fake_tool(
        dir.path(),
        "periphery",
        r#"i=0
while [ $i -lt 4000 ]; do
  echo "noise noise noise noise noise noise noise noise" >&2
  i=$((i+1))
done
echo ok"#,
    );

    let output = Runner::new(Some(tool)).scan(&ScanOptions::new()).await.unwrap();
    assert_eq!(output, "ok\n");
}

#[tokio::test]
async fn version_is_trimmed() {
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(dir.path(), "periphery", r#"printf ' 2.18.0 \n'"#);

    let version = Runner::new(Some(tool)).version().await.unwrap();
    assert_eq!(version, "2.18.0");
}

fn versioned_tool(dir: &std::path::Path, version: &str) -> PathBuf {
    fake_tool(
        dir,
        "periphery",
        &format!(r#"if [ "$1" = "version" ]; then echo "{version}"; fi"#),
    )
}

#[tokio::test]
async fn list_options_comma_join_below_2_18() {
    let dir = tempfile::tempdir().unwrap();
    let tool = versioned_tool(dir.path(), "2.17.0");

    let options = ScanOptions::new().with("targets", vec!["test1", "test2"]);
    let arguments = Runner::new(Some(tool)).scan_arguments(&options).await.unwrap();
    assert_eq!(arguments, vec!["--targets", "test1,test2"]);
}

#[tokio::test]
async fn list_options_repeat_from_2_18() {
    let dir = tempfile::tempdir().unwrap();
    for version in ["2.18.0", "2.19.1"] {
        let tool = versioned_tool(dir.path(), version);

        let options = ScanOptions::new().with("targets", vec!["test1", "test2"]);
        let arguments = Runner::new(Some(tool)).scan_arguments(&options).await.unwrap();
        assert_eq!(arguments, vec!["--targets", "test1", "test2"], "at {version}");
    }
}

#[tokio::test]
async fn version_is_queried_at_most_once_per_runner() {
    let dir = tempfile::tempdir().unwrap();
    let counter = dir.path().join("version-calls");
    let tool = fake_tool(
        dir.path(),
        "periphery",
        &format!(
            r#"if [ "$1" = "version" ]; then echo x >> "{}"; echo "2.18.0"; fi"#,
            counter.display()
        ),
    );

    let runner = Runner::new(Some(tool));
    let options = ScanOptions::new()
        .with("targets", vec!["test1", "test2"])
        .with("schemes", vec!["foo", "bar"]);
    runner.scan_arguments(&options).await.unwrap();
    runner.scan_arguments(&options).await.unwrap();

    let calls = std::fs::read_to_string(&counter).unwrap();
    assert_eq!(calls.lines().count(), 1);
}

#[tokio::test]
async fn unparsable_version_fails_list_encoding() {
    let dir = tempfile::tempdir().unwrap();
    let tool = versioned_tool(dir.path(), "nightly");

    let options = ScanOptions::new().with("targets", vec!["test1", "test2"]);
    let err = Runner::new(Some(tool)).scan_arguments(&options).await.unwrap_err();
    assert!(matches!(err, Error::InvalidVersion { version, .. } if version == "nightly"));
}

#[tokio::test]
async fn spawn_observer_receives_the_child_pid() {
    let dir = tempfile::tempdir().unwrap();
    let tool = fake_tool(dir.path(), "periphery", "echo done");

    let observed = Arc::new(AtomicU32::new(0));
    let observed_by_hook = observed.clone();
    let runner = Runner::new(Some(tool))
        .on_spawn(move |pid| observed_by_hook.store(pid, Ordering::SeqCst));

    runner.scan(&ScanOptions::new()).await.unwrap();
    assert_ne!(observed.load(Ordering::SeqCst), 0);
}
