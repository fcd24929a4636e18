#![cfg(unix)]

mod common;
use crate::common::{LineRecorder, init_tracing, quiet, with_timeout, within};

use std::sync::Arc;
use std::time::{Duration, Instant};

use cmdrun::errors::{CmdError, ExitFailure};
use cmdrun::exec::ProcessHandle;
use cmdrun::types::Phase;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::test(flavor = "multi_thread")]
async fn exit_kills_long_sleeping_command() -> TestResult {
    init_tracing();
    let handle = Arc::new(ProcessHandle::new(quiet()));

    let runner = {
        let handle = Arc::clone(&handle);
        tokio::spawn(async move { handle.run(&["sleep 30"]).await })
    };
    with_timeout(handle.wait_started()).await;

    let started = Instant::now();
    handle.exit().await;
    let res = with_timeout(runner).await?;

    assert!(started.elapsed() < Duration::from_secs(5));
    match res {
        Err(CmdError::Runtime { failure, .. }) => assert_eq!(failure, ExitFailure::Killed),
        other => panic!("expected killed runtime error, got {other:?}"),
    }
    assert_eq!(handle.phase(), Phase::Failed);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn exit_reaches_grandchildren_holding_the_pipes() -> TestResult {
    init_tracing();
    let handle = Arc::new(ProcessHandle::new(quiet()));

    // `sh` forks `sleep` here, so the grandchild shares stdout/stderr.
    let runner = {
        let handle = Arc::clone(&handle);
        tokio::spawn(async move { handle.run(&["sleep 30", "echo never"]).await })
    };
    with_timeout(handle.wait_started()).await;

    handle.exit().await;
    let res = with_timeout(runner).await?;

    let err = res.expect_err("killed run must fail");
    assert_eq!(err.exit_failure(), Some(&ExitFailure::Killed));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn output_before_exit_is_kept() -> TestResult {
    init_tracing();
    let recorder = LineRecorder::new();
    let handle = Arc::new(ProcessHandle::new(quiet().on_stdout(recorder.callback())));

    let runner = {
        let handle = Arc::clone(&handle);
        tokio::spawn(async move { handle.run(&["echo ready; sleep 30"]).await })
    };

    // Wait for the first line before cancelling.
    with_timeout(async {
        while recorder.is_empty() {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;

    handle.exit().await;
    let res = with_timeout(runner).await?;

    assert!(res.is_err());
    assert_eq!(handle.stdout_text(), "ready\n");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn exit_after_completion_is_a_no_op() -> TestResult {
    init_tracing();
    let handle = ProcessHandle::new(quiet());
    let out = with_timeout(handle.run(&["echo done"])).await?;

    handle.exit().await;

    assert_eq!(out, "done\n");
    assert_eq!(handle.phase(), Phase::Completed);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn exit_closes_stdin() -> TestResult {
    init_tracing();
    let handle = Arc::new(ProcessHandle::new(quiet()));

    let runner = {
        let handle = Arc::clone(&handle);
        tokio::spawn(async move { handle.run(&["cat"]).await })
    };
    with_timeout(handle.wait_started()).await;

    handle.exit().await;
    assert!(matches!(
        handle.input_text("after exit").await,
        Err(CmdError::ClosedPipe) | Err(CmdError::NotRunning { .. })
    ));

    let _ = with_timeout(runner).await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn exit_does_not_wait_for_a_stalled_stdin_write() -> TestResult {
    init_tracing();
    let handle = Arc::new(ProcessHandle::new(quiet()));

    let runner = {
        let handle = Arc::clone(&handle);
        tokio::spawn(async move { handle.run(&["sleep 30"]).await })
    };
    with_timeout(handle.wait_started()).await;

    // `sleep` never reads stdin, so the pipe fills and the writer parks
    // while holding stdin.
    let writer = {
        let handle = Arc::clone(&handle);
        tokio::spawn(async move {
            let chunk = "x".repeat(4096);
            let mut written = 0usize;
            while handle.input_text(&chunk).await.is_ok() {
                written += 1;
            }
            written
        })
    };
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(!writer.is_finished(), "stdin writer should be parked on a full pipe");

    within(Duration::from_secs(3), handle.exit()).await;
    let res = with_timeout(runner).await?;

    let err = res.expect_err("killed run must fail");
    assert_eq!(err.exit_failure(), Some(&ExitFailure::Killed));

    // The parked write fails once the child is gone.
    let written = with_timeout(writer).await?;
    assert!(written > 0);
    Ok(())
}
