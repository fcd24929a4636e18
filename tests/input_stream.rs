#![cfg(unix)]

mod common;
use crate::common::{init_tracing, quiet, with_timeout};

use std::sync::Arc;

use cmdrun::errors::CmdError;
use cmdrun::exec::ProcessHandle;
use cmdrun::types::Phase;

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::test(flavor = "multi_thread")]
async fn lines_written_before_close_reach_the_child_in_order() -> TestResult {
    init_tracing();
    let handle = Arc::new(ProcessHandle::new(quiet()));

    let runner = {
        let handle = Arc::clone(&handle);
        tokio::spawn(async move { handle.run(&["cat"]).await })
    };

    let phase = with_timeout(handle.wait_started()).await;
    assert!(matches!(phase, Phase::Launched | Phase::Running));

    for line in ["alpha", "beta", "gamma"] {
        handle.input_text(line).await?;
    }
    handle.close().await?;

    let out = with_timeout(runner).await??;
    assert_eq!(out, "alpha\nbeta\ngamma\n");
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn close_twice_reports_closed_pipe() -> TestResult {
    init_tracing();
    let handle = Arc::new(ProcessHandle::new(quiet()));

    let runner = {
        let handle = Arc::clone(&handle);
        tokio::spawn(async move { handle.run(&["cat > /dev/null"]).await })
    };
    with_timeout(handle.wait_started()).await;

    assert!(handle.close().await.is_ok());
    assert!(matches!(handle.close().await, Err(CmdError::ClosedPipe)));
    assert!(matches!(
        handle.input_text("late").await,
        Err(CmdError::ClosedPipe)
    ));

    with_timeout(runner).await??;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn input_after_completion_is_rejected() -> TestResult {
    init_tracing();
    let handle = ProcessHandle::new(quiet());
    with_timeout(handle.run(&["true"])).await?;

    assert!(matches!(
        handle.input_text("too late").await,
        Err(CmdError::NotRunning {
            phase: Phase::Completed
        })
    ));
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn child_can_answer_input_line_by_line() -> TestResult {
    init_tracing();
    let handle = Arc::new(ProcessHandle::new(quiet()));

    let runner = {
        let handle = Arc::clone(&handle);
        tokio::spawn(async move {
            handle
                .run(&["while read -r name; do echo \"hi $name\"; done"])
                .await
        })
    };
    with_timeout(handle.wait_started()).await;

    handle.input_text("ada").await?;
    handle.input_text("grace").await?;
    handle.close().await?;

    let out = with_timeout(runner).await??;
    assert_eq!(out, "hi ada\nhi grace\n");
    Ok(())
}
