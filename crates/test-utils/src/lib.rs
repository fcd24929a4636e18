//! Shared helpers for `cmdrun` integration tests.

pub mod builders;
pub mod recorder;

use std::future::Future;
use std::sync::OnceLock;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};

/// Deadline applied by [`with_timeout`]. Generous enough for a loaded CI
/// box, short enough that a hung child shows up as a failure.
pub const TEST_DEADLINE: Duration = Duration::from_secs(5);

static TRACING: OnceLock<()> = OnceLock::new();

/// Install a test-writer subscriber once per test binary.
///
/// Reads `CMDRUN_LOG` like the binary does (e.g.
/// `CMDRUN_LOG=cmdrun::exec=debug cargo test`); defaults to `warn`. Output
/// only shows for failing tests unless run with `--nocapture`.
pub fn init_tracing() {
    TRACING.get_or_init(|| {
        let filter = EnvFilter::try_from_env("CMDRUN_LOG")
            .unwrap_or_else(|_| EnvFilter::new("warn"));
        // Another harness may already own the global subscriber.
        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `f`, panicking if it takes longer than [`TEST_DEADLINE`].
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    within(TEST_DEADLINE, f).await
}

/// Await `f`, panicking if it takes longer than `limit`.
pub async fn within<F, T>(limit: Duration, f: F) -> T
where
    F: Future<Output = T>,
{
    match tokio::time::timeout(limit, f).await {
        Ok(value) => value,
        Err(_) => panic!("test future did not finish within {limit:?}"),
    }
}
