#![allow(dead_code)]

pub use cmdrun_test_utils::recorder::LineRecorder;
pub use cmdrun_test_utils::{init_tracing, with_timeout, within};

use cmdrun::exec::RunConfig;

/// Host-platform config that does not echo the command line.
pub fn quiet() -> RunConfig {
    RunConfig::new().print_cmd(false)
}
