use std::sync::{Arc, Mutex};

/// Collects the lines a stream callback receives, in order.
#[derive(Clone, Default)]
pub struct LineRecorder {
    lines: Arc<Mutex<Vec<String>>>,
}

impl LineRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback suitable for `RunConfig::on_stdout` / `on_stderr`.
    pub fn callback(&self) -> impl Fn(&str) + Send + Sync + 'static {
        let lines = Arc::clone(&self.lines);
        move |line: &str| {
            lines.lock().unwrap().push(line.to_string());
        }
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.lines.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
