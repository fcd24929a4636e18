// src/exec/drainer.rs

//! Stream drainer: reads one child stream line by line until it closes.

use encoding_rs::Encoding;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::encoding::normalize_text_with;
use crate::exec::run_config::LineCallback;
use crate::types::{Platform, StreamKind};

/// Lines queued for a callback before its stream's reader waits.
const CALLBACK_QUEUE: usize = 256;

/// Everything a drainer needs besides the stream itself.
#[derive(Clone)]
pub struct DrainSettings {
    pub stream: StreamKind,
    pub platform: Platform,
    pub legacy_encoding: &'static Encoding,
    pub callback: Option<LineCallback>,
}

/// Spawn a drainer task for `reader`.
///
/// The task owns its buffer exclusively and returns it when the stream
/// closes or fails.
pub fn spawn_drainer<R>(reader: R, settings: DrainSettings) -> JoinHandle<String>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(drain(reader, settings))
}

/// Read `reader` to the end, returning the captured text.
///
/// Each line is normalised, handed to the callback, and appended to the
/// buffer followed by exactly one `\n`. A final line without a newline is
/// still emitted. Read errors end the drain; what was captured so far is
/// kept.
///
/// The callback runs on a blocking-pool thread owned by this stream and is
/// done with every line by the time this returns. A callback that blocks
/// holds up this stream only.
pub async fn drain<R>(reader: R, settings: DrainSettings) -> String
where
    R: AsyncRead + Unpin,
{
    let DrainSettings {
        stream,
        platform,
        legacy_encoding,
        callback,
    } = settings;

    let mut reader = BufReader::new(reader);
    let mut captured = String::new();
    let mut raw = Vec::new();
    let mut lines = 0usize;

    let (mut line_tx, dispatcher) = match callback {
        Some(cb) => {
            let (tx, rx) = mpsc::channel(CALLBACK_QUEUE);
            (Some(tx), Some(spawn_dispatcher(rx, cb)))
        }
        None => (None, None),
    };

    loop {
        raw.clear();
        match reader.read_until(b'\n', &mut raw).await {
            Ok(0) => break,
            Ok(_) => {
                let text = normalize_text_with(trim_line_ending(&raw), platform, legacy_encoding);
                debug!(%stream, "{}", text);

                captured.push_str(&text);
                captured.push('\n');
                lines += 1;

                if let Some(tx) = &line_tx
                    && tx.send(text).await.is_err()
                {
                    warn!(%stream, "line callback stopped; no further lines are delivered");
                    line_tx = None;
                }
            }
            Err(e) => {
                warn!(%stream, error = %e, "read error; stopping drain");
                break;
            }
        }
    }

    drop(line_tx);
    if let Some(dispatcher) = dispatcher
        && let Err(e) = dispatcher.await
    {
        warn!(%stream, error = %e, "line callback panicked");
    }

    debug!(%stream, lines, "drain finished");
    captured
}

/// Feed queued lines to `callback` on a dedicated blocking thread until the
/// sender is dropped.
fn spawn_dispatcher(mut rx: mpsc::Receiver<String>, callback: LineCallback) -> JoinHandle<()> {
    tokio::task::spawn_blocking(move || {
        while let Some(line) = rx.blocking_recv() {
            callback(&line);
        }
    })
}

/// Strip a trailing `\n` and then a trailing `\r`.
fn trim_line_ending(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
