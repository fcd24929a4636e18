// src/encoding.rs

//! Best-effort text normalisation for lines read from a child process.
//!
//! Policy: never fail the caller. A line that is valid UTF-8 passes through
//! untouched. On Windows a non-UTF-8 line is reinterpreted in the legacy
//! codepage (GBK unless configured otherwise) and transcoded; when the line is
//! not valid in that codepage, the charset `chardetng` guesses is tried next.
//! Anything that still cannot be decoded degrades to a lossy UTF-8 view of the
//! original bytes.

use std::borrow::Cow;

use chardetng::EncodingDetector;
use encoding_rs::{Encoding, GBK, UTF_8};
use thiserror::Error;
use tracing::debug;

use crate::types::Platform;

/// Failure to reinterpret a line in a legacy codepage.
///
/// Only ever logged; `normalize_text` falls back to pass-through.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("line is not valid {encoding}")]
    Malformed { encoding: &'static str },
}

/// Codepage assumed for non-UTF-8 output on Windows hosts.
pub fn default_legacy_encoding() -> &'static Encoding {
    GBK
}

/// Guess the charset of `bytes`.
///
/// Valid UTF-8 (including plain ASCII) always reports `UTF-8`; everything
/// else goes through `chardetng`.
pub fn detect_charset(bytes: &[u8]) -> &'static Encoding {
    if std::str::from_utf8(bytes).is_ok() {
        return UTF_8;
    }
    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    detector.guess(None, true)
}

/// Decode `bytes` strictly as `encoding`.
pub fn transcode(bytes: &[u8], encoding: &'static Encoding) -> Result<String, DecodeError> {
    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .map(Cow::into_owned)
        .ok_or(DecodeError::Malformed {
            encoding: encoding.name(),
        })
}

/// Normalise one line of child output to UTF-8 using the default legacy
/// codepage.
pub fn normalize_text(bytes: &[u8], platform: Platform) -> String {
    normalize_text_with(bytes, platform, default_legacy_encoding())
}

/// Normalise one line of child output to UTF-8.
///
/// On Windows a non-UTF-8 line is decoded in `legacy`; if that fails the
/// `chardetng` guess gets one attempt before the lossy fallback.
pub fn normalize_text_with(bytes: &[u8], platform: Platform, legacy: &'static Encoding) -> String {
    if !platform.is_windows() || std::str::from_utf8(bytes).is_ok() {
        return String::from_utf8_lossy(bytes).into_owned();
    }

    let err = match transcode(bytes, legacy) {
        Ok(text) => return text,
        Err(err) => err,
    };

    let detected = detect_charset(bytes);
    if detected != legacy
        && detected != UTF_8
        && let Ok(text) = transcode(bytes, detected)
    {
        debug!(
            legacy = legacy.name(),
            detected = detected.name(),
            "line decoded with detected charset"
        );
        return text;
    }

    debug!(
        detected = detected.name(),
        error = %err,
        "legacy codepage decode failed; passing line through"
    );
    String::from_utf8_lossy(bytes).into_owned()
}
