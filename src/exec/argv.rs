// src/exec/argv.rs

//! Command builder: turns a list of command steps into the concrete argument
//! vector for one platform family.
//!
//! This is a pure function of its inputs so every branch can be tested on
//! any host.

use std::io::{self, Write};
use std::path::Path;

use tracing::debug;

use crate::types::Platform;

/// Command interpreter used on Windows.
pub const WINDOWS_INTERPRETER: &str = "cmd.exe";
/// "Run one command and exit" switch of [`WINDOWS_INTERPRETER`].
pub const WINDOWS_ONE_SHOT: &str = "/C";
/// Step separator inside a `cmd.exe` command line.
pub const WINDOWS_SEPARATOR: &str = " & ";

/// Default shell on every other family.
pub const UNIX_SHELL: &str = "sh";
pub const UNIX_SHELL_FLAG: &str = "-c";
/// Logical AND: a step only runs if the previous one succeeded.
pub const UNIX_SEPARATOR: &str = " && ";

/// Markers bracketing the echoed command when `print_cmd` is on.
pub const PRINT_OPEN: &str = "========>>";
pub const PRINT_CLOSE: &str = "<<=======";

/// Build the argument vector for `tokens`.
///
/// Each token is one shell step. Returns an empty vector when `tokens` is
/// empty.
///
/// - Windows, `shell_wrap`: `["cmd.exe", "/C", "<steps joined with &>"]`.
/// - Windows, no `shell_wrap`: the first step is executed directly and the
///   rest are joined into its single argument.
/// - Elsewhere: `["sh", "-c", "<steps joined with &&>"]`. `shell_wrap` is
///   ignored on this branch.
///
/// `cd_dir`, if given, becomes leading steps that switch into it (on Windows
/// the drive is selected first).
pub fn build_argv<S: AsRef<str>>(
    tokens: &[S],
    platform: Platform,
    shell_wrap: bool,
    cd_dir: Option<&Path>,
) -> Vec<String> {
    if tokens.is_empty() {
        return Vec::new();
    }

    match platform {
        Platform::Windows => build_windows(tokens, shell_wrap, cd_dir),
        Platform::Unix => build_unix(tokens, cd_dir),
    }
}

fn build_windows<S: AsRef<str>>(
    tokens: &[S],
    shell_wrap: bool,
    cd_dir: Option<&Path>,
) -> Vec<String> {
    let mut seq: Vec<String> = Vec::with_capacity(tokens.len() + 4);

    if shell_wrap {
        seq.push(WINDOWS_INTERPRETER.to_string());
        seq.push(WINDOWS_ONE_SHOT.to_string());
    }

    if let Some(dir) = cd_dir {
        let raw = dir.to_string_lossy();
        if let Some(volume) = volume_name(&raw) {
            seq.push(volume.to_string());
        }
        seq.push(format!("cd {}", normalize_dir(&raw)));
    }

    seq.extend(tokens.iter().map(|t| t.as_ref().to_string()));

    // Everything after the program (and `/C`) collapses into one argument.
    let head = if shell_wrap { 2 } else { 1 };
    let rest = seq.split_off(head);
    if !rest.is_empty() {
        seq.push(rest.join(WINDOWS_SEPARATOR));
    }
    seq
}

fn build_unix<S: AsRef<str>>(tokens: &[S], cd_dir: Option<&Path>) -> Vec<String> {
    let mut steps: Vec<String> = Vec::with_capacity(tokens.len() + 1);

    if let Some(dir) = cd_dir {
        steps.push(format!("cd {}", single_quote(&dir.to_string_lossy())));
    }
    steps.extend(tokens.iter().map(|t| t.as_ref().to_string()));

    vec![
        UNIX_SHELL.to_string(),
        UNIX_SHELL_FLAG.to_string(),
        steps.join(UNIX_SEPARATOR),
    ]
}

/// Drive prefix of a Windows path, e.g. `"C:"` for `C:\work`.
pub fn volume_name(path: &str) -> Option<&str> {
    let bytes = path.as_bytes();
    match bytes {
        [letter, b':', ..] if letter.is_ascii_alphabetic() => path.get(..2),
        _ => None,
    }
}

/// Replace `\` separators with the `/` form `cd` accepts.
pub fn normalize_dir(path: &str) -> String {
    path.replace('\\', "/")
}

fn single_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', r"'\''"))
}

/// Human-readable form of an argument vector, used for echoing.
pub fn render_argv(argv: &[String]) -> String {
    argv.join(" ")
}

/// Write `argv` between the print markers, one per line.
pub fn write_argv<W: Write>(out: &mut W, argv: &[String]) -> io::Result<()> {
    writeln!(out, "{PRINT_OPEN}")?;
    writeln!(out, "{}", render_argv(argv))?;
    writeln!(out, "{PRINT_CLOSE}")?;
    out.flush()
}

/// Echo `argv` between the print markers on stdout.
pub fn print_argv(argv: &[String]) {
    if let Err(e) = write_argv(&mut io::stdout().lock(), argv) {
        debug!(error = %e, "failed to echo command line");
    }
}
