use std::path::Path;

use cmdrun::Platform;
use cmdrun::exec::argv::{
    PRINT_CLOSE, PRINT_OPEN, build_argv, normalize_dir, render_argv, volume_name, write_argv,
};

#[test]
fn windows_shell_wrap_prefixes_interpreter_and_joins_with_ampersand() {
    let argv = build_argv(&["dir", "echo done"], Platform::Windows, true, None);
    assert_eq!(argv, vec!["cmd.exe", "/C", "dir & echo done"]);
}

#[test]
fn windows_shell_wrap_with_cd_switches_drive_first() {
    let argv = build_argv(
        &["build.bat"],
        Platform::Windows,
        true,
        Some(Path::new(r"D:\work\proj")),
    );
    assert_eq!(argv, vec!["cmd.exe", "/C", "D: & cd D:/work/proj & build.bat"]);
}

#[test]
fn windows_cd_without_drive_skips_volume_step() {
    let argv = build_argv(
        &["make"],
        Platform::Windows,
        true,
        Some(Path::new(r"relative\dir")),
    );
    assert_eq!(argv, vec!["cmd.exe", "/C", "cd relative/dir & make"]);
}

#[test]
fn windows_without_shell_wrap_executes_first_step_directly() {
    let argv = build_argv(&["git.exe", "status", "log"], Platform::Windows, false, None);
    assert_eq!(argv, vec!["git.exe", "status & log"]);
}

#[test]
fn windows_without_shell_wrap_single_step_has_no_argument() {
    let argv = build_argv(&["notepad.exe"], Platform::Windows, false, None);
    assert_eq!(argv, vec!["notepad.exe"]);
}

#[test]
fn windows_without_shell_wrap_keeps_literal_cd_sequence() {
    let argv = build_argv(
        &["run.exe"],
        Platform::Windows,
        false,
        Some(Path::new(r"C:\tmp")),
    );
    assert_eq!(argv, vec!["C:", "cd C:/tmp & run.exe"]);
}

#[test]
fn unix_joins_steps_with_logical_and() {
    let argv = build_argv(&["make", "make test"], Platform::Unix, true, None);
    assert_eq!(argv, vec!["sh", "-c", "make && make test"]);
}

#[test]
fn unix_ignores_shell_wrap_flag() {
    let wrapped = build_argv(&["ls -la"], Platform::Unix, true, None);
    let unwrapped = build_argv(&["ls -la"], Platform::Unix, false, None);
    assert_eq!(wrapped, unwrapped);
}

#[test]
fn unix_cd_is_quoted_leading_step() {
    let argv = build_argv(
        &["pwd"],
        Platform::Unix,
        true,
        Some(Path::new("/tmp/it's here")),
    );
    assert_eq!(argv, vec!["sh", "-c", r"cd '/tmp/it'\''s here' && pwd"]);
}

#[test]
fn empty_tokens_build_nothing() {
    let none: [&str; 0] = [];
    assert!(build_argv(&none, Platform::Windows, true, None).is_empty());
    assert!(build_argv(&none, Platform::Unix, true, Some(Path::new("/tmp"))).is_empty());
}

#[test]
fn volume_name_only_matches_drive_letters() {
    assert_eq!(volume_name(r"C:\Users"), Some("C:"));
    assert_eq!(volume_name("z:"), Some("z:"));
    assert_eq!(volume_name(r"\\server\share"), None);
    assert_eq!(volume_name("/usr/bin"), None);
    assert_eq!(volume_name("1:"), None);
}

#[test]
fn normalize_dir_uses_forward_slashes() {
    assert_eq!(normalize_dir(r"C:\a\b\c"), "C:/a/b/c");
    assert_eq!(normalize_dir("/already/fine"), "/already/fine");
}

#[test]
fn render_joins_with_spaces() {
    let argv = build_argv(&["echo hi"], Platform::Unix, true, None);
    assert_eq!(render_argv(&argv), "sh -c echo hi");
}

#[test]
fn echoed_command_is_bracketed_by_markers() {
    let argv = build_argv(&["make all", "make test"], Platform::Unix, true, None);
    let mut out = Vec::new();

    write_argv(&mut out, &argv).unwrap();

    assert_eq!(
        String::from_utf8(out).unwrap(),
        "========>>\nsh -c make all && make test\n<<=======\n"
    );
    assert_eq!((PRINT_OPEN, PRINT_CLOSE), ("========>>", "<<======="));
}
