// tests/shell_command.rs

use worldlaunch::resolve::PathStyle;
use worldlaunch::spawn::{ShellCommand, ShellFamily};

#[test]
fn posix_uses_sh_dash_c() {
    let cmd = ShellCommand::new("cargo run load draw", PathStyle::Posix, None);

    assert_eq!(cmd.program, "/bin/sh");
    assert_eq!(cmd.args, vec!["-c", "cargo run load draw"]);
    assert!(!cmd.verbatim);
}

#[test]
fn windows_wraps_invocation_for_cmd_s_switch() {
    let cmd = ShellCommand::new(r#"tool "a b" c"#, PathStyle::Windows, None);

    assert_eq!(cmd.program, "cmd.exe");
    assert_eq!(cmd.args, vec!["/d", "/s", "/c", r#""tool "a b" c""#]);
    assert!(cmd.verbatim);
}

#[test]
fn override_replaces_only_the_program() {
    let cmd = ShellCommand::new("exit 0", PathStyle::Posix, Some("/bin/bash"));

    assert_eq!(cmd.program, "/bin/bash");
    assert_eq!(cmd.args, vec!["-c", "exit 0"]);
}

#[test]
fn bash_override_on_windows_gets_dash_c() {
    let cmd = ShellCommand::new(
        "./build.sh",
        PathStyle::Windows,
        Some(r"C:\Program Files\Git\bin\bash.exe"),
    );

    assert_eq!(cmd.program, r"C:\Program Files\Git\bin\bash.exe");
    assert_eq!(cmd.args, vec!["-c", "./build.sh"]);
    assert!(!cmd.verbatim);
}

#[test]
fn cmd_override_keeps_cmd_switches_on_any_host() {
    let cmd = ShellCommand::new("build-and-draw.bat", PathStyle::Posix, Some("CMD.EXE"));

    assert_eq!(cmd.args, vec!["/d", "/s", "/c", "\"build-and-draw.bat\""]);
    assert!(cmd.verbatim);
}

#[test]
fn shell_family_is_judged_by_file_name() {
    assert_eq!(ShellFamily::of(r"C:\Windows\System32\cmd.exe"), ShellFamily::Cmd);
    assert_eq!(ShellFamily::of("cmd"), ShellFamily::Cmd);
    assert_eq!(ShellFamily::of("/usr/bin/bash"), ShellFamily::Posix);
    assert_eq!(ShellFamily::of("pwsh.exe"), ShellFamily::Posix);
    assert_eq!(ShellFamily::of("/opt/cmdtools/sh"), ShellFamily::Posix);
}

#[test]
fn direct_mode_has_no_shell() {
    let cmd = ShellCommand::direct("build-and-draw.bat");

    assert_eq!(cmd.program, "build-and-draw.bat");
    assert!(cmd.args.is_empty());
}

#[test]
fn std_command_carries_program_and_args() {
    let cmd = ShellCommand::new("echo hi", PathStyle::Posix, None).to_std_command();

    assert_eq!(cmd.get_program(), "/bin/sh");
    let args: Vec<_> = cmd.get_args().collect();
    assert_eq!(args, vec!["-c", "echo hi"]);
}
