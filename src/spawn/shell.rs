// src/spawn/shell.rs

//! Shell argv construction.

use std::ffi::OsString;
use std::process::Command as StdCommand;

use crate::resolve::PathStyle;

/// Program plus arguments for one shell-interpreted invocation.
///
/// For `cmd` the invocation is wrapped in quotes and passed verbatim after
/// `/d /s /c`, so `cmd.exe` strips exactly the outer pair and leaves inner
/// quoting alone. Every other shell gets `-c <invocation>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    pub program: String,
    pub args: Vec<String>,
    /// Whether `args` must be appended without any escaping.
    pub verbatim: bool,
}

/// Argument convention of a shell program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFamily {
    Cmd,
    Posix,
}

impl ShellFamily {
    /// Family of `program`, judged by its file name. `C:\Windows\cmd.exe`
    /// and `CMD` are `Cmd`; `bash.exe`, `/bin/sh` or `pwsh` are `Posix`.
    pub fn of(program: &str) -> Self {
        let name = program
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(program)
            .to_ascii_lowercase();
        let stem = name.strip_suffix(".exe").unwrap_or(&name);
        if stem == "cmd" {
            ShellFamily::Cmd
        } else {
            ShellFamily::Posix
        }
    }
}

impl ShellCommand {
    /// The host's default shell is picked by `style`; an override brings
    /// its own argument convention.
    pub fn new(invocation: &str, style: PathStyle, shell_override: Option<&str>) -> Self {
        let program = shell_override.unwrap_or(match style {
            PathStyle::Windows => "cmd.exe",
            PathStyle::Posix => "/bin/sh",
        });

        match ShellFamily::of(program) {
            ShellFamily::Cmd => Self {
                program: program.to_string(),
                args: vec![
                    "/d".to_string(),
                    "/s".to_string(),
                    "/c".to_string(),
                    format!("\"{invocation}\""),
                ],
                verbatim: true,
            },
            ShellFamily::Posix => Self {
                program: program.to_string(),
                args: vec!["-c".to_string(), invocation.to_string()],
                verbatim: false,
            },
        }
    }

    /// Run `invocation` as a program with no shell in between.
    pub fn direct(invocation: &str) -> Self {
        Self {
            program: invocation.to_string(),
            args: Vec::new(),
            verbatim: false,
        }
    }

    pub fn to_std_command(&self) -> StdCommand {
        let mut cmd = StdCommand::new(&self.program);
        if self.verbatim {
            append_verbatim(&mut cmd, &self.args);
        } else {
            cmd.args(&self.args);
        }
        cmd
    }
}

#[cfg(windows)]
fn append_verbatim(cmd: &mut StdCommand, args: &[String]) {
    use std::os::windows::process::CommandExt;
    for arg in args {
        cmd.raw_arg(OsString::from(arg));
    }
}

#[cfg(not(windows))]
fn append_verbatim(cmd: &mut StdCommand, args: &[String]) {
    cmd.args(args.iter().map(OsString::from));
}
