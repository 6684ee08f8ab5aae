// src/spawn/facility.rs

//! Real spawning facility backed by `tokio::process`.

use std::process::Stdio;

use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::errors::SpawnRejected;
use crate::resolve::PathStyle;
use crate::spawn::{ExitOutcome, FacilityHandle, RawEvent, ShellCommand, SpawnFacility, SpawnOptions};

#[cfg(windows)]
const DETACHED_PROCESS: u32 = 0x0000_0008;
#[cfg(windows)]
const CREATE_NEW_PROCESS_GROUP: u32 = 0x0000_0200;

/// Starts children with `tokio::process` and reports on them.
///
/// - An OS-level spawn failure (bad cwd, missing shell, permissions) is not
///   returned from [`SpawnFacility::spawn`]; it arrives as a single
///   [`RawEvent::Error`] on the handle.
/// - A started child yields `Spawn`, then `Exit` + `Close` once it ends.
/// - Children are never killed when their handle goes away.
///
/// Must be used from inside a Tokio runtime.
#[derive(Debug, Clone, Default)]
pub struct TokioSpawnFacility {
    shell: Option<String>,
}

impl TokioSpawnFacility {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `shell` instead of the platform default (`/bin/sh` / `cmd.exe`).
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: Some(shell.into()),
        }
    }

    fn build_command(&self, invocation: &str, options: &SpawnOptions) -> (String, Command) {
        let shell_cmd = if options.shell {
            ShellCommand::new(invocation, PathStyle::native(), self.shell.as_deref())
        } else {
            ShellCommand::direct(invocation)
        };

        let mut std_cmd = shell_cmd.to_std_command();
        std_cmd
            .current_dir(&options.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        if options.detached {
            detach(&mut std_cmd);
        }

        let mut cmd = Command::from(std_cmd);
        cmd.kill_on_drop(false);
        (shell_cmd.program, cmd)
    }
}

impl SpawnFacility for TokioSpawnFacility {
    fn spawn(
        &self,
        invocation: &str,
        options: &SpawnOptions,
    ) -> Result<FacilityHandle, SpawnRejected> {
        check_arguments(invocation, options)?;

        let (tx, rx) = mpsc::unbounded_channel();
        let (program, mut cmd) = self.build_command(invocation, options);

        match cmd.spawn() {
            Ok(child) => {
                let pid = child.id();
                info!(?pid, %program, cwd = %options.cwd.display(), "child process started");
                let _ = tx.send(RawEvent::Spawn);
                tokio::spawn(watch_child(child, tx));
                Ok(FacilityHandle { pid, events: rx })
            }
            Err(err) => {
                warn!(%program, cwd = %options.cwd.display(), error = %err, "spawn failed");
                let _ = tx.send(RawEvent::Error(format!("spawn {program}: {err}")));
                Ok(FacilityHandle { pid: None, events: rx })
            }
        }
    }
}

fn check_arguments(invocation: &str, options: &SpawnOptions) -> Result<(), SpawnRejected> {
    if invocation.trim().is_empty() {
        return Err(SpawnRejected(
            "the invocation must be a non-empty string".to_string(),
        ));
    }
    if invocation.contains('\0') {
        return Err(SpawnRejected(
            "the invocation must not contain null bytes".to_string(),
        ));
    }
    if options.cwd.to_string_lossy().contains('\0') {
        return Err(SpawnRejected(
            "the working directory must not contain null bytes".to_string(),
        ));
    }
    Ok(())
}

#[cfg(unix)]
fn detach(cmd: &mut std::process::Command) {
    use std::os::unix::process::CommandExt;
    cmd.process_group(0);
}

#[cfg(windows)]
fn detach(cmd: &mut std::process::Command) {
    use std::os::windows::process::CommandExt;
    cmd.creation_flags(DETACHED_PROCESS | CREATE_NEW_PROCESS_GROUP);
}

#[cfg(not(any(unix, windows)))]
fn detach(_cmd: &mut std::process::Command) {}

/// Wait for the child and report how it ended.
async fn watch_child(mut child: Child, tx: mpsc::UnboundedSender<RawEvent>) {
    match child.wait().await {
        Ok(status) => {
            let outcome = ExitOutcome::from(status);
            debug!(pid = ?child.id(), ?outcome, "child process exited");
            let _ = tx.send(RawEvent::Exit(outcome));
            let _ = tx.send(RawEvent::Close(outcome));
        }
        Err(err) => {
            warn!(error = %err, "lost track of child process");
            let _ = tx.send(RawEvent::Message(format!("wait failed: {err}")));
            let _ = tx.send(RawEvent::Disconnect);
        }
    }
}
