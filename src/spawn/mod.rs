// src/spawn/mod.rs

//! Contract with the process-spawning facility.
//!
//! The orchestrator never creates OS processes itself. It hands an
//! invocation string plus [`SpawnOptions`] to a [`SpawnFacility`] and then
//! only listens to the [`RawEvent`]s that come back on the returned
//! [`FacilityHandle`].
//!
//! - [`shell`] builds the platform shell argv for shell-mode invocations.
//! - [`facility`] is the real implementation on top of `tokio::process`.
//!
//! Tests provide their own facility that replays scripted events.

use std::fmt::Debug;
use std::path::PathBuf;
use std::process::ExitStatus;

use serde::Serialize;
use tokio::sync::mpsc;

use crate::errors::SpawnRejected;

pub mod facility;
pub mod shell;

pub use facility::TokioSpawnFacility;
pub use shell::{ShellCommand, ShellFamily};

/// Options passed with every spawn call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnOptions {
    /// Let the platform shell interpret the invocation.
    pub shell: bool,
    /// Start the child outside of the caller's process group.
    pub detached: bool,
    /// Initial directory of the child. Passed through unchecked.
    pub cwd: PathBuf,
}

/// How a child terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExitOutcome {
    pub code: Option<i32>,
    pub signal: Option<i32>,
}

impl ExitOutcome {
    pub fn from_code(code: i32) -> Self {
        Self {
            code: Some(code),
            signal: None,
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<ExitStatus> for ExitOutcome {
    fn from(status: ExitStatus) -> Self {
        #[cfg(unix)]
        let signal = {
            use std::os::unix::process::ExitStatusExt;
            status.signal()
        };
        #[cfg(not(unix))]
        let signal = None;

        Self {
            code: status.code(),
            signal,
        }
    }
}

/// Events as the facility emits them, before normalisation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawEvent {
    /// The child has started executing.
    Spawn,
    /// Free-form diagnostic text.
    Message(String),
    /// The facility failed; the payload is its own failure text.
    Error(String),
    /// The channel to the child was lost.
    Disconnect,
    /// The child terminated.
    Exit(ExitOutcome),
    /// The child's stdio is closed; always after `Exit` when both fire.
    Close(ExitOutcome),
}

/// What the facility returns when it accepts a spawn request.
///
/// Accepting the request does not mean the child is running: an OS-level
/// failure still arrives later as [`RawEvent::Error`].
#[derive(Debug)]
pub struct FacilityHandle {
    /// OS process id, when one was assigned.
    pub pid: Option<u32>,
    pub events: mpsc::UnboundedReceiver<RawEvent>,
}

/// Anything that can start processes on behalf of the orchestrator.
pub trait SpawnFacility: Send + Sync + Debug {
    /// Start `invocation`. Must not block on the child.
    ///
    /// Returns `Err` only when the request is refused before any handle
    /// exists (e.g. an empty invocation).
    fn spawn(
        &self,
        invocation: &str,
        options: &SpawnOptions,
    ) -> Result<FacilityHandle, SpawnRejected>;
}
