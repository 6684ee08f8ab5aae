// src/lifecycle.rs

//! Pure lifecycle state machine for one launch.
//!
//! Raw facility events go in, normalised [`LifecycleEvent`]s come out. No
//! channels, no Tokio, no IO: the orchestrator's observer task is the async
//! shell around this.
//!
//! Exactly one terminal event (`exited`, `disconnected` or `errored`) is ever
//! produced. Once it has been, every further input is dropped.

use std::fmt;

use serde::Serialize;
use tracing::debug;

use crate::spawn::{ExitOutcome, RawEvent};

/// Observed state of a launched process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessState {
    Spawned,
    Running,
    Disconnected,
    Errored,
    Exited,
}

impl ProcessState {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ProcessState::Disconnected | ProcessState::Errored | ProcessState::Exited
        )
    }
}

/// Normalised notification delivered to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
pub enum LifecycleEvent {
    Spawned,
    Running,
    Message { text: String },
    Exited(ExitOutcome),
    Disconnected,
    Errored { payload: String },
}

impl LifecycleEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            LifecycleEvent::Exited(_)
                | LifecycleEvent::Disconnected
                | LifecycleEvent::Errored { .. }
        )
    }

    /// The terminal outcome this event represents, if any.
    pub fn terminal_outcome(&self) -> Option<TerminalOutcome> {
        match self {
            LifecycleEvent::Exited(outcome) => Some(TerminalOutcome::Exited(*outcome)),
            LifecycleEvent::Disconnected => Some(TerminalOutcome::Disconnected),
            LifecycleEvent::Errored { payload } => Some(TerminalOutcome::Errored(payload.clone())),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            LifecycleEvent::Spawned => "spawned",
            LifecycleEvent::Running => "running",
            LifecycleEvent::Message { .. } => "message",
            LifecycleEvent::Exited(_) => "exited",
            LifecycleEvent::Disconnected => "disconnected",
            LifecycleEvent::Errored { .. } => "errored",
        }
    }
}

impl fmt::Display for LifecycleEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleEvent::Message { text } => write!(f, "message: {text}"),
            LifecycleEvent::Exited(outcome) => match (outcome.code, outcome.signal) {
                (Some(code), _) => write!(f, "exited with code {code}"),
                (None, Some(sig)) => write!(f, "exited by signal {sig}"),
                (None, None) => f.write_str("exited"),
            },
            LifecycleEvent::Errored { payload } => write!(f, "errored: {payload}"),
            other => f.write_str(other.name()),
        }
    }
}

/// How a launch ended.
///
/// A non-zero exit code is still `Exited`; it is up to the caller to decide
/// whether that counts as failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalOutcome {
    Exited(ExitOutcome),
    Disconnected,
    Errored(String),
}

impl TerminalOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, TerminalOutcome::Exited(outcome) if outcome.success())
    }
}

/// State machine for one launch, starting in `Spawned`.
#[derive(Debug, Clone)]
pub struct Lifecycle {
    state: ProcessState,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: ProcessState::Spawned,
        }
    }

    pub fn state(&self) -> ProcessState {
        self.state
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_terminal()
    }

    /// Feed one raw facility event; returns the notification to deliver, if
    /// any.
    pub fn apply(&mut self, raw: RawEvent) -> Option<LifecycleEvent> {
        if self.is_terminal() {
            debug!(state = ?self.state, ?raw, "ignoring event after terminal state");
            return None;
        }

        match raw {
            RawEvent::Spawn => match self.state {
                ProcessState::Spawned => {
                    self.state = ProcessState::Running;
                    Some(LifecycleEvent::Running)
                }
                _ => {
                    debug!(state = ?self.state, "duplicate spawn event");
                    None
                }
            },
            RawEvent::Message(text) => Some(LifecycleEvent::Message { text }),
            RawEvent::Error(payload) => match self.state {
                ProcessState::Spawned => {
                    self.state = ProcessState::Errored;
                    Some(LifecycleEvent::Errored { payload })
                }
                // The child is already executing; this is a secondary
                // facility failure and does not end the launch.
                _ => Some(LifecycleEvent::Message { text: payload }),
            },
            RawEvent::Disconnect => {
                self.state = ProcessState::Disconnected;
                Some(LifecycleEvent::Disconnected)
            }
            RawEvent::Exit(outcome) | RawEvent::Close(outcome) => {
                self.state = ProcessState::Exited;
                Some(LifecycleEvent::Exited(outcome))
            }
        }
    }

    /// The facility's event stream ended. Without a terminal event that means
    /// the channel to the child was lost.
    pub fn channel_closed(&mut self) -> Option<LifecycleEvent> {
        if self.is_terminal() {
            return None;
        }
        self.state = ProcessState::Disconnected;
        Some(LifecycleEvent::Disconnected)
    }
}
