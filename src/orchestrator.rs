// src/orchestrator.rs

//! Launching pipelines and observing them.
//!
//! [`Orchestrator::launch`] makes exactly one call into the spawning
//! facility and returns as soon as the facility has accepted (or refused)
//! the request. A background observer task then runs the facility's raw
//! events through a [`Lifecycle`] and forwards the normalised notifications
//! to the returned [`ProcessHandle`].
//!
//! The child itself is never owned here: it is started detached, and
//! dropping a `ProcessHandle` only stops listening to it.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::errors::LaunchError;
use crate::lifecycle::{Lifecycle, LifecycleEvent, ProcessState, TerminalOutcome};
use crate::pipeline::{LaunchRequest, PipelineKind, PipelineSettings};
use crate::resolve::ProjectLocation;
use crate::spawn::{RawEvent, SpawnFacility, SpawnOptions};

/// Identifies one launch for the lifetime of the orchestrator.
///
/// Unrelated to the OS pid and not stable across restarts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct LaunchId(pub u64);

impl fmt::Display for LaunchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

pub struct Orchestrator {
    facility: Arc<dyn SpawnFacility>,
    settings: PipelineSettings,
    next_id: AtomicU64,
}

impl fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Orchestrator")
            .field("facility", &self.facility)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    pub fn new(facility: Arc<dyn SpawnFacility>) -> Self {
        Self::with_settings(facility, PipelineSettings::default())
    }

    pub fn with_settings(facility: Arc<dyn SpawnFacility>, settings: PipelineSettings) -> Self {
        Self {
            facility,
            settings,
            next_id: AtomicU64::new(1),
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Launch `kind` in the pipeline subfolder of `location`.
    pub fn launch_build_pipeline(
        &self,
        location: &ProjectLocation,
        kind: PipelineKind,
    ) -> Result<ProcessHandle, LaunchError> {
        let request = LaunchRequest::for_pipeline(location, kind, &self.settings);
        self.launch(&request)
    }

    /// Hand `request` to the facility and start observing the result.
    ///
    /// Must be called from inside a Tokio runtime. Returns `Err` only when
    /// the facility refuses before producing a handle; every later failure
    /// shows up as an `errored` or `disconnected` event.
    pub fn launch(&self, request: &LaunchRequest) -> Result<ProcessHandle, LaunchError> {
        let id = LaunchId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let options = SpawnOptions {
            shell: request.shell_mode,
            detached: request.detached,
            cwd: PathBuf::from(&request.working_directory),
        };

        info!(
            launch_id = id.0,
            pipeline = %request.kind,
            invocation = %request.invocation,
            cwd = %request.working_directory,
            "launching pipeline"
        );

        let facility_handle = self
            .facility
            .spawn(request.invocation.as_str(), &options)
            .map_err(|rejected| {
                warn!(launch_id = id.0, error = %rejected, "facility rejected spawn");
                LaunchError::Rejected {
                    launch: id,
                    invocation: request.invocation.to_string(),
                    payload: rejected.0,
                }
            })?;

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ProcessState::Spawned);

        // Acceptance by the facility is the `spawned` notification.
        let _ = event_tx.send(LifecycleEvent::Spawned);

        tokio::spawn(observe(id, facility_handle.events, event_tx, state_tx));

        Ok(ProcessHandle {
            id,
            kind: request.kind,
            pid: facility_handle.pid,
            events: event_rx,
            state: state_rx,
        })
    }
}

/// Observer task: owns the facility's event stream until a terminal event.
async fn observe(
    id: LaunchId,
    mut raw_rx: mpsc::UnboundedReceiver<RawEvent>,
    event_tx: mpsc::UnboundedSender<LifecycleEvent>,
    state_tx: watch::Sender<ProcessState>,
) {
    let mut lifecycle = Lifecycle::new();

    while !lifecycle.is_terminal() {
        let next = match raw_rx.recv().await {
            Some(raw) => {
                debug!(launch_id = id.0, ?raw, "facility event");
                lifecycle.apply(raw)
            }
            None => {
                debug!(launch_id = id.0, "facility event stream closed");
                lifecycle.channel_closed()
            }
        };

        state_tx.send_replace(lifecycle.state());

        if let Some(event) = next {
            if event.is_terminal() {
                info!(launch_id = id.0, %event, "launch finished");
            }
            if event_tx.send(event).is_err() {
                debug!(launch_id = id.0, "process handle dropped; still draining");
            }
        }
    }

    debug!(launch_id = id.0, "observer done; releasing facility handle");
}

/// One launch, as seen by its caller.
///
/// Events arrive in facility order: `spawned` first, at most one `running`,
/// any number of `message`s, then exactly one terminal event.
#[derive(Debug)]
pub struct ProcessHandle {
    id: LaunchId,
    kind: PipelineKind,
    pid: Option<u32>,
    events: mpsc::UnboundedReceiver<LifecycleEvent>,
    state: watch::Receiver<ProcessState>,
}

impl ProcessHandle {
    pub fn id(&self) -> LaunchId {
        self.id
    }

    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    /// Latest state seen by the observer. May be ahead of the events not yet
    /// taken with [`ProcessHandle::next_event`].
    pub fn state(&self) -> ProcessState {
        *self.state.borrow()
    }

    /// Next notification, or `None` once the terminal event was delivered.
    pub async fn next_event(&mut self) -> Option<LifecycleEvent> {
        self.events.recv().await
    }

    /// Drain notifications until the terminal one.
    pub async fn wait(mut self) -> TerminalOutcome {
        while let Some(event) = self.events.recv().await {
            if let Some(outcome) = event.terminal_outcome() {
                return outcome;
            }
        }
        // Observer went away without a terminal event (runtime shutdown).
        TerminalOutcome::Disconnected
    }
}
