// src/session.rs

//! Caller-facing trigger surface.
//!
//! A [`Session`] is created once from the project location resolved at
//! startup. Callers only say *which* pipeline to run; every notification of
//! every launch then arrives on one shared stream, tagged with the launch it
//! belongs to.
//!
//! Launches are independent. Triggering the same pipeline twice, or both
//! pipelines at once, simply yields two launches.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::debug;

use crate::lifecycle::LifecycleEvent;
use crate::orchestrator::{LaunchId, Orchestrator, ProcessHandle};
use crate::pipeline::PipelineKind;
use crate::resolve::ProjectLocation;

/// A notification tagged with its launch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionEvent {
    pub launch: LaunchId,
    pub pipeline: PipelineKind,
    #[serde(flatten)]
    pub event: LifecycleEvent,
}

#[derive(Debug)]
pub struct Session {
    location: ProjectLocation,
    orchestrator: Orchestrator,
    tx: mpsc::UnboundedSender<SessionEvent>,
    launched: AtomicU64,
}

impl Session {
    pub fn new(
        location: ProjectLocation,
        orchestrator: Orchestrator,
    ) -> (Self, mpsc::UnboundedReceiver<SessionEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let session = Self {
            location,
            orchestrator,
            tx,
            launched: AtomicU64::new(0),
        };
        (session, rx)
    }

    pub fn location(&self) -> &ProjectLocation {
        &self.location
    }

    /// Number of launches attempted so far, rejected ones included.
    pub fn launched(&self) -> u64 {
        self.launched.load(Ordering::Relaxed)
    }

    /// Start `pipeline`. Returns immediately; the outcome is reported on the
    /// session stream. Must be called from inside a Tokio runtime.
    ///
    /// A synchronous facility rejection is reported as an `errored` event.
    pub fn trigger(&self, pipeline: PipelineKind) -> LaunchId {
        self.launched.fetch_add(1, Ordering::Relaxed);

        match self.orchestrator.launch_build_pipeline(&self.location, pipeline) {
            Ok(handle) => {
                let id = handle.id();
                tokio::spawn(forward(handle, self.tx.clone()));
                id
            }
            Err(err) => {
                let id = err.launch_id();
                let _ = self.tx.send(SessionEvent {
                    launch: id,
                    pipeline,
                    event: LifecycleEvent::Errored {
                        payload: err.payload().to_string(),
                    },
                });
                id
            }
        }
    }
}

async fn forward(mut handle: ProcessHandle, tx: mpsc::UnboundedSender<SessionEvent>) {
    let launch = handle.id();
    let pipeline = handle.kind();

    while let Some(event) = handle.next_event().await {
        if tx
            .send(SessionEvent {
                launch,
                pipeline,
                event,
            })
            .is_err()
        {
            debug!(launch_id = launch.0, "session stream closed; dropping notifications");
            break;
        }
    }
}
