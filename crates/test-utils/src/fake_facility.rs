use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;
use worldlaunch::errors::SpawnRejected;
use worldlaunch::spawn::{ExitOutcome, FacilityHandle, RawEvent, SpawnFacility, SpawnOptions};

/// One recorded call into the facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnCall {
    pub invocation: String,
    pub options: SpawnOptions,
}

/// What the next spawn call should do.
#[derive(Debug)]
pub enum Script {
    /// Emit these events, then close the stream.
    Events(Vec<RawEvent>),
    /// Refuse synchronously with this payload.
    Reject(String),
    /// Forward whatever the test sends on the paired sender.
    Channel(mpsc::UnboundedReceiver<RawEvent>),
}

/// A spawning facility that never touches the OS.
///
/// - records every spawn call
/// - plays back queued [`Script`]s in order
/// - with nothing queued, behaves like a child that starts and exits 0.
#[derive(Debug, Default)]
pub struct FakeFacility {
    scripts: Mutex<VecDeque<Script>>,
    calls: Arc<Mutex<Vec<SpawnCall>>>,
}

impl FakeFacility {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_events(&self, events: Vec<RawEvent>) -> &Self {
        self.scripts.lock().unwrap().push_back(Script::Events(events));
        self
    }

    pub fn push_reject(&self, payload: &str) -> &Self {
        self.scripts
            .lock()
            .unwrap()
            .push_back(Script::Reject(payload.to_string()));
        self
    }

    /// Queue a launch driven by the test; returns the sending side.
    pub fn push_channel(&self) -> mpsc::UnboundedSender<RawEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.scripts.lock().unwrap().push_back(Script::Channel(rx));
        tx
    }

    pub fn calls(&self) -> Vec<SpawnCall> {
        self.calls.lock().unwrap().clone()
    }
}

/// The usual successful lifecycle of a child exiting with `code`.
pub fn exits_with(code: i32) -> Vec<RawEvent> {
    let outcome = ExitOutcome::from_code(code);
    vec![RawEvent::Spawn, RawEvent::Exit(outcome), RawEvent::Close(outcome)]
}

impl SpawnFacility for FakeFacility {
    fn spawn(
        &self,
        invocation: &str,
        options: &SpawnOptions,
    ) -> Result<FacilityHandle, SpawnRejected> {
        self.calls.lock().unwrap().push(SpawnCall {
            invocation: invocation.to_string(),
            options: options.clone(),
        });

        let script = self
            .scripts
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Script::Events(exits_with(0)));

        match script {
            Script::Reject(payload) => Err(SpawnRejected(payload)),
            Script::Channel(events) => Ok(FacilityHandle { pid: None, events }),
            Script::Events(events) => {
                let (tx, rx) = mpsc::unbounded_channel();
                for event in events {
                    let _ = tx.send(event);
                }
                Ok(FacilityHandle {
                    pid: Some(4242),
                    events: rx,
                })
            }
        }
    }
}
