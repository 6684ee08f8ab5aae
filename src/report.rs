// src/report.rs

//! Rendering of session notifications for the terminal.

use std::collections::BTreeMap;

use crate::lifecycle::TerminalOutcome;
use crate::orchestrator::LaunchId;
use crate::pipeline::PipelineKind;
use crate::session::SessionEvent;

/// Output format of the launch report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Human,
    JsonLines,
}

impl ReportFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            ReportFormat::JsonLines
        } else {
            ReportFormat::Human
        }
    }

    pub fn render(self, event: &SessionEvent) -> anyhow::Result<String> {
        match self {
            ReportFormat::Human => Ok(format!(
                "[{} {}] {}",
                event.launch, event.pipeline, event.event
            )),
            ReportFormat::JsonLines => Ok(serde_json::to_string(event)?),
        }
    }
}

/// Terminal outcomes collected while following a session.
#[derive(Debug, Default)]
pub struct RunSummary {
    outcomes: BTreeMap<LaunchId, (PipelineKind, TerminalOutcome)>,
}

impl RunSummary {
    /// Record `event` if it is terminal. Returns true when it was.
    pub fn record(&mut self, event: &SessionEvent) -> bool {
        match event.event.terminal_outcome() {
            Some(outcome) => {
                self.outcomes.insert(event.launch, (event.pipeline, outcome));
                true
            }
            None => false,
        }
    }

    pub fn finished(&self) -> usize {
        self.outcomes.len()
    }

    pub fn outcome_of(&self, launch: LaunchId) -> Option<&TerminalOutcome> {
        self.outcomes.get(&launch).map(|(_, outcome)| outcome)
    }

    /// True when every recorded launch exited with status 0.
    pub fn all_succeeded(&self) -> bool {
        self.outcomes
            .values()
            .all(|(_, outcome)| outcome.is_success())
    }
}
