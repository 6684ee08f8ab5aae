// src/errors.rs

//! Crate-wide error types.

use thiserror::Error;

use crate::orchestrator::LaunchId;

/// Synchronous refusal by the spawning facility, before any handle exists.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct SpawnRejected(pub String);

/// Failure of a launch call itself.
///
/// Everything that happens after the facility accepted the request is
/// reported as lifecycle events instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchError {
    #[error("launch {launch}: spawn of '{invocation}' rejected: {payload}")]
    Rejected {
        launch: LaunchId,
        invocation: String,
        payload: String,
    },
}

impl LaunchError {
    pub fn launch_id(&self) -> LaunchId {
        match self {
            LaunchError::Rejected { launch, .. } => *launch,
        }
    }

    /// Synchronous rejections count as spawn failures, same as an `errored`
    /// event would.
    pub fn is_spawn_failure(&self) -> bool {
        matches!(self, LaunchError::Rejected { .. })
    }

    /// The facility's failure text, untouched.
    pub fn payload(&self) -> &str {
        match self {
            LaunchError::Rejected { payload, .. } => payload,
        }
    }
}

#[derive(Error, Debug)]
pub enum WorldlaunchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("project root not found: no '{marker}' segment in '{anchor}'")]
    ProjectNotFound { anchor: String, marker: String },

    #[error(transparent)]
    Launch(#[from] LaunchError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, WorldlaunchError>;
