// src/pipeline.rs

//! What to run, and where.
//!
//! A [`LaunchRequest`] is derived from a resolved [`ProjectLocation`] and a
//! [`PipelineKind`]. The working directory is always the pipeline subfolder
//! directly under the project root.

use std::fmt;

use clap::ValueEnum;
use serde::Serialize;

use crate::resolve::ProjectLocation;

pub const DEFAULT_MARKER: &str = "world-ui";
pub const DEFAULT_SUBFOLDER: &str = "world";
pub const DEFAULT_BUILD_SCRIPT: &str = "build-and-draw.bat";
pub const DEFAULT_LOAD_AND_RENDER: &str = "cargo run load draw";

/// The two pipelines the launcher knows how to start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PipelineKind {
    /// Run the build script found in the pipeline subfolder.
    Build,
    /// Run the load-and-render command line.
    LoadAndRender,
}

impl PipelineKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PipelineKind::Build => "build",
            PipelineKind::LoadAndRender => "load-and-render",
        }
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The string handed to the shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// A script file name, found by the shell relative to the working
    /// directory.
    Script(String),
    /// A full command line with its arguments.
    Command(String),
}

impl Invocation {
    pub fn as_str(&self) -> &str {
        match self {
            Invocation::Script(s) | Invocation::Command(s) => s,
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names that define the on-disk pipeline layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub subfolder: String,
    pub build_script: String,
    pub load_and_render: String,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            subfolder: DEFAULT_SUBFOLDER.to_string(),
            build_script: DEFAULT_BUILD_SCRIPT.to_string(),
            load_and_render: DEFAULT_LOAD_AND_RENDER.to_string(),
        }
    }
}

impl PipelineSettings {
    pub fn invocation_for(&self, kind: PipelineKind) -> Invocation {
        match kind {
            PipelineKind::Build => Invocation::Script(self.build_script.clone()),
            PipelineKind::LoadAndRender => Invocation::Command(self.load_and_render.clone()),
        }
    }

    pub fn working_directory(&self, location: &ProjectLocation) -> String {
        location.join(&self.subfolder)
    }
}

/// One subprocess invocation, built right before launching it.
///
/// `working_directory` is not checked for existence here; that is left to
/// the spawning facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchRequest {
    pub kind: PipelineKind,
    pub working_directory: String,
    pub invocation: Invocation,
    pub shell_mode: bool,
    pub detached: bool,
}

impl LaunchRequest {
    pub fn for_pipeline(
        location: &ProjectLocation,
        kind: PipelineKind,
        settings: &PipelineSettings,
    ) -> Self {
        Self {
            kind,
            working_directory: settings.working_directory(location),
            invocation: settings.invocation_for(kind),
            shell_mode: true,
            detached: true,
        }
    }
}
