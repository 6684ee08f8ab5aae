// src/config/model.rs

use serde::Deserialize;

use crate::pipeline::{
    DEFAULT_BUILD_SCRIPT, DEFAULT_LOAD_AND_RENDER, DEFAULT_MARKER, DEFAULT_SUBFOLDER,
    PipelineSettings,
};

/// Configuration as read from `Worldlaunch.toml`, before validation.
///
/// ```toml
/// [project]
/// marker = "world-ui"
/// subfolder = "world"
///
/// [pipeline]
/// build_script = "build-and-draw.bat"
/// load_and_render = "cargo run load draw"
///
/// [launcher]
/// shell = "/bin/bash"
/// ```
///
/// Every section is optional; a missing file is the same as an empty one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub project: ProjectSection,

    #[serde(default)]
    pub pipeline: PipelineSection,

    #[serde(default)]
    pub launcher: LauncherSection,
}

/// `[project]` section: how the project root and pipeline folder are found.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    /// Directory name that identifies the UI module inside the project.
    #[serde(default = "default_marker")]
    pub marker: String,

    /// Folder under the project root that holds the pipeline.
    #[serde(default = "default_subfolder")]
    pub subfolder: String,
}

fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}

fn default_subfolder() -> String {
    DEFAULT_SUBFOLDER.to_string()
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            marker: default_marker(),
            subfolder: default_subfolder(),
        }
    }
}

/// `[pipeline]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineSection {
    #[serde(default = "default_build_script")]
    pub build_script: String,

    #[serde(default = "default_load_and_render")]
    pub load_and_render: String,
}

fn default_build_script() -> String {
    DEFAULT_BUILD_SCRIPT.to_string()
}

fn default_load_and_render() -> String {
    DEFAULT_LOAD_AND_RENDER.to_string()
}

impl Default for PipelineSection {
    fn default() -> Self {
        Self {
            build_script: default_build_script(),
            load_and_render: default_load_and_render(),
        }
    }
}

/// `[launcher]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LauncherSection {
    /// Shell used for shell-mode invocations instead of the platform default.
    #[serde(default)]
    pub shell: Option<String>,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub project: ProjectSection,
    pub pipeline: PipelineSection,
    pub launcher: LauncherSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        project: ProjectSection,
        pipeline: PipelineSection,
        launcher: LauncherSection,
    ) -> Self {
        Self {
            project,
            pipeline,
            launcher,
        }
    }

    pub fn marker(&self) -> &str {
        &self.project.marker
    }

    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            subfolder: self.project.subfolder.clone(),
            build_script: self.pipeline.build_script.clone(),
            load_and_render: self.pipeline.load_and_render.clone(),
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let raw = RawConfigFile::default();
        Self::new_unchecked(raw.project, raw.pipeline, raw.launcher)
    }
}
