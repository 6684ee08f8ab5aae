#![allow(dead_code)]

use worldlaunch::config::{ConfigFile, RawConfigFile};
use worldlaunch::resolve::{PathStyle, ProjectLocation};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn marker(mut self, marker: &str) -> Self {
        self.config.project.marker = marker.to_string();
        self
    }

    pub fn subfolder(mut self, subfolder: &str) -> Self {
        self.config.project.subfolder = subfolder.to_string();
        self
    }

    pub fn build_script(mut self, script: &str) -> Self {
        self.config.pipeline.build_script = script.to_string();
        self
    }

    pub fn load_and_render(mut self, cmd: &str) -> Self {
        self.config.pipeline.load_and_render = cmd.to_string();
        self
    }

    pub fn shell(mut self, shell: &str) -> Self {
        self.config.launcher.shell = Some(shell.to_string());
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A `ProjectLocation` rooted at `root` (Posix style), found through an
/// anchor `root/<marker>/app`.
pub fn posix_location(root: &str, marker: &str) -> ProjectLocation {
    let anchor = format!("{root}/{marker}/app");
    PathStyle::Posix
        .resolve(&anchor, marker)
        .into_option()
        .expect("anchor built from the marker must resolve")
}
