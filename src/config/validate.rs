// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, WorldlaunchError};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::WorldlaunchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.project, raw.pipeline, raw.launcher))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_segment("[project].marker", &cfg.project.marker)?;
    validate_segment("[project].subfolder", &cfg.project.subfolder)?;
    validate_non_empty("[pipeline].build_script", &cfg.pipeline.build_script)?;
    validate_non_empty("[pipeline].load_and_render", &cfg.pipeline.load_and_render)?;
    if let Some(shell) = &cfg.launcher.shell {
        validate_non_empty("[launcher].shell", shell)?;
    }
    Ok(())
}

fn validate_non_empty(key: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WorldlaunchError::ConfigError(format!(
            "{key} must not be empty"
        )));
    }
    Ok(())
}

/// A single directory name: no separators of either style.
fn validate_segment(key: &str, value: &str) -> Result<()> {
    validate_non_empty(key, value)?;
    if value.contains(['/', '\\']) {
        return Err(WorldlaunchError::ConfigError(format!(
            "{key} must be a single directory name without separators (got '{value}')"
        )));
    }
    Ok(())
}
