// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::pipeline::PipelineKind;

/// Command-line arguments for `worldlaunch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "worldlaunch",
    version,
    about = "Start the world build/render pipelines from anywhere inside the project.",
    long_about = None
)]
pub struct CliArgs {
    /// Pipelines to start. Several values start overlapping launches.
    #[arg(value_enum, required = true, num_args = 1.., value_name = "PIPELINE")]
    pub pipelines: Vec<PipelineKind>,

    /// Path inside the project used to locate its root.
    ///
    /// Default: the directory containing this executable.
    #[arg(long, value_name = "PATH")]
    pub anchor: Option<PathBuf>,

    /// Path to the config file (TOML).
    ///
    /// Default: `Worldlaunch.toml` in the current working directory, if it
    /// exists.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the marker directory name from the config.
    #[arg(long, value_name = "NAME")]
    pub marker: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WORLDLAUNCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print notifications as JSON lines.
    #[arg(long)]
    pub json: bool,

    /// Return once the launches are accepted instead of following them.
    #[arg(long)]
    pub no_wait: bool,

    /// Resolve and print what would run, without launching anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
