// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod lifecycle;
pub mod logging;
pub mod orchestrator;
pub mod pipeline;
pub mod report;
pub mod resolve;
pub mod session;
pub mod spawn;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_or_default};
use crate::errors::WorldlaunchError;
use crate::lifecycle::LifecycleEvent;
use crate::orchestrator::Orchestrator;
use crate::pipeline::{LaunchRequest, PipelineSettings};
use crate::report::{ReportFormat, RunSummary};
use crate::resolve::{ProjectLocation, resolve_project_location};
use crate::session::Session;
use crate::spawn::{SpawnFacility, TokioSpawnFacility};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - project root resolution from the anchor path
/// - the session / orchestrator / real spawning facility
/// - following the launches until they finish (unless `--no-wait`)
///
/// `anchor` is the fallback anchor when `--anchor` is not given.
///
/// Returns `Ok(true)` when every launch exited with status 0. With
/// `--no-wait` the launches are followed only until each one is running or
/// has already finished, so a launch the OS refused still yields `Ok(false)`.
/// `--dry-run` always returns `Ok(true)`.
pub async fn run(args: CliArgs, anchor: PathBuf) -> Result<bool> {
    let cfg = load_or_default(args.config.as_deref())?;

    let anchor = args.anchor.clone().unwrap_or(anchor);
    let marker = args.marker.clone().unwrap_or_else(|| cfg.marker().to_string());
    let location = locate_project(&anchor, &marker)?;
    info!(root = %location.root_path(), "project root resolved");

    let settings = cfg.pipeline_settings();

    if args.dry_run {
        print_dry_run(&args, &location, &settings);
        return Ok(true);
    }

    let orchestrator = Orchestrator::with_settings(build_facility(&cfg), settings);
    let (session, mut events) = Session::new(location, orchestrator);

    for pipeline in args.pipelines.iter().copied() {
        let id = session.trigger(pipeline);
        debug!(launch_id = id.0, %pipeline, "pipeline triggered");
    }

    let format = ReportFormat::from_json_flag(args.json);
    let expected = args.pipelines.len();
    let mut summary = RunSummary::default();
    // Launches that reached `running` or a terminal event.
    let mut settled = BTreeSet::new();

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut listening = true;

    loop {
        let done = if args.no_wait {
            settled.len()
        } else {
            summary.finished()
        };
        if done >= expected {
            break;
        }

        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else { break };
                println!("{}", format.render(&event)?);
                let terminal = summary.record(&event);
                if terminal || matches!(event.event, LifecycleEvent::Running) {
                    settled.insert(event.launch);
                }
            }
            res = &mut ctrl_c, if listening => {
                match res {
                    Ok(()) => {
                        warn!(
                            finished = summary.finished(),
                            expected,
                            "interrupted; detached pipelines keep running"
                        );
                        return Ok(false);
                    }
                    Err(e) => {
                        warn!(error = %e, "failed to listen for Ctrl+C; continuing without it");
                        listening = false;
                    }
                }
            }
        }
    }

    if args.no_wait {
        info!(
            launched = session.launched(),
            started = settled.len(),
            "launches started; not waiting for them to exit"
        );
        return Ok(settled.len() == expected && summary.all_succeeded());
    }

    Ok(summary.finished() == expected && summary.all_succeeded())
}

/// Resolve the project root, or fail without launching anything.
pub fn locate_project(anchor: &Path, marker: &str) -> std::result::Result<ProjectLocation, WorldlaunchError> {
    let anchor = anchor.to_string_lossy();
    resolve_project_location(&anchor, marker).found_or_else(|| WorldlaunchError::ProjectNotFound {
        anchor: anchor.to_string(),
        marker: marker.to_string(),
    })
}

fn build_facility(cfg: &ConfigFile) -> Arc<dyn SpawnFacility> {
    match &cfg.launcher.shell {
        Some(shell) => Arc::new(TokioSpawnFacility::with_shell(shell.clone())),
        None => Arc::new(TokioSpawnFacility::new()),
    }
}

/// Directory of the running executable, used as the default anchor.
pub fn default_anchor() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn print_dry_run(args: &CliArgs, location: &ProjectLocation, settings: &PipelineSettings) {
    println!("worldlaunch dry-run");
    println!("  project root = {}", location.root_path());
    println!("  marker       = {}", location.marker_token());
    println!();

    for pipeline in args.pipelines.iter().copied() {
        let request = LaunchRequest::for_pipeline(location, pipeline, settings);
        println!("  - {pipeline}");
        println!("      cwd: {}", request.working_directory);
        println!("      invocation: {}", request.invocation);
    }

    debug!("dry-run complete (nothing launched)");
}
