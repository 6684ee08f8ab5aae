// tests/run_end_to_end.rs

use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use tempfile::TempDir;
use worldlaunch::cli::CliArgs;
use worldlaunch::errors::WorldlaunchError;
use worldlaunch::{locate_project, run};
use worldlaunch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

/// `<tmp>/world-ui/bin`, `<tmp>/world` and a config file driving both
/// pipelines with plain shell commands.
fn project(build: &str, render: &str) -> Result<(TempDir, PathBuf, PathBuf), Box<dyn Error>> {
    let dir = tempfile::tempdir()?;
    let anchor = dir.path().join("world-ui").join("bin");
    fs::create_dir_all(&anchor)?;
    fs::create_dir_all(dir.path().join("world"))?;

    let config = dir.path().join("Worldlaunch.toml");
    fs::write(
        &config,
        format!("[pipeline]\nbuild_script = \"{build}\"\nload_and_render = \"{render}\"\n"),
    )?;
    Ok((dir, anchor, config))
}

fn args(anchor: &Path, config: &Path, extra: &[&str]) -> CliArgs {
    let mut argv = vec![
        "worldlaunch".to_string(),
        "--anchor".to_string(),
        anchor.display().to_string(),
        "--config".to_string(),
        config.display().to_string(),
    ];
    argv.extend(extra.iter().map(|s| s.to_string()));
    CliArgs::try_parse_from(argv).expect("valid test arguments")
}

#[test]
fn locate_project_fails_without_marker() {
    match locate_project(Path::new("/opt/tools/bin"), "world-ui") {
        Err(WorldlaunchError::ProjectNotFound { anchor, marker }) => {
            assert_eq!(anchor, "/opt/tools/bin");
            assert_eq!(marker, "world-ui");
        }
        other => panic!("Expected ProjectNotFound, got: {other:?}"),
    }
}

#[tokio::test]
async fn run_refuses_to_launch_when_root_not_found() -> TestResult {
    init_tracing();
    let (dir, _anchor, config) = project("touch built.txt", "exit 0")?;
    let elsewhere = dir.path().join("somewhere").join("else");

    let err = run(args(&elsewhere, &config, &["build"]), PathBuf::from("/unused"))
        .await
        .unwrap_err();

    assert!(err.to_string().contains("project root not found"));
    assert!(!dir.path().join("world").join("built.txt").exists());
    Ok(())
}

#[tokio::test]
async fn dry_run_launches_nothing() -> TestResult {
    init_tracing();
    let (dir, anchor, config) = project("touch built.txt", "exit 0")?;

    let ok = run(args(&anchor, &config, &["--dry-run", "build"]), anchor.clone()).await?;

    assert!(ok);
    assert!(!dir.path().join("world").join("built.txt").exists());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn run_waits_for_all_launches_and_reports_success() -> TestResult {
    init_tracing();
    let (dir, anchor, config) = project("touch built.txt", "exit 0")?;

    let ok = with_timeout(run(
        args(&anchor, &config, &["--json", "build", "load-and-render"]),
        PathBuf::from("/unused"),
    ))
    .await?;

    assert!(ok);
    assert!(dir.path().join("world").join("built.txt").exists());
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn run_reports_failure_when_any_launch_fails() -> TestResult {
    init_tracing();
    let (_dir, anchor, config) = project("exit 0", "exit 5")?;

    let ok = with_timeout(run(
        args(&anchor, &config, &["build", "load-and-render"]),
        PathBuf::from("/unused"),
    ))
    .await?;

    assert!(!ok);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn no_wait_reports_failure_when_working_directory_is_missing() -> TestResult {
    init_tracing();
    let (dir, anchor, config) = project("exit 0", "exit 0")?;
    fs::remove_dir(dir.path().join("world"))?;

    let ok = with_timeout(run(
        args(&anchor, &config, &["--no-wait", "build"]),
        PathBuf::from("/unused"),
    ))
    .await?;

    assert!(!ok);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn no_wait_returns_once_launches_are_running() -> TestResult {
    init_tracing();
    let (_dir, anchor, config) = project("sleep 1", "exit 0")?;

    let ok = with_timeout(run(
        args(&anchor, &config, &["--no-wait", "build"]),
        PathBuf::from("/unused"),
    ))
    .await?;

    assert!(ok);
    Ok(())
}

#[cfg(unix)]
#[tokio::test]
async fn default_anchor_argument_is_used_without_flag() -> TestResult {
    init_tracing();
    let (_dir, anchor, config) = project("exit 0", "exit 0")?;
    let argv = [
        "worldlaunch".to_string(),
        "--config".to_string(),
        config.display().to_string(),
        "build".to_string(),
    ];

    let ok = with_timeout(run(CliArgs::try_parse_from(argv)?, anchor)).await?;

    assert!(ok);
    Ok(())
}
