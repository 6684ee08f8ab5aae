// tests/orchestrator_fake_facility.rs

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use worldlaunch::errors::LaunchError;
use worldlaunch::lifecycle::{LifecycleEvent, ProcessState, TerminalOutcome};
use worldlaunch::orchestrator::{Orchestrator, ProcessHandle};
use worldlaunch::pipeline::{PipelineKind, PipelineSettings};
use worldlaunch::spawn::{ExitOutcome, RawEvent, SpawnOptions};
use worldlaunch_test_utils::builders::posix_location;
use worldlaunch_test_utils::fake_facility::{FakeFacility, exits_with};
use worldlaunch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn orchestrator(fake: &Arc<FakeFacility>) -> Orchestrator {
    Orchestrator::new(fake.clone())
}

async fn collect(mut handle: ProcessHandle) -> Vec<LifecycleEvent> {
    let mut events = Vec::new();
    while let Some(ev) = handle.next_event().await {
        events.push(ev);
    }
    events
}

#[tokio::test]
async fn build_runs_script_in_world_subfolder() -> TestResult {
    init_tracing();
    let fake = Arc::new(FakeFacility::new());
    let orch = orchestrator(&fake);
    let loc = posix_location("/proj", "world-ui");

    let handle = orch.launch_build_pipeline(&loc, PipelineKind::Build)?;
    assert_eq!(handle.kind(), PipelineKind::Build);
    with_timeout(handle.wait()).await;

    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].invocation, "build-and-draw.bat");
    assert_eq!(
        calls[0].options,
        SpawnOptions {
            shell: true,
            detached: true,
            cwd: PathBuf::from("/proj/world"),
        }
    );
    Ok(())
}

#[tokio::test]
async fn load_and_render_runs_fixed_command() -> TestResult {
    init_tracing();
    let fake = Arc::new(FakeFacility::new());
    let orch = orchestrator(&fake);
    let loc = posix_location("/proj", "world-ui");

    let handle = orch.launch_build_pipeline(&loc, PipelineKind::LoadAndRender)?;
    with_timeout(handle.wait()).await;

    let calls = fake.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].invocation, "cargo run load draw");
    assert_eq!(calls[0].options.cwd, PathBuf::from("/proj/world"));
    Ok(())
}

#[tokio::test]
async fn custom_settings_change_folder_and_invocation() -> TestResult {
    init_tracing();
    let fake = Arc::new(FakeFacility::new());
    let settings = PipelineSettings {
        subfolder: "pipeline".to_string(),
        build_script: "make all".to_string(),
        load_and_render: "render --fast".to_string(),
    };
    let orch = Orchestrator::with_settings(fake.clone(), settings);
    let loc = posix_location("/srv/app", "ui");

    with_timeout(orch.launch_build_pipeline(&loc, PipelineKind::Build)?.wait()).await;

    let calls = fake.calls();
    assert_eq!(calls[0].invocation, "make all");
    assert_eq!(calls[0].options.cwd, PathBuf::from("/srv/app/pipeline"));
    Ok(())
}

#[tokio::test]
async fn successful_launch_yields_ordered_events_with_one_terminal() -> TestResult {
    init_tracing();
    let fake = Arc::new(FakeFacility::new());
    let ok = ExitOutcome::from_code(0);
    fake.push_events(vec![
        RawEvent::Spawn,
        RawEvent::Message("compiling".to_string()),
        RawEvent::Exit(ok),
        RawEvent::Close(ok),
    ]);
    let orch = orchestrator(&fake);

    let handle = orch.launch_build_pipeline(&posix_location("/p", "world-ui"), PipelineKind::Build)?;
    let events = with_timeout(collect(handle)).await;

    assert_eq!(
        events,
        vec![
            LifecycleEvent::Spawned,
            LifecycleEvent::Running,
            LifecycleEvent::Message {
                text: "compiling".to_string()
            },
            LifecycleEvent::Exited(ok),
        ]
    );
    Ok(())
}

#[tokio::test]
async fn non_zero_exit_code_is_exposed() -> TestResult {
    init_tracing();
    let fake = Arc::new(FakeFacility::new());
    fake.push_events(exits_with(7));
    let orch = orchestrator(&fake);

    let handle = orch.launch_build_pipeline(&posix_location("/p", "world-ui"), PipelineKind::Build)?;
    let outcome = with_timeout(handle.wait()).await;

    assert_eq!(outcome, TerminalOutcome::Exited(ExitOutcome::from_code(7)));
    assert!(!outcome.is_success());
    Ok(())
}

#[tokio::test]
async fn spawn_error_is_errored_without_running() -> TestResult {
    init_tracing();
    let fake = Arc::new(FakeFacility::new());
    fake.push_events(vec![RawEvent::Error("spawn cmd.exe ENOENT".to_string())]);
    let orch = orchestrator(&fake);

    let handle = orch.launch_build_pipeline(&posix_location("/p", "world-ui"), PipelineKind::Build)?;
    let events = with_timeout(collect(handle)).await;

    assert_eq!(
        events,
        vec![
            LifecycleEvent::Spawned,
            LifecycleEvent::Errored {
                payload: "spawn cmd.exe ENOENT".to_string()
            },
        ]
    );
    assert!(!events.contains(&LifecycleEvent::Running));
    Ok(())
}

#[tokio::test]
async fn stream_ending_early_is_disconnected() -> TestResult {
    init_tracing();
    let fake = Arc::new(FakeFacility::new());
    fake.push_events(vec![RawEvent::Spawn]);
    let orch = orchestrator(&fake);

    let handle = orch.launch_build_pipeline(&posix_location("/p", "world-ui"), PipelineKind::Build)?;
    let outcome = with_timeout(handle.wait()).await;

    assert_eq!(outcome, TerminalOutcome::Disconnected);
    Ok(())
}

#[tokio::test]
async fn synchronous_rejection_is_a_launch_error() -> TestResult {
    init_tracing();
    let fake = Arc::new(FakeFacility::new());
    fake.push_reject("invalid argument");
    let orch = orchestrator(&fake);

    let err = orch
        .launch_build_pipeline(&posix_location("/p", "world-ui"), PipelineKind::Build)
        .unwrap_err();

    assert!(err.is_spawn_failure());
    assert_eq!(err.payload(), "invalid argument");
    match err {
        LaunchError::Rejected { invocation, .. } => assert_eq!(invocation, "build-and-draw.bat"),
    }
    assert_eq!(fake.calls().len(), 1);
    Ok(())
}

#[tokio::test]
async fn state_follows_the_observer() -> TestResult {
    init_tracing();
    let fake = Arc::new(FakeFacility::new());
    let tx = fake.push_channel();
    let orch = orchestrator(&fake);

    let mut handle =
        orch.launch_build_pipeline(&posix_location("/p", "world-ui"), PipelineKind::Build)?;
    assert_eq!(handle.state(), ProcessState::Spawned);
    assert_eq!(with_timeout(handle.next_event()).await, Some(LifecycleEvent::Spawned));

    tx.send(RawEvent::Spawn)?;
    assert_eq!(with_timeout(handle.next_event()).await, Some(LifecycleEvent::Running));
    assert_eq!(handle.state(), ProcessState::Running);

    tx.send(RawEvent::Exit(ExitOutcome::from_code(0)))?;
    // Ignored: the launch is already over.
    tx.send(RawEvent::Message("late".to_string()))?;

    assert_eq!(
        with_timeout(handle.next_event()).await,
        Some(LifecycleEvent::Exited(ExitOutcome::from_code(0)))
    );
    assert_eq!(handle.state(), ProcessState::Exited);
    assert_eq!(with_timeout(handle.next_event()).await, None);
    Ok(())
}

#[tokio::test]
async fn overlapping_launches_stay_independent() -> TestResult {
    init_tracing();
    let fake = Arc::new(FakeFacility::new());
    let build_tx = fake.push_channel();
    let render_tx = fake.push_channel();
    let orch = orchestrator(&fake);
    let loc = posix_location("/p", "world-ui");

    let build = orch.launch_build_pipeline(&loc, PipelineKind::Build)?;
    let render = orch.launch_build_pipeline(&loc, PipelineKind::LoadAndRender)?;
    assert_ne!(build.id(), render.id());

    build_tx.send(RawEvent::Spawn)?;
    render_tx.send(RawEvent::Spawn)?;
    render_tx.send(RawEvent::Exit(ExitOutcome::from_code(0)))?;
    build_tx.send(RawEvent::Message("still going".to_string()))?;
    build_tx.send(RawEvent::Exit(ExitOutcome::from_code(1)))?;

    let (build_events, render_events) =
        with_timeout(async { tokio::join!(collect(build), collect(render)) }).await;

    assert_eq!(
        build_events,
        vec![
            LifecycleEvent::Spawned,
            LifecycleEvent::Running,
            LifecycleEvent::Message {
                text: "still going".to_string()
            },
            LifecycleEvent::Exited(ExitOutcome::from_code(1)),
        ]
    );
    assert_eq!(
        render_events,
        vec![
            LifecycleEvent::Spawned,
            LifecycleEvent::Running,
            LifecycleEvent::Exited(ExitOutcome::from_code(0)),
        ]
    );
    assert_eq!(fake.calls().len(), 2);
    Ok(())
}
