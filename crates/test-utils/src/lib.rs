//! Shared helpers for the worldlaunch integration tests.

pub mod builders;
pub mod fake_facility;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::{EnvFilter, fmt};
use worldlaunch::logging::LOG_ENV_VAR;

/// Upper bound for any single awaited step in a test. Real-process tests
/// wait on short shell commands, so this is generous.
pub const TEST_TIMEOUT: Duration = Duration::from_secs(5);

static TRACING: Once = Once::new();

/// Install a test-writer subscriber once per test binary.
///
/// The filter comes from `RUST_LOG`, then `WORLDLAUNCH_LOG` (the variable
/// the binary itself honours), then `worldlaunch=debug`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_from_env(LOG_ENV_VAR))
            .unwrap_or_else(|_| EnvFilter::new("worldlaunch=debug"));

        let _ = fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// Await `fut`, failing the test if it takes longer than [`TEST_TIMEOUT`].
pub async fn with_timeout<F: Future>(fut: F) -> F::Output {
    match tokio::time::timeout(TEST_TIMEOUT, fut).await {
        Ok(out) => out,
        Err(_) => panic!("launch did not settle within {TEST_TIMEOUT:?}"),
    }
}
