//! Supervises daemon launch sequencing and runtime orchestration.

use std::sync::Arc;
use std::thread;

use crossbeam_channel::{RecvTimeoutError, bounded};
use staffd_store::{DataStore, MemoryStore};
use tracing::{info, warn};

use crate::bootstrap::{ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::server::ServerHandle;
use crate::transport::ListenerError;

use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};
use super::{PROCESS_TARGET, SHUTDOWN_TIMEOUT};

const DRAIN_THREAD: &str = "staffd-drain";

/// Collaborators required to launch the daemon runtime.
pub(crate) struct LaunchPlan<L, S> {
    pub(crate) loader: L,
    pub(crate) shutdown: S,
    pub(crate) reporter: Arc<dyn HealthReporter>,
    pub(crate) store: Arc<dyn DataStore>,
}

/// Runs the daemon using the production collaborators.
///
/// Blocks until a termination signal arrives and running sessions have
/// drained or the drain budget is spent.
///
/// # Errors
///
/// Returns a [`LaunchError`] when bootstrap, startup, or signal handling
/// fails.
pub fn run_daemon() -> Result<(), LaunchError> {
    let store: Arc<dyn DataStore> = Arc::new(MemoryStore::with_demo_data()?);
    let plan = LaunchPlan {
        loader: SystemConfigLoader::new(),
        shutdown: SystemShutdownSignal::new(SHUTDOWN_TIMEOUT),
        reporter: Arc::new(StructuredHealthReporter::new()),
        store,
    };
    run_daemon_with(plan)
}

/// Runs the daemon with injected collaborators.
pub(crate) fn run_daemon_with<L, S>(plan: LaunchPlan<L, S>) -> Result<(), LaunchError>
where
    L: ConfigLoader,
    S: ShutdownSignal,
{
    let LaunchPlan {
        loader,
        shutdown,
        reporter,
        store,
    } = plan;

    info!(target: PROCESS_TARGET, "starting daemon runtime");
    let daemon = bootstrap_with(&loader, reporter, store)?;
    let health = daemon.reporter();
    let server = daemon.serve()?;

    let waited = shutdown.wait();
    server.stop();
    waited?;
    drain(&server, &shutdown)?;
    health.server_stopped();
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}

/// Waits for running sessions to finish within the shutdown budget.
fn drain<S: ShutdownSignal>(server: &ServerHandle, shutdown: &S) -> Result<(), LaunchError> {
    let (done_tx, done_rx) = bounded(1);
    let joiner = server.clone();
    thread::Builder::new()
        .name(DRAIN_THREAD.to_owned())
        .spawn(move || {
            // The receiver may have given up already; nothing to report then.
            done_tx.send(joiner.join()).ok();
        })
        .map_err(|source| ListenerError::Spawn {
            name: DRAIN_THREAD.to_owned(),
            source,
        })?;
    match done_rx.recv_timeout(shutdown.drain_timeout()) {
        Ok(result) => result.map_err(LaunchError::from),
        Err(RecvTimeoutError::Timeout) => {
            warn!(
                target: PROCESS_TARGET,
                timeout_ms = shutdown.drain_timeout().as_millis(),
                "sessions still running after shutdown timeout"
            );
            Ok(())
        }
        Err(RecvTimeoutError::Disconnected) => Ok(()),
    }
}
