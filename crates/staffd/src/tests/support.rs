//! Shared fixtures for the daemon's behavioural suites.

use std::net::SocketAddr;
use std::sync::{Arc, Condvar, Mutex};
use std::time::{Duration, Instant};

use staffd_config::Config;
use staffd_store::MemoryStore;

use crate::bootstrap::BootstrapError;
use crate::health::HealthReporter;
use crate::process::{ShutdownError, ShutdownSignal};

pub const WAIT_TIMEOUT: Duration = Duration::from_secs(2);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Loopback configuration on an ephemeral port with a small pool.
pub fn loopback_config() -> Config {
    Config {
        host: "127.0.0.1".to_owned(),
        port: 0,
        workers: 4,
        queue_capacity: 4,
        log_filter: "staffd=debug".to_owned(),
        ..Config::default()
    }
}

pub fn demo_store() -> Arc<MemoryStore> {
    Arc::new(MemoryStore::with_demo_data().expect("demo data"))
}

/// Polls `check` until it holds or the wait budget runs out.
pub fn wait_until(check: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + WAIT_TIMEOUT;
    while Instant::now() < deadline {
        if check() {
            return true;
        }
        std::thread::sleep(POLL_INTERVAL);
    }
    false
}

/// Structured health events tracked during scenarios.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded,
    BootstrapFailed(String),
    ServerListening(SocketAddr),
    ServerStopped,
}

/// Records health events for assertions.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    pub fn listening_addr(&self) -> Option<SocketAddr> {
        self.events().into_iter().find_map(|event| match event {
            HealthEvent::ServerListening(addr) => Some(addr),
            _ => None,
        })
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn server_listening(&self, addr: SocketAddr) {
        self.record(HealthEvent::ServerListening(addr));
    }

    fn server_stopped(&self) {
        self.record(HealthEvent::ServerStopped);
    }
}

/// Shutdown signal released by the test instead of the OS.
#[derive(Clone, Default)]
pub struct ManualShutdown {
    state: Arc<(Mutex<bool>, Condvar)>,
}

impl ManualShutdown {
    pub fn trigger(&self) {
        let (lock, signal) = &*self.state;
        *lock.lock().expect("shutdown mutex poisoned") = true;
        signal.notify_all();
    }
}

impl ShutdownSignal for ManualShutdown {
    fn wait(&self) -> Result<(), ShutdownError> {
        let (lock, signal) = &*self.state;
        let mut triggered = lock.lock().expect("shutdown mutex poisoned");
        while !*triggered {
            triggered = signal.wait(triggered).expect("shutdown mutex poisoned");
        }
        Ok(())
    }

    fn drain_timeout(&self) -> Duration {
        WAIT_TIMEOUT
    }
}
