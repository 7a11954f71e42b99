//! Test helpers for the transport module.

use std::sync::{
    Arc, Condvar, Mutex,
    atomic::{AtomicUsize, Ordering},
};
use std::time::{Duration, Instant};

use super::{ConnectionHandler, ConnectionStream};

pub(crate) struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    pub(crate) fn new() -> (Arc<AtomicUsize>, Arc<Self>) {
        let count = Arc::new(AtomicUsize::new(0));
        let handler = Arc::new(Self {
            count: Arc::clone(&count),
        });
        (count, handler)
    }
}

impl ConnectionHandler for CountingHandler {
    fn handle(&self, _stream: ConnectionStream) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
struct Gate {
    started: usize,
    released: bool,
}

/// Shared control for [`BlockingHandler`].
#[derive(Clone, Default)]
pub(crate) struct Release {
    gate: Arc<(Mutex<Gate>, Condvar)>,
    rejected: Arc<AtomicUsize>,
}

impl Release {
    /// Lets every blocked and future `handle` call return.
    pub(crate) fn release(&self) {
        let (lock, signal) = &*self.gate;
        lock.lock().expect("gate lock").released = true;
        signal.notify_all();
    }

    /// Waits until at least one connection is being handled.
    pub(crate) fn wait_started(&self, timeout: Duration) {
        let (lock, signal) = &*self.gate;
        let deadline = Instant::now() + timeout;
        let mut gate = lock.lock().expect("gate lock");
        while gate.started == 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            assert!(!remaining.is_zero(), "no connection reached a worker");
            gate = signal.wait_timeout(gate, remaining).expect("gate wait").0;
        }
    }

    /// Number of connections turned away.
    pub(crate) fn rejected(&self) -> usize {
        self.rejected.load(Ordering::SeqCst)
    }
}

/// Holds every connection until released, counting rejections.
pub(crate) struct BlockingHandler {
    release: Release,
}

impl BlockingHandler {
    pub(crate) fn new() -> (Release, Arc<Self>) {
        let release = Release::default();
        let handler = Arc::new(Self {
            release: release.clone(),
        });
        (release, handler)
    }
}

impl ConnectionHandler for BlockingHandler {
    fn handle(&self, _stream: ConnectionStream) {
        let (lock, signal) = &*self.release.gate;
        let mut gate = lock.lock().expect("gate lock");
        gate.started += 1;
        signal.notify_all();
        while !gate.released {
            gate = signal.wait(gate).expect("gate wait");
        }
    }

    fn reject(&self, stream: ConnectionStream) {
        self.release.rejected.fetch_add(1, Ordering::SeqCst);
        stream.close();
    }
}
