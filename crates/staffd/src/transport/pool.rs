//! Fixed-size worker pool with a bounded hand-off queue.
//!
//! Each worker owns one session at a time. Accepted connections wait in a
//! bounded channel until a worker is free; once the channel is full the
//! acceptor is told to turn the connection away rather than queue it without
//! limit. Dropping the [`WorkerPool`] closes the channel: workers finish the
//! connections already queued and then exit.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender, TrySendError, bounded};
use tracing::{debug, error};

use super::{ConnectionHandler, ConnectionStream, LISTENER_TARGET, ListenerError};

/// Reasons a connection could not be handed to a worker.
#[derive(Debug)]
pub(crate) enum SubmitError {
    /// Every worker is busy and the queue is at capacity.
    Full(ConnectionStream),
    /// All workers have exited.
    Closed(ConnectionStream),
}

/// Submission side of the pool.
#[derive(Debug)]
pub(crate) struct WorkerPool {
    sender: Sender<ConnectionStream>,
}

/// Join handles for the pool's worker threads.
#[derive(Debug)]
pub(crate) struct PoolWorkers {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `size` workers sharing a queue of `capacity` waiting connections.
    pub(crate) fn spawn(
        size: usize,
        capacity: usize,
        handler: &Arc<dyn ConnectionHandler>,
    ) -> Result<(Self, PoolWorkers), ListenerError> {
        let (sender, receiver) = bounded::<ConnectionStream>(capacity);
        let mut handles = Vec::with_capacity(size);
        for index in 0..size {
            let name = format!("staffd-worker-{index}");
            let receiver = receiver.clone();
            let handler = Arc::clone(handler);
            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || run_worker(&receiver, handler.as_ref()))
                .map_err(|source| ListenerError::Spawn { name, source })?;
            handles.push(handle);
        }
        debug!(
            target: LISTENER_TARGET,
            workers = size,
            queue_capacity = capacity,
            "worker pool started"
        );
        Ok((Self { sender }, PoolWorkers { handles }))
    }

    /// Queues a connection without blocking.
    pub(crate) fn submit(&self, stream: ConnectionStream) -> Result<(), SubmitError> {
        self.sender.try_send(stream).map_err(|error| match error {
            TrySendError::Full(stream) => SubmitError::Full(stream),
            TrySendError::Disconnected(stream) => SubmitError::Closed(stream),
        })
    }
}

impl PoolWorkers {
    /// Number of worker threads.
    pub(crate) fn len(&self) -> usize {
        self.handles.len()
    }

    /// Waits for every worker to exit. Workers exit only after the owning
    /// [`WorkerPool`] has been dropped and the queue is drained.
    pub(crate) fn join(self) -> Result<(), ListenerError> {
        let count = self
            .handles
            .into_iter()
            .map(JoinHandle::join)
            .filter(Result::is_err)
            .count();
        if count == 0 {
            Ok(())
        } else {
            Err(ListenerError::WorkerPanic { count })
        }
    }
}

fn run_worker(receiver: &Receiver<ConnectionStream>, handler: &dyn ConnectionHandler) {
    for stream in receiver {
        let peer = stream.peer();
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(stream)));
        if outcome.is_err() {
            error!(
                target: LISTENER_TARGET,
                peer = ?peer,
                "connection handler panicked; worker continues"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use std::net::{TcpListener, TcpStream};
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    use super::*;
    use crate::transport::{BlockingHandler, CountingHandler};

    fn connected_stream(listener: &TcpListener) -> (TcpStream, ConnectionStream) {
        let addr = listener.local_addr().expect("listener address");
        let client = TcpStream::connect(addr).expect("connect client");
        let (server, _) = listener.accept().expect("accept");
        (client, ConnectionStream::new(server))
    }

    #[test]
    fn drains_queue_after_pool_is_dropped() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
        let (count, handler) = CountingHandler::new();
        let handler: Arc<dyn ConnectionHandler> = handler;
        let (pool, workers) = WorkerPool::spawn(2, 4, &handler).expect("spawn pool");
        assert_eq!(workers.len(), 2);

        let mut clients = Vec::new();
        for _ in 0..3 {
            let (client, stream) = connected_stream(&listener);
            clients.push(client);
            pool.submit(stream).expect("submit");
        }
        drop(pool);
        workers.join().expect("join workers");
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn reports_full_queue() {
        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
        let (release, handler) = BlockingHandler::new();
        let handler: Arc<dyn ConnectionHandler> = handler;
        let (pool, workers) = WorkerPool::spawn(1, 1, &handler).expect("spawn pool");

        let mut clients = Vec::new();
        let (client, busy) = connected_stream(&listener);
        clients.push(client);
        pool.submit(busy).expect("first connection occupies the worker");
        release.wait_started(Duration::from_secs(2));

        let (client, queued) = connected_stream(&listener);
        clients.push(client);
        pool.submit(queued).expect("second connection waits in the queue");

        let (client, overflow) = connected_stream(&listener);
        clients.push(client);
        assert!(matches!(pool.submit(overflow), Err(SubmitError::Full(_))));

        release.release();
        drop(pool);
        workers.join().expect("join workers");
    }

    #[test]
    fn survives_panicking_handler() {
        struct PanickingHandler;

        impl ConnectionHandler for PanickingHandler {
            fn handle(&self, _stream: ConnectionStream) {
                panic!("handler failure");
            }
        }

        let listener = TcpListener::bind(("127.0.0.1", 0)).expect("bind");
        let handler: Arc<dyn ConnectionHandler> = Arc::new(PanickingHandler);
        let (pool, workers) = WorkerPool::spawn(1, 2, &handler).expect("spawn pool");
        let mut clients = Vec::new();
        for _ in 0..2 {
            let (client, stream) = connected_stream(&listener);
            clients.push(client);
            pool.submit(stream).expect("submit");
        }
        drop(pool);
        workers.join().expect("worker should outlive handler panics");
    }
}
