//! Server lifecycle: bind, serve, stop.
//!
//! [`Server::start`] binds the configured endpoint, spawns the worker pool, and
//! starts the acceptor. The returned [`ServerHandle`] is cheap to clone so a
//! signal thread and the main thread can both hold it. Stopping closes the
//! endpoint and the pool's queue; sessions already running finish on their
//! own, and [`ServerHandle::join`] waits for them.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use staffd_config::Config;
use staffd_store::DataStore;
use tracing::{info, warn};

use crate::dispatch::{Router, SessionHandler};
use crate::transport::{
    ConnectionHandler, ListenerError, ListenerHandle, PoolWorkers, SocketListener, WorkerPool,
};

const SERVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::server");

/// Entry point for running the request server.
#[derive(Debug, Clone, Copy, Default)]
pub struct Server;

impl Server {
    /// Binds `config`'s address and starts serving requests against `store`.
    ///
    /// # Errors
    ///
    /// Returns a [`ListenerError`] when the address cannot be resolved or
    /// bound, or when a server thread cannot be spawned. Nothing is left
    /// running on failure.
    pub fn start(config: &Config, store: Arc<dyn DataStore>) -> Result<ServerHandle, ListenerError> {
        let (host, port) = config.listen_address();
        let listener = SocketListener::bind(host, port)?;
        let local_addr = listener.local_addr();

        let router = Arc::new(Router::new(Arc::clone(&store)));
        let handler: Arc<dyn ConnectionHandler> =
            Arc::new(SessionHandler::new(router, config.max_request_bytes));
        let (pool, workers) = WorkerPool::spawn(config.workers, config.queue_capacity, &handler)?;
        let acceptor = match listener.start(pool, handler) {
            Ok(acceptor) => acceptor,
            Err(error) => {
                // The pool's sender went down with the listener, so workers exit.
                if let Err(join_error) = workers.join() {
                    warn!(target: SERVER_TARGET, error = %join_error, "worker pool failed");
                }
                return Err(error);
            }
        };
        info!(
            target: SERVER_TARGET,
            addr = %local_addr,
            workers = workers.len(),
            queue_capacity = config.queue_capacity,
            "server started"
        );
        Ok(ServerHandle {
            inner: Arc::new(ServerInner {
                local_addr,
                running: AtomicBool::new(true),
                acceptor: Mutex::new(Some(acceptor)),
                workers: Mutex::new(Some(workers)),
                store,
            }),
        })
    }
}

struct ServerInner {
    local_addr: SocketAddr,
    running: AtomicBool,
    acceptor: Mutex<Option<ListenerHandle>>,
    workers: Mutex<Option<PoolWorkers>>,
    store: Arc<dyn DataStore>,
}

/// Shared control over a running server.
#[derive(Clone)]
pub struct ServerHandle {
    inner: Arc<ServerInner>,
}

impl std::fmt::Debug for ServerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerHandle")
            .field("local_addr", &self.inner.local_addr)
            .field("running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl ServerHandle {
    /// Address the server is listening on.
    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.inner.local_addr
    }

    /// Reports whether [`stop`](Self::stop) has not yet been called.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.inner.running.load(Ordering::SeqCst)
    }

    /// Stops accepting connections and releases the store.
    ///
    /// Only the first call has any effect; later and concurrent calls return
    /// immediately. Sessions in progress are not interrupted, but store calls
    /// they make after this point fail.
    pub fn stop(&self) {
        if !self.inner.running.swap(false, Ordering::SeqCst) {
            return;
        }
        let acceptor = self
            .inner
            .acceptor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(acceptor) = acceptor {
            acceptor.shutdown();
            if let Err(error) = acceptor.join() {
                warn!(target: SERVER_TARGET, %error, "acceptor did not stop cleanly");
            }
        }
        self.inner.store.close();
        info!(
            target: SERVER_TARGET,
            addr = %self.inner.local_addr,
            "server stopped"
        );
    }

    /// Waits until every worker has exited, which happens once the server is
    /// stopped and all sessions have ended. Returns immediately if another
    /// caller already joined.
    ///
    /// # Errors
    ///
    /// Returns [`ListenerError::WorkerPanic`] if a worker thread died.
    pub fn join(&self) -> Result<(), ListenerError> {
        let workers = self
            .inner
            .workers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        workers.map_or(Ok(()), PoolWorkers::join)
    }
}
