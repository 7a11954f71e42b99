//! Error types for socket listener operations.

use std::io;
use std::net::SocketAddr;

use thiserror::Error;

/// Errors surfaced while binding or running the socket listener.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The configured host did not resolve.
    #[error("failed to resolve TCP address {host}:{port}: {source}")]
    Resolve {
        /// Configured host.
        host: String,
        /// Configured port.
        port: u16,
        /// Resolver error.
        #[source]
        source: io::Error,
    },
    /// The configured host resolved to nothing.
    #[error("no TCP addresses resolved for {host}:{port}")]
    ResolveEmpty {
        /// Configured host.
        host: String,
        /// Configured port.
        port: u16,
    },
    /// The port could not be bound.
    #[error("failed to bind TCP listener at {addr}: {source}")]
    BindTcp {
        /// Address the bind was attempted on.
        addr: SocketAddr,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The bound socket did not report its address.
    #[error("failed to read listener address: {source}")]
    LocalAddr {
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// Switching the listener to non-blocking accepts failed.
    #[error("failed to enable non-blocking listener: {source}")]
    NonBlocking {
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// A pool or acceptor thread could not be spawned.
    #[error("failed to spawn thread '{name}': {source}")]
    Spawn {
        /// Name of the thread.
        name: String,
        /// Underlying OS error.
        #[source]
        source: io::Error,
    },
    /// The acceptor thread panicked.
    #[error("listener thread panicked")]
    ThreadPanic,
    /// One or more worker threads panicked outside a session.
    #[error("{count} worker thread(s) panicked")]
    WorkerPanic {
        /// Number of workers that panicked.
        count: usize,
    },
}
