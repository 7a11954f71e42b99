//! TCP listener and worker pool for client connections.
//!
//! The transport module binds the configured endpoint, accepts connections
//! on a background thread, and hands each one to a bounded pool of worker
//! threads. It knows nothing about the request protocol: accepted streams are
//! passed to a [`ConnectionHandler`].

mod errors;
mod handler;
mod listener;
mod pool;
#[cfg(test)]
mod test_utils;

pub use self::errors::ListenerError;
pub(crate) use self::handler::{ConnectionHandler, ConnectionStream};
pub(crate) use self::listener::{ListenerHandle, SocketListener};
pub(crate) use self::pool::{PoolWorkers, SubmitError, WorkerPool};
#[cfg(test)]
pub(crate) use self::test_utils::{BlockingHandler, CountingHandler};

const LISTENER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::transport");
