//! Listener implementation for the daemon's TCP endpoint.

use std::io;
use std::net::{SocketAddr, TcpListener, ToSocketAddrs};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use super::{
    ConnectionHandler, ConnectionStream, LISTENER_TARGET, ListenerError, SubmitError, WorkerPool,
};

const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);
const ERROR_BACKOFF: Duration = Duration::from_millis(150);
const ACCEPTOR_THREAD: &str = "staffd-acceptor";

/// Listener bound to the configured TCP address.
#[derive(Debug)]
pub(crate) struct SocketListener {
    addr: SocketAddr,
    listener: TcpListener,
}

impl SocketListener {
    pub(crate) fn bind(host: &str, port: u16) -> Result<Self, ListenerError> {
        let listener = bind_tcp(host, port)?;
        let addr = listener
            .local_addr()
            .map_err(|source| ListenerError::LocalAddr { source })?;
        Ok(Self { addr, listener })
    }

    /// Address actually bound; differs from the configured one when port 0
    /// was requested.
    pub(crate) const fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Starts accepting on a background thread, handing connections to
    /// `pool`. Connections the pool cannot take are passed to
    /// [`ConnectionHandler::reject`].
    pub(crate) fn start(
        self,
        pool: WorkerPool,
        handler: Arc<dyn ConnectionHandler>,
    ) -> Result<ListenerHandle, ListenerError> {
        self.listener
            .set_nonblocking(true)
            .map_err(|source| ListenerError::NonBlocking { source })?;
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);
        let handle = thread::Builder::new()
            .name(ACCEPTOR_THREAD.to_owned())
            .spawn(move || run_accept_loop(&self, &pool, &shutdown_flag, handler.as_ref()))
            .map_err(|source| ListenerError::Spawn {
                name: ACCEPTOR_THREAD.to_owned(),
                source,
            })?;
        Ok(ListenerHandle {
            shutdown,
            handle: Some(handle),
        })
    }
}

/// Handle to the background acceptor thread.
#[derive(Debug)]
pub(crate) struct ListenerHandle {
    shutdown: Arc<AtomicBool>,
    handle: Option<thread::JoinHandle<()>>,
}

impl ListenerHandle {
    pub(crate) fn shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Waits for the acceptor to exit. The listening socket and the pool's
    /// submission side are released once this returns.
    pub(crate) fn join(mut self) -> Result<(), ListenerError> {
        if let Some(handle) = self.handle.take() {
            match handle.join() {
                Ok(()) => Ok(()),
                Err(_) => Err(ListenerError::ThreadPanic),
            }
        } else {
            Ok(())
        }
    }
}

impl Drop for ListenerHandle {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

fn run_accept_loop(
    listener: &SocketListener,
    pool: &WorkerPool,
    shutdown: &AtomicBool,
    handler: &dyn ConnectionHandler,
) {
    info!(
        target: LISTENER_TARGET,
        addr = %listener.addr,
        "socket listener active"
    );
    let mut last_error = None::<io::ErrorKind>;
    while !shutdown.load(Ordering::SeqCst) {
        match accept_connection(&listener.listener) {
            Ok(Some(stream)) => {
                last_error = None;
                dispatch_connection(pool, handler, stream);
            }
            Ok(None) => thread::sleep(ACCEPT_BACKOFF),
            Err(error) => {
                let kind = error.kind();
                if last_error != Some(kind) {
                    warn!(
                        target: LISTENER_TARGET,
                        error = %error,
                        "socket accept error"
                    );
                }
                last_error = Some(kind);
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }
    info!(
        target: LISTENER_TARGET,
        addr = %listener.addr,
        "socket listener stopped"
    );
}

fn dispatch_connection(pool: &WorkerPool, handler: &dyn ConnectionHandler, stream: ConnectionStream) {
    let peer = stream.peer();
    debug!(target: LISTENER_TARGET, peer = ?peer, "connection accepted");
    match pool.submit(stream) {
        Ok(()) => {}
        Err(SubmitError::Full(stream)) => {
            warn!(
                target: LISTENER_TARGET,
                peer = ?peer,
                "worker queue full; rejecting connection"
            );
            handler.reject(stream);
        }
        Err(SubmitError::Closed(stream)) => {
            warn!(
                target: LISTENER_TARGET,
                peer = ?peer,
                "worker pool unavailable; rejecting connection"
            );
            handler.reject(stream);
        }
    }
}

fn accept_connection(listener: &TcpListener) -> Result<Option<ConnectionStream>, io::Error> {
    match listener.accept() {
        Ok((stream, _)) => {
            stream.set_nonblocking(false)?;
            Ok(Some(ConnectionStream::new(stream)))
        }
        Err(error) if error.kind() == io::ErrorKind::WouldBlock => Ok(None),
        Err(error) => Err(error),
    }
}

fn bind_tcp(host: &str, port: u16) -> Result<TcpListener, ListenerError> {
    let mut addrs = (host, port)
        .to_socket_addrs()
        .map_err(|source| ListenerError::Resolve {
            host: host.to_owned(),
            port,
            source,
        })?;
    let addr = addrs
        .find(|addr| matches!(addr, SocketAddr::V4(_) | SocketAddr::V6(_)))
        .ok_or_else(|| ListenerError::ResolveEmpty {
            host: host.to_owned(),
            port,
        })?;
    TcpListener::bind(addr).map_err(|source| ListenerError::BindTcp { addr, source })
}
