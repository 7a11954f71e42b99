//! Connection handling abstractions for the listener.

use std::io::{self, Read, Write};
use std::net::{Shutdown, SocketAddr, TcpStream};

use tracing::debug;

use super::LISTENER_TARGET;

/// An accepted client connection.
#[derive(Debug)]
pub(crate) struct ConnectionStream {
    stream: TcpStream,
    peer: Option<SocketAddr>,
}

impl ConnectionStream {
    pub(crate) fn new(stream: TcpStream) -> Self {
        let peer = stream.peer_addr().ok();
        Self { stream, peer }
    }

    /// Remote address, when the OS reported one at accept time.
    pub(crate) const fn peer(&self) -> Option<SocketAddr> {
        self.peer
    }

    /// Opens a second handle onto the same socket so reads and writes can be
    /// buffered independently.
    pub(crate) fn try_clone(&self) -> io::Result<Self> {
        Ok(Self {
            stream: self.stream.try_clone()?,
            peer: self.peer,
        })
    }

    /// Closes both directions of the connection.
    pub(crate) fn close(&self) {
        if let Err(error) = self.stream.shutdown(Shutdown::Both)
            && error.kind() != io::ErrorKind::NotConnected
        {
            debug!(
                target: LISTENER_TARGET,
                error = %error,
                "failed to shut down connection"
            );
        }
    }
}

impl Read for ConnectionStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Write for ConnectionStream {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.flush()
    }
}

/// Handles accepted socket connections.
pub(crate) trait ConnectionHandler: Send + Sync + 'static {
    /// Serves a connection until the peer goes away. Runs on a pool worker.
    /// Implementations should avoid panicking.
    fn handle(&self, stream: ConnectionStream);

    /// Turns away a connection the pool has no room for. Runs on the
    /// acceptor thread, so it must not block on the peer.
    fn reject(&self, stream: ConnectionStream) {
        debug!(
            target: LISTENER_TARGET,
            peer = ?stream.peer(),
            "dropping connection without a free worker"
        );
        stream.close();
    }
}
