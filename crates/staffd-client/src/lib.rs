//! Blocking client for the staffd line protocol.
//!
//! A [`Client`] holds one connection and sends one request at a time, waiting
//! for the matching response line before returning. It is used by the
//! server's integration tests and by operational tooling.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use staffd_protocol::{
    ProtocolError, RequestEnvelope, ResponseEnvelope, decode_response, encode_line,
};
use thiserror::Error;

/// Failures talking to a server.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Connecting failed.
    #[error("failed to connect: {0}")]
    Connect(#[source] io::Error),
    /// Reading or writing the socket failed.
    #[error("connection failed: {0}")]
    Io(#[from] io::Error),
    /// The server closed the connection before responding.
    #[error("server closed the connection")]
    Closed,
    /// A request could not be encoded or a response decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// One connection to a staffd server.
#[derive(Debug)]
pub struct Client {
    reader: BufReader<TcpStream>,
    writer: TcpStream,
}

impl Client {
    /// Connects to `addr`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Connect`] when no connection can be made.
    pub fn connect(addr: impl ToSocketAddrs) -> Result<Self, ClientError> {
        let stream = TcpStream::connect(addr).map_err(ClientError::Connect)?;
        let reader = BufReader::new(stream.try_clone().map_err(ClientError::Connect)?);
        Ok(Self {
            reader,
            writer: stream,
        })
    }

    /// Bounds how long a read may block waiting for the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] if the socket rejects the timeout.
    pub fn with_timeout(self, timeout: Duration) -> Result<Self, ClientError> {
        self.writer.set_read_timeout(Some(timeout))?;
        Ok(self)
    }

    /// Sends `request` and waits for its response.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the exchange fails.
    pub fn send(&mut self, request: &RequestEnvelope) -> Result<ResponseEnvelope, ClientError> {
        let line = encode_line(request)?;
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        self.read_response()
    }

    /// Sends `line` verbatim, appending a newline, and waits for a response.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when the exchange fails.
    pub fn send_raw(&mut self, line: &str) -> Result<ResponseEnvelope, ClientError> {
        self.write_raw(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        self.read_response()
    }

    /// Writes bytes without framing or waiting; pairs with
    /// [`read_response`](Self::read_response) for pipelining.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] when the write fails.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<(), ClientError> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    /// Reads the next response line.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Closed`] at end of stream, or a decoding or
    /// socket error.
    pub fn read_response(&mut self) -> Result<ResponseEnvelope, ClientError> {
        self.writer.flush()?;
        let mut line = Vec::new();
        if self.reader.read_until(b'\n', &mut line)? == 0 {
            return Err(ClientError::Closed);
        }
        Ok(decode_response(&line)?)
    }

    /// Closes the sending half, signalling end of requests to the server.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Io`] if the shutdown fails.
    pub fn finish(&self) -> Result<(), ClientError> {
        self.writer.shutdown(std::net::Shutdown::Write)?;
        Ok(())
    }
}
