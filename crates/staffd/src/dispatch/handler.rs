//! Connection session that serves line-delimited requests.
//!
//! A session owns one accepted connection. It reads one line, decodes it,
//! routes it, and writes the response before reading the next line, so a
//! connection never has two requests in flight and responses come back in
//! request order. The session ends when the peer closes its side, when the
//! socket fails, or when a line exceeds the size limit.

use std::io::{self, BufRead, BufReader};
use std::sync::Arc;

use staffd_protocol::{ResponseEnvelope, decode_request};
use tracing::{debug, warn};

use crate::transport::{ConnectionHandler, ConnectionStream};

use super::errors::DispatchError;
use super::response::ResponseWriter;
use super::router::{DISPATCH_TARGET, Router};

/// Message sent to connections turned away for lack of capacity.
pub const BUSY_MESSAGE: &str = "Server busy, try again later";

/// Connection handler running one request session per connection.
#[derive(Debug)]
pub struct SessionHandler {
    router: Arc<Router>,
    max_request_bytes: usize,
}

impl SessionHandler {
    /// Creates a handler that routes through `router` and refuses lines longer
    /// than `max_request_bytes`.
    pub const fn new(router: Arc<Router>, max_request_bytes: usize) -> Self {
        Self {
            router,
            max_request_bytes,
        }
    }

    fn serve(&self, stream: ConnectionStream) -> Result<(), DispatchError> {
        let peer = stream.peer();
        let mut reader = BufReader::new(stream.try_clone()?);
        let mut writer = ResponseWriter::new(stream);
        let mut served = 0_u64;
        loop {
            let line = match read_request_line(&mut reader, self.max_request_bytes) {
                Ok(Some(line)) => line,
                Ok(None) => {
                    debug!(target: DISPATCH_TARGET, ?peer, served, "client disconnected");
                    return Ok(());
                }
                Err(error @ DispatchError::RequestTooLarge { .. }) => {
                    warn!(target: DISPATCH_TARGET, ?peer, %error, "closing session");
                    writer.write_error(&error)?;
                    return Ok(());
                }
                Err(error) => return Err(error),
            };
            let response = self.respond(&line);
            writer.write_response(&response)?;
            served += 1;
        }
    }

    fn respond(&self, line: &[u8]) -> ResponseEnvelope {
        match decode_request(line) {
            Ok(request) => self.router.dispatch(&request),
            Err(error) => {
                let error = DispatchError::from(error);
                warn!(target: DISPATCH_TARGET, %error, "malformed request");
                error.to_response()
            }
        }
    }
}

impl ConnectionHandler for SessionHandler {
    fn handle(&self, stream: ConnectionStream) {
        let peer = stream.peer();
        if let Err(error) = self.serve(stream) {
            debug!(target: DISPATCH_TARGET, ?peer, %error, "session ended by connection error");
        }
    }

    fn reject(&self, mut stream: ConnectionStream) {
        let mut writer = ResponseWriter::new(&mut stream);
        if let Err(error) = writer.write_response(&ResponseEnvelope::error(BUSY_MESSAGE)) {
            debug!(target: DISPATCH_TARGET, %error, "failed to notify rejected client");
        }
        stream.close();
    }
}

/// Reads one newline-terminated line of at most `max_bytes` bytes, excluding
/// the delimiter.
///
/// Returns `Ok(None)` at end of stream with nothing buffered. A final line
/// without a delimiter is returned as-is.
fn read_request_line<R: BufRead>(
    reader: &mut R,
    max_bytes: usize,
) -> Result<Option<Vec<u8>>, DispatchError> {
    let mut line = Vec::new();
    loop {
        let available = match reader.fill_buf() {
            Ok(available) => available,
            Err(error) if error.kind() == io::ErrorKind::Interrupted => continue,
            Err(error) => return Err(error.into()),
        };
        if available.is_empty() {
            return Ok((!line.is_empty()).then_some(line));
        }
        let (chunk, consumed, complete) = match available.iter().position(|byte| *byte == b'\n') {
            Some(position) => (available.get(..position).unwrap_or_default(), position + 1, true),
            None => (available, available.len(), false),
        };
        if line.len() + chunk.len() > max_bytes {
            return Err(DispatchError::request_too_large(
                line.len() + chunk.len(),
                max_bytes,
            ));
        }
        line.extend_from_slice(chunk);
        reader.consume(consumed);
        if complete {
            return Ok(Some(line));
        }
    }
}
