//! Response framing for the session loop.

use std::io::Write;

use staffd_protocol::{ResponseEnvelope, encode_line};

use super::errors::DispatchError;

/// Writer that frames response envelopes as newline-terminated lines.
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Creates a new response writer wrapping the given output stream.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes one response line and flushes it to the peer.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, writing, or flushing fails.
    pub fn write_response(&mut self, response: &ResponseEnvelope) -> Result<(), DispatchError> {
        let line = encode_line(response)?;
        self.writer.write_all(&line)?;
        self.writer.flush()?;
        Ok(())
    }

    /// Writes the envelope a client sees for `error`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_error(&mut self, error: &DispatchError) -> Result<(), DispatchError> {
        self.write_response(&error.to_response())
    }
}
