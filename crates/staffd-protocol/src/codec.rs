//! Line codec for envelopes.

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::envelope::{RequestEnvelope, ResponseEnvelope};

/// Failures turning a line into an envelope or back.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The line held nothing but whitespace.
    #[error("empty request line")]
    EmptyLine,
    /// The line was not a JSON envelope of the expected shape.
    #[error("{message}")]
    Malformed {
        /// Parser diagnostic.
        message: String,
        /// Underlying parser error.
        #[source]
        source: serde_json::Error,
    },
    /// A request envelope named no action.
    #[error("action field is empty")]
    EmptyAction,
    /// An envelope could not be serialised.
    #[error("failed to encode envelope: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ProtocolError {
    fn malformed(source: serde_json::Error) -> Self {
        Self::Malformed {
            message: source.to_string(),
            source,
        }
    }
}

/// Decodes one request line.
///
/// Trailing whitespace, including the newline delimiter, is ignored.
///
/// # Errors
///
/// Returns [`ProtocolError::EmptyLine`] for blank input,
/// [`ProtocolError::Malformed`] when the text is not a request envelope, and
/// [`ProtocolError::EmptyAction`] when the envelope names no action.
pub fn decode_request(line: &[u8]) -> Result<RequestEnvelope, ProtocolError> {
    let request: RequestEnvelope = decode(line)?;
    if request.action().trim().is_empty() {
        return Err(ProtocolError::EmptyAction);
    }
    Ok(request)
}

/// Decodes one response line.
///
/// # Errors
///
/// Returns [`ProtocolError::EmptyLine`] for blank input and
/// [`ProtocolError::Malformed`] when the text is not a response envelope.
pub fn decode_response(line: &[u8]) -> Result<ResponseEnvelope, ProtocolError> {
    decode(line)
}

/// Serialises an envelope as a single newline-terminated line.
///
/// # Errors
///
/// Returns [`ProtocolError::Encode`] if serialisation fails.
pub fn encode_line<T: Serialize>(envelope: &T) -> Result<Vec<u8>, ProtocolError> {
    let mut line = serde_json::to_vec(envelope).map_err(ProtocolError::Encode)?;
    line.push(b'\n');
    Ok(line)
}

fn decode<T: DeserializeOwned>(line: &[u8]) -> Result<T, ProtocolError> {
    let trimmed = line.trim_ascii_end();
    if trimmed.is_empty() {
        return Err(ProtocolError::EmptyLine);
    }
    serde_json::from_slice(trimmed).map_err(ProtocolError::malformed)
}
