//! Wire protocol shared by the staffd server and its clients.
//!
//! Every message is one UTF-8 JSON object terminated by `\n`. A client sends
//! a [`RequestEnvelope`] and waits for exactly one [`ResponseEnvelope`] before
//! sending the next request on the same connection:
//!
//! ```json
//! {"action":"getDashboardStats","data":{},"userId":"EMP001"}
//! {"status":"success","message":"Dashboard stats retrieved","data":{"totalEmployees":4}}
//! ```
//!
//! There is no framing beyond the newline delimiter.

mod codec;
mod envelope;

pub use codec::{ProtocolError, decode_request, decode_response, encode_line};
pub use envelope::{RequestEnvelope, ResponseEnvelope, Status};
