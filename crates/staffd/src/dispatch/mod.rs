//! Line-delimited JSON request dispatch.
//!
//! This module implements the per-connection session loop and the action
//! router behind it. The session integrates with the transport layer through
//! the `ConnectionHandler` trait.
//!
//! ## Protocol
//!
//! Clients send one request envelope per line:
//!
//! ```json
//! {"action":"getMeetings","data":{},"userId":"EMP003"}
//! ```
//!
//! and receive exactly one response envelope per request, in order:
//!
//! ```json
//! {"status":"success","message":"Meetings retrieved","data":[]}
//! ```
//!
//! ## Routing
//!
//! Actions are looked up by exact name in a registry, built once per router,
//! that binds each name to its handler. The handler decodes the request's
//! `data` into the typed payload of its action, and identity-bearing actions
//! take the acting user from `userId`.

mod action;
mod arguments;
mod errors;
mod handler;
mod handlers;
mod response;
mod router;

pub use self::action::Action;
pub use self::errors::DispatchError;
pub use self::handler::{BUSY_MESSAGE, SessionHandler};
pub use self::router::Router;
