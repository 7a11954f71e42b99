//! Action routing for decoded requests.
//!
//! The router resolves the action name to its registered handler, runs it,
//! and folds the outcome into a [`ResponseEnvelope`]. Every failure, panics included, ends
//! up as an error envelope: nothing escapes into the session loop.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use staffd_protocol::{RequestEnvelope, ResponseEnvelope};
use staffd_store::DataStore;
use tracing::{debug, error, warn};

use super::action::ActionRegistry;
use super::errors::DispatchError;
use super::handlers::{self, Reply};

/// Tracing target for dispatch operations.
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// Routes requests to action handlers backed by a shared store.
#[derive(Clone)]
pub struct Router {
    registry: ActionRegistry,
    store: Arc<dyn DataStore>,
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("actions", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl Router {
    /// Creates a router whose handlers all use `store`.
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        Self {
            registry: handlers::registry(),
            store,
        }
    }

    /// Produces exactly one response for `request`.
    pub fn dispatch(&self, request: &RequestEnvelope) -> ResponseEnvelope {
        match self.route(request) {
            Ok(reply) => match reply.data {
                Some(data) => ResponseEnvelope::success_with(reply.message, data),
                None => ResponseEnvelope::success(reply.message),
            },
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    action = request.action(),
                    %error,
                    "request failed"
                );
                error.to_response()
            }
        }
    }

    fn route(&self, request: &RequestEnvelope) -> Result<Reply, DispatchError> {
        let route = self
            .registry
            .resolve(request.action())
            .ok_or_else(|| DispatchError::unknown_action(request.action()))?;
        let action = route.action;
        debug!(
            target: DISPATCH_TARGET,
            action = action.as_str(),
            user = request.user_id(),
            "routing request"
        );
        let store = self.store.as_ref();
        let user_id = request.user_id();
        let data = request.data_value();
        panic::catch_unwind(AssertUnwindSafe(|| (route.handler)(store, user_id, data)))
            .unwrap_or_else(|payload| {
                let message = panic_message(payload.as_ref());
                error!(
                    target: DISPATCH_TARGET,
                    action = action.as_str(),
                    panic = %message,
                    "handler panicked"
                );
                Err(DispatchError::internal(message))
            })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|message| (*message).to_owned())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "handler panicked".to_owned())
}
