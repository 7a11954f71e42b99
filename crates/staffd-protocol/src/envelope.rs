//! Request and response envelopes.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A client request as it appears on the wire.
///
/// `data` carries action-specific fields whose shape is only known once the
/// action has been resolved. `userId` names the acting user; servers take
/// identity from it rather than from `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestEnvelope {
    action: String,
    #[serde(default)]
    data: Option<Map<String, Value>>,
    #[serde(default)]
    user_id: Option<String>,
}

impl RequestEnvelope {
    /// Creates a request with no payload and no acting user.
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            data: None,
            user_id: None,
        }
    }

    /// Sets the action payload.
    #[must_use]
    pub fn with_data(mut self, data: Map<String, Value>) -> Self {
        self.data = Some(data);
        self
    }

    /// Sets the acting user.
    #[must_use]
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    /// Action name, exactly as sent.
    #[must_use]
    pub fn action(&self) -> &str {
        self.action.as_str()
    }

    /// Payload fields; empty when the client sent `null` or omitted `data`.
    #[must_use]
    pub fn data(&self) -> Option<&Map<String, Value>> {
        self.data.as_ref()
    }

    /// Payload as a JSON object, substituting an empty object when absent.
    #[must_use]
    pub fn data_value(&self) -> Value {
        Value::Object(self.data.clone().unwrap_or_default())
    }

    /// Acting user exactly as sent. Blank values count as absent.
    #[must_use]
    pub fn user_id(&self) -> Option<&str> {
        self.user_id
            .as_deref()
            .filter(|user| !user.trim().is_empty())
    }
}

/// Outcome marker of a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    /// The operation completed.
    Success,
    /// The request or operation failed; `message` explains why.
    Error,
}

/// A server response as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    status: Status,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

impl ResponseEnvelope {
    /// Creates a success response without a payload.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            data: None,
        }
    }

    /// Creates a success response carrying `data`.
    #[must_use]
    pub fn success_with(message: impl Into<String>, data: Value) -> Self {
        Self {
            status: Status::Success,
            message: message.into(),
            data: Some(data),
        }
    }

    /// Creates an error response. Error responses never carry data.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            message: message.into(),
            data: None,
        }
    }

    /// Outcome marker.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// Reports whether the status is [`Status::Success`].
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }

    /// Human-readable outcome.
    #[must_use]
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Result payload, if any.
    #[must_use]
    pub const fn data(&self) -> Option<&Value> {
        self.data.as_ref()
    }
}
