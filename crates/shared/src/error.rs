use std::{fmt, sync::Arc};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    Forbidden,
    NotFound,
    Validation,
    RateLimited,
    Internal,
}

/// JSON body a server attaches to a failed response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<ErrorCode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            message: Some(message.into()),
        }
    }
}

/// A failed request as observed by the client: status plus whatever JSON came back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseFailure {
    pub status: u16,
    #[serde(default)]
    pub response_json: Option<Value>,
}

impl ResponseFailure {
    pub fn new(status: u16, response_json: Option<Value>) -> Self {
        Self {
            status,
            response_json,
        }
    }

    pub fn with_api_error(status: u16, error: &ApiError) -> Self {
        Self {
            status,
            response_json: serde_json::to_value(error).ok(),
        }
    }

    /// Server-provided message, when the body carries a non-empty `message` string.
    pub fn server_message(&self) -> Option<&str> {
        self.response_json
            .as_ref()?
            .get("message")?
            .as_str()
            .filter(|message| !message.is_empty())
    }
}

/// A genuine error object raised somewhere in the client. Displays as its
/// message only; `kind` names the error class (`TypeError`, ...).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientFault {
    pub kind: String,
    pub message: String,
}

impl ClientFault {
    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
        }
    }
}

/// Raw error payload as delivered on the event hub.
#[derive(Clone)]
pub enum ErrorPayload {
    /// Server/response-shaped error.
    Response(ResponseFailure),
    /// A true error object; surfaced and then re-raised.
    Fault(Arc<dyn std::error::Error + Send + Sync>),
    /// Some producers wrap errors in an array; only the first element counts.
    Batch(Vec<ErrorPayload>),
    /// Anything else.
    Opaque(Value),
}

impl ErrorPayload {
    pub fn fault<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ErrorPayload::Fault(Arc::new(error))
    }

    /// Unwraps a leading batch element. An empty batch stays as is.
    pub fn normalized(self) -> ErrorPayload {
        match self {
            ErrorPayload::Batch(mut items) if !items.is_empty() => items.swap_remove(0).normalized(),
            other => other,
        }
    }
}

impl fmt::Debug for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorPayload::Response(failure) => f.debug_tuple("Response").field(failure).finish(),
            ErrorPayload::Fault(error) => f.debug_tuple("Fault").field(&error.to_string()).finish(),
            ErrorPayload::Batch(items) => f.debug_tuple("Batch").field(items).finish(),
            ErrorPayload::Opaque(value) => f.debug_tuple("Opaque").field(value).finish(),
        }
    }
}
