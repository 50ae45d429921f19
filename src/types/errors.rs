//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context. Call-time failures carry an
//! [`ErrorKind`] so hosts and tests can tell categories apart without
//! matching on message text.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Argument binding failures, raised before any request is built or sent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("missing required parameter: {name}")]
    MissingRequiredParameter { name: String },

    #[error("parameter '{name}': expected {expected}, got {got}")]
    TypeMismatch {
        name: String,
        expected: String,
        got: String,
    },

    #[error(
        "parameter '{name}': invalid value '{value}', expected one of: {}",
        .allowed.join(", ")
    )]
    EnumViolation {
        name: String,
        value: String,
        allowed: Vec<String>,
    },

    #[error("unresolved path placeholder: {name}")]
    UnresolvedPlaceholder { name: String },
}

/// Failures reported by a [`crate::transport::Transport`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection, timeout, or body read failure.
    #[error("request failed: {0}")]
    Request(String),

    /// Backend answered with a non-success status.
    #[error("backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The call was cancelled by the host before the backend answered.
    #[error("request cancelled")]
    Cancelled,

    /// Base URL could not be parsed when the transport was constructed.
    #[error("invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// Coarse failure category attached to a failed call result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    UnknownTool,
    Transport,
    Cancelled,
    Internal,
}

/// Main error enum for the adapter.
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed tool or process configuration (fatal at startup).
    #[error("configuration error: {0}")]
    Config(String),

    /// Arguments rejected by the binder.
    #[error("validation error: {0}")]
    Validation(#[from] BindError),

    /// Dispatch to a tool name that was never registered.
    #[error("unknown tool: {0}")]
    UnknownTool(String),

    /// Host message that is valid JSON but not a request object.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Missing or mistyped method params.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// Host protocol method that this adapter does not serve.
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// Backend transport failure.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// Internal errors.
    #[error("internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Category reported in failed call results.
    pub fn error_kind(&self) -> ErrorKind {
        match self {
            Error::Validation(_) | Error::InvalidRequest(_) | Error::InvalidParams(_) => {
                ErrorKind::Validation
            }
            Error::UnknownTool(_) => ErrorKind::UnknownTool,
            Error::Transport(TransportError::Cancelled) => ErrorKind::Cancelled,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Config(_)
            | Error::MethodNotFound(_)
            | Error::Internal(_)
            | Error::Serialization(_)
            | Error::Io(_) => ErrorKind::Internal,
        }
    }

    /// Convert to a JSON-RPC error code.
    pub fn to_rpc_error_code(&self) -> i64 {
        match self {
            Error::Serialization(_) => -32700,
            Error::MethodNotFound(_) => -32601,
            Error::InvalidRequest(_) => -32600,
            Error::InvalidParams(_) | Error::Validation(_) | Error::UnknownTool(_) => -32602,
            Error::Config(_)
            | Error::Transport(_)
            | Error::Internal(_)
            | Error::Io(_) => -32603,
        }
    }
}

// Convenience constructors
impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn unknown_tool(name: impl Into<String>) -> Self {
        Self::UnknownTool(name.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn invalid_params(msg: impl Into<String>) -> Self {
        Self::InvalidParams(msg.into())
    }

    pub fn method_not_found(method: impl Into<String>) -> Self {
        Self::MethodNotFound(method.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
