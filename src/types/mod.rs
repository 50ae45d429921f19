//! Core types for the adapter.
//!
//! This module provides foundational types used throughout the crate:
//! - **IDs**: Strongly-typed identifiers (CallId)
//! - **Errors**: Error taxonomy with thiserror derives
//! - **Config**: Configuration structures for backend, tools, host, and logging

mod config;
mod errors;
mod ids;

pub use config::{
    BackendConfig, Config, HostConfig, ObservabilityConfig, ToolsConfig, ENV_BASE_URL,
    ENV_CATALOG, ENV_TIMEOUT, MAX_LINE_BYTES_LIMIT,
};
pub use errors::{BindError, Error, ErrorKind, Result, TransportError};
pub use ids::CallId;
