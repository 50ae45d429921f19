//! Backend transport — the single outbound seam of the adapter.
//!
//! The adapter builds a target path (`/index.php?m=user&f=delete&t=json&userID=42`)
//! and hands it to a [`Transport`]. Authentication, base URLs, timeouts and
//! TLS all live behind this trait.

pub mod http;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::types::TransportError;

pub use http::HttpTransport;

/// Performs backend requests on behalf of the registry.
///
/// Implementations must be safe to call from many tasks at once; the
/// registry shares one instance behind an `Arc` and never locks around it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET for `path` (path plus encoded query).
    async fn get(&self, path: &str) -> Result<Bytes, TransportError>;

    /// Issue a POST for `path` with an optional JSON body.
    async fn post(&self, path: &str, body: Option<Value>) -> Result<Bytes, TransportError>;
}
