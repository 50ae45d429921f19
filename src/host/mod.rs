//! Stdio tool host — newline-delimited JSON-RPC 2.0 over stdin/stdout.
//!
//! Serves `initialize`, `ping`, `tools/list` and `tools/call`, plus the
//! `notifications/cancelled` notification for in-flight calls.

pub mod codec;
pub mod handlers;
pub mod server;

pub use server::StdioHost;
