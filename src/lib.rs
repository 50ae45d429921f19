//! # PM Tools Core - Tool-to-REST Adapter Engine
//!
//! Exposes a project-management backend's HTTP/JSON API as a catalog of
//! typed, schema-described tools:
//! - Declarative tool specs (parameters, types, enums, defaults, bindings)
//! - Argument binding with strict coercion (no silent truncation)
//! - Deterministic request construction (path, query, JSON body)
//! - Pluggable backend transport (reqwest by default)
//! - Uniform call results with a typed error category
//! - Newline-delimited JSON-RPC stdio host
//!
//! ## Architecture
//!
//! Every call runs the same linear pipeline against an immutable registry:
//! ```text
//!   host / caller
//!        │  dispatch(name, args)
//!        ▼
//!   ┌────────────────────────────────────────────────────┐
//!   │ ToolRegistry (Arc, read-only)                      │
//!   │   bind ──▶ build ──▶ Transport::get/post ──▶ wrap  │
//!   └────────────────────────────────────────────────────┘
//!        │  CallResult { ok, payload | error_message }
//!        ▼
//! ```

// Enforce strict safety at compile time
#![deny(unsafe_code)]
#![warn(missing_debug_implementations)]
#![warn(rust_2018_idioms)]

pub mod host;
pub mod tools;
pub mod transport;
pub mod types;

// Internal utilities
pub mod observability;
pub mod validation;

pub use types::{Config, Error, Result};
