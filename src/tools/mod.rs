//! Tool engine — schema, binding, request construction, dispatch.
//!
//! Tools are declared as [`ToolSpec`] data. At call time the registry binds
//! raw JSON arguments against the spec, builds a deterministic backend
//! request, sends it through the configured [`crate::transport::Transport`]
//! and wraps the outcome in a [`CallResult`].

pub mod binder;
pub mod catalog;
pub mod manifest;
pub mod registry;
pub mod request;
pub mod result;
pub mod schema;

pub use binder::{bind, BoundArguments, BoundValue, RawArguments};
pub use catalog::builtin_tools;
pub use manifest::{catalog_file_schema, input_schema, load_catalog_file, ToolManifestEntry};
pub use registry::{ToolRegistry, ToolRegistryBuilder};
pub use request::{build, RequestDescriptor};
pub use result::CallResult;
pub use schema::{ArrayStyle, Binding, HttpMethod, ParamDef, ParamType, ToolSpec};
