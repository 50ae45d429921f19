//! Tool registry — immutable name → spec table plus the dispatch pipeline.
//!
//! Built once at startup through [`ToolRegistryBuilder`], then shared as
//! `Arc<ToolRegistry>` across concurrent calls. Each dispatch runs
//! bind → build → execute → wrap with no retries and no state carried
//! between calls.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::tools::binder::{self, RawArguments};
use crate::tools::catalog::builtin_tools;
use crate::tools::manifest::{load_catalog_file, ToolManifestEntry};
use crate::tools::request::{self, RequestDescriptor};
use crate::tools::result::CallResult;
use crate::tools::schema::{HttpMethod, ToolSpec};
use crate::transport::Transport;
use crate::types::{CallId, Error, Result, ToolsConfig, TransportError};

// =============================================================================
// Builder
// =============================================================================

/// Collects tool specs before the registry is frozen.
#[derive(Debug, Default)]
pub struct ToolRegistryBuilder {
    specs: Vec<ToolSpec>,
}

impl ToolRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder seeded from configuration: the built-in catalog (unless
    /// disabled) followed by the specs of the configured catalog file.
    pub fn from_config(config: &ToolsConfig) -> Result<Self> {
        let mut builder = Self::new();
        if config.include_builtin {
            builder = builder.extend(builtin_tools());
        }
        if let Some(path) = &config.catalog_path {
            builder = builder.extend(load_catalog_file(path)?);
        }
        Ok(builder)
    }

    pub fn register(mut self, spec: ToolSpec) -> Self {
        self.specs.push(spec);
        self
    }

    pub fn extend(mut self, specs: impl IntoIterator<Item = ToolSpec>) -> Self {
        self.specs.extend(specs);
        self
    }

    /// Validate every spec and freeze the table.
    ///
    /// Any malformed spec or duplicate name is a configuration error.
    pub fn build(self, transport: Arc<dyn Transport>) -> Result<ToolRegistry> {
        let mut tools = HashMap::with_capacity(self.specs.len());
        for spec in self.specs {
            spec.validate()?;
            if tools.contains_key(&spec.name) {
                return Err(Error::config(format!("duplicate tool name: {}", spec.name)));
            }
            tools.insert(spec.name.clone(), spec);
        }

        tracing::info!(tools = tools.len(), "tool registry built");
        Ok(ToolRegistry { tools, transport })
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Read-only tool table bound to one backend transport.
pub struct ToolRegistry {
    tools: HashMap<String, ToolSpec>,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names())
            .finish_non_exhaustive()
    }
}

impl ToolRegistry {
    pub fn builder() -> ToolRegistryBuilder {
        ToolRegistryBuilder::new()
    }

    pub fn get(&self, name: &str) -> Option<&ToolSpec> {
        self.tools.get(name)
    }

    /// Registered tool names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Discovery entries for every tool, sorted by name.
    pub fn manifest(&self) -> Vec<ToolManifestEntry> {
        self.sorted_specs()
            .into_iter()
            .map(ToolManifestEntry::from_spec)
            .collect()
    }

    /// Generate a tool description block for prompts.
    ///
    /// With `allowed`, only the listed tools appear, in the given order;
    /// unknown names are skipped.
    pub fn generate_prompt(&self, allowed: Option<&[String]>) -> String {
        let specs: Vec<&ToolSpec> = match allowed {
            Some(allowed) => allowed.iter().filter_map(|name| self.tools.get(name)).collect(),
            None => self.sorted_specs(),
        };

        if specs.is_empty() {
            return String::new();
        }

        let mut lines = Vec::with_capacity(specs.len() + 1);
        lines.push("Available tools:".to_string());
        lines.extend(specs.iter().map(|spec| spec.to_prompt_line()));
        lines.join("\n")
    }

    /// Bind and build without sending: the request `dispatch` would issue.
    pub fn prepare(&self, name: &str, args: &RawArguments) -> Result<RequestDescriptor> {
        let spec = self.get(name).ok_or_else(|| Error::unknown_tool(name))?;
        let bound = binder::bind(spec, args)?;
        Ok(request::build(spec, &bound)?)
    }

    /// Run one tool call to completion.
    pub async fn dispatch(&self, name: &str, args: &RawArguments) -> CallResult {
        self.dispatch_with_cancel(name, args, &CancellationToken::new())
            .await
    }

    /// Run one tool call, abandoning the backend request if `cancel` fires.
    ///
    /// Never fails: every error is folded into the returned [`CallResult`].
    pub async fn dispatch_with_cancel(
        &self,
        name: &str,
        args: &RawArguments,
        cancel: &CancellationToken,
    ) -> CallResult {
        let call_id = CallId::new();
        let span = tracing::info_span!("tool_call", tool = %name, call_id = %call_id);

        async {
            match self.execute(name, args, cancel).await {
                Ok(payload) => {
                    tracing::debug!(bytes = payload.len(), "tool call succeeded");
                    CallResult::wrap(Ok(payload))
                }
                Err(err) => {
                    tracing::warn!("tool call failed: {}", err);
                    CallResult::from_error(&err)
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn execute(
        &self,
        name: &str,
        args: &RawArguments,
        cancel: &CancellationToken,
    ) -> Result<Bytes> {
        let request = self.prepare(name, args)?;
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled.into());
        }

        let target = request.target();
        tracing::debug!(method = %request.method, %target, "sending backend request");

        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::Cancelled),
            outcome = self.send(request.method, &target, request.body) => outcome,
        };
        Ok(outcome?)
    }

    async fn send(
        &self,
        method: HttpMethod,
        target: &str,
        body: Option<serde_json::Value>,
    ) -> std::result::Result<Bytes, TransportError> {
        match method {
            HttpMethod::Get => self.transport.get(target).await,
            HttpMethod::Post => self.transport.post(target, body).await,
        }
    }

    fn sorted_specs(&self) -> Vec<&ToolSpec> {
        let mut specs: Vec<&ToolSpec> = self.tools.values().collect();
        specs.sort_by(|a, b| a.name.cmp(&b.name));
        specs
    }
}

// =============================================================================
// Tests
// =============================================================================
