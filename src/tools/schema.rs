//! Tool schema model — parameter types, request bindings, tool specs.
//!
//! A [`ToolSpec`] is pure data: which arguments a tool accepts and where each
//! one lands in the outbound request. Specs are checked once by
//! [`ToolSpec::validate`] when the registry is built and never change after.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

use crate::tools::binder;
use crate::types::{Error, Result};
use crate::validation::{validate_non_empty, validate_tool_name};

// =============================================================================
// Parameter types
// =============================================================================

/// Parameter type for tool inputs.
///
/// `Int` and `Float` are both JSON numbers; `Int` additionally requires a zero
/// fractional part. `Enum` is a string restricted to a closed, case-sensitive
/// set of values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    String,
    Int,
    Float,
    Bool,
    StringList,
    Enum(Vec<String>),
}

impl ParamType {
    /// Human-readable type name for prompt generation.
    pub fn display_name(&self) -> String {
        match self {
            ParamType::String => "string".to_string(),
            ParamType::Int => "integer".to_string(),
            ParamType::Float => "number".to_string(),
            ParamType::Bool => "boolean".to_string(),
            ParamType::StringList => "string[]".to_string(),
            ParamType::Enum(variants) => format!("enum({})", variants.join("|")),
        }
    }

    /// JSON Schema `type` keyword for this parameter.
    pub fn json_type(&self) -> &'static str {
        match self {
            ParamType::String | ParamType::Enum(_) => "string",
            ParamType::Int => "integer",
            ParamType::Float => "number",
            ParamType::Bool => "boolean",
            ParamType::StringList => "array",
        }
    }
}

/// Where a bound parameter is placed in the outbound request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Binding {
    #[default]
    Query,
    /// Substituted into a `{name}` placeholder of the path template.
    Path,
    /// Field of the JSON object body (POST tools only).
    Body,
}

/// Query-string encoding for `StringList` parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ArrayStyle {
    /// `key=a,b,c`
    #[default]
    Comma,
    /// `key=a&key=b&key=c`
    Repeat,
}

// =============================================================================
// Parameter definition
// =============================================================================

/// A single parameter definition for a tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ParamDef {
    pub name: String,
    pub param_type: ParamType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub required: bool,
    /// Bound verbatim when the caller omits the parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default)]
    pub binding: Binding,
    /// Key used on the wire when it differs from `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wire_name: Option<String>,
    #[serde(default)]
    pub array_style: ArrayStyle,
}

impl ParamDef {
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            description: String::new(),
            required: false,
            default: None,
            binding: Binding::Query,
            wire_name: None,
            array_style: ArrayStyle::Comma,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::String)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Int)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::Bool)
    }

    pub fn string_list(name: impl Into<String>) -> Self {
        Self::new(name, ParamType::StringList)
    }

    pub fn one_of(name: impl Into<String>, variants: &[&str]) -> Self {
        Self::new(
            name,
            ParamType::Enum(variants.iter().map(|v| v.to_string()).collect()),
        )
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    #[must_use]
    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    #[must_use]
    pub fn in_path(mut self) -> Self {
        self.binding = Binding::Path;
        self
    }

    #[must_use]
    pub fn in_body(mut self) -> Self {
        self.binding = Binding::Body;
        self
    }

    #[must_use]
    pub fn wire(mut self, wire_name: impl Into<String>) -> Self {
        self.wire_name = Some(wire_name.into());
        self
    }

    #[must_use]
    pub fn repeated(mut self) -> Self {
        self.array_style = ArrayStyle::Repeat;
        self
    }

    /// Key used in the query string or body.
    pub fn key(&self) -> &str {
        self.wire_name.as_deref().unwrap_or(&self.name)
    }

    /// A parameter the caller may omit.
    pub fn is_optional(&self) -> bool {
        !self.required || self.default.is_some()
    }
}

// =============================================================================
// Tool spec
// =============================================================================

/// HTTP method of the outbound request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// Complete declaration of one tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub params: Vec<ParamDef>,
    #[serde(default)]
    pub method: HttpMethod,
    /// Request path, optionally with a fixed query prefix and `{param}`
    /// placeholders, e.g. `/index.php?m=task&f=view&t=json&taskID={taskID}`.
    pub path_template: String,
}

impl ToolSpec {
    pub fn get(
        name: impl Into<String>,
        description: impl Into<String>,
        path_template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            params: Vec::new(),
            method: HttpMethod::Get,
            path_template: path_template.into(),
        }
    }

    pub fn post(
        name: impl Into<String>,
        description: impl Into<String>,
        path_template: impl Into<String>,
    ) -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::get(name, description, path_template)
        }
    }

    #[must_use]
    pub fn param(mut self, param: ParamDef) -> Self {
        self.params.push(param);
        self
    }

    /// Look up a declared parameter by name.
    pub fn param_def(&self, name: &str) -> Option<&ParamDef> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Check the construction-time invariants of this spec.
    ///
    /// Called when the registry is built; any failure is a configuration
    /// error that must stop startup.
    pub fn validate(&self) -> Result<()> {
        validate_tool_name(&self.name)?;
        let context = |msg: String| Error::config(format!("tool '{}': {}", self.name, msg));

        if !self.path_template.starts_with('/') {
            return Err(context(format!(
                "path template '{}' must start with '/'",
                self.path_template
            )));
        }
        let placeholders = placeholders(&self.path_template).map_err(context)?;
        let fixed_keys = fixed_query_keys(&self.path_template);

        let mut names = HashSet::new();
        let mut keys = HashSet::new();
        for param in &self.params {
            validate_non_empty(&param.name, "parameter name")
                .map_err(|e| context(e.to_string()))?;
            if !names.insert(param.name.as_str()) {
                return Err(context(format!("duplicate parameter '{}'", param.name)));
            }
            if param.binding != Binding::Path && !keys.insert((param.binding, param.key())) {
                return Err(context(format!(
                    "parameter '{}' reuses wire key '{}'",
                    param.name,
                    param.key()
                )));
            }
            if param.binding == Binding::Query && fixed_keys.contains(&param.key()) {
                return Err(context(format!(
                    "query parameter '{}' repeats key '{}' fixed in '{}'",
                    param.name,
                    param.key(),
                    self.path_template
                )));
            }
            if let ParamType::Enum(variants) = &param.param_type {
                if variants.is_empty() {
                    return Err(context(format!(
                        "parameter '{}' has an empty enum",
                        param.name
                    )));
                }
            }
            if let Some(default) = &param.default {
                binder::coerce(&param.name, &param.param_type, default).map_err(|e| {
                    context(format!("default for '{}' is invalid: {}", param.name, e))
                })?;
            }
            match param.binding {
                Binding::Body if self.method == HttpMethod::Get => {
                    return Err(context(format!(
                        "body parameter '{}' on a GET tool",
                        param.name
                    )));
                }
                Binding::Path => {
                    if !placeholders.contains(&param.name.as_str()) {
                        return Err(context(format!(
                            "path parameter '{}' has no placeholder in '{}'",
                            param.name, self.path_template
                        )));
                    }
                    if param.is_optional() && param.default.is_none() {
                        return Err(context(format!(
                            "path parameter '{}' must be required or carry a default",
                            param.name
                        )));
                    }
                    if param.param_type == ParamType::StringList {
                        return Err(context(format!(
                            "path parameter '{}' cannot be a list",
                            param.name
                        )));
                    }
                }
                _ => {}
            }
        }

        for placeholder in &placeholders {
            let bound_to_path = self
                .param_def(placeholder)
                .is_some_and(|p| p.binding == Binding::Path);
            if !bound_to_path {
                return Err(context(format!(
                    "placeholder '{{{}}}' is not a declared path parameter",
                    placeholder
                )));
            }
        }

        Ok(())
    }

    /// Generate a prompt line for this tool.
    ///
    /// Format: `- tool_name(param1: type, param2?: type): description`
    pub fn to_prompt_line(&self) -> String {
        let params: Vec<String> = self
            .params
            .iter()
            .map(|p| {
                let optional = if p.is_optional() { "?" } else { "" };
                format!("{}{}: {}", p.name, optional, p.param_type.display_name())
            })
            .collect();

        format!("- {}({}): {}", self.name, params.join(", "), self.description)
    }
}

/// Names of the `{placeholder}` segments in a path template, in order.
pub(crate) fn placeholders(template: &str) -> std::result::Result<Vec<&str>, String> {
    let mut found = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        let after = &rest[open + 1..];
        let close = after
            .find('}')
            .ok_or_else(|| format!("unterminated placeholder in '{}'", template))?;
        let name = &after[..close];
        if name.is_empty() || name.contains('{') {
            return Err(format!("malformed placeholder in '{}'", template));
        }
        found.push(name);
        rest = &after[close + 1..];
    }
    Ok(found)
}

/// Keys of the query pairs written directly into a path template.
fn fixed_query_keys(template: &str) -> Vec<&str> {
    let Some((_, query)) = template.split_once('?') else {
        return Vec::new();
    };
    query
        .split('&')
        .map(|pair| pair.split_once('=').map_or(pair, |(key, _)| key))
        .filter(|key| !key.is_empty())
        .collect()
}

// =============================================================================
// Tests
// =============================================================================
