//! Request construction — map bound arguments onto an outbound request.
//!
//! Building is deterministic: query parameters follow declaration order in
//! the tool spec, never map iteration order, so the same arguments always
//! produce byte-identical targets.

use serde::Serialize;
use serde_json::Value;

use crate::tools::binder::{BoundArguments, BoundValue};
use crate::tools::schema::{ArrayStyle, Binding, HttpMethod, ParamDef, ToolSpec};
use crate::types::BindError;

/// Fully-specified, not-yet-sent backend request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    /// Path template with placeholders filled in.
    pub path: String,
    /// Percent-encoded `(key, value)` pairs in declaration order.
    pub query: Vec<(String, String)>,
    /// JSON object body for POST tools.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

impl RequestDescriptor {
    /// Encoded query string without the leading separator.
    pub fn query_string(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Path plus query, ready to hand to the transport.
    ///
    /// Templates that already carry a query prefix (`/index.php?m=user`)
    /// are extended with `&`; plain paths get a `?`.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let separator = match self.path.find('?') {
            None => "?",
            Some(_) if self.path.ends_with('?') || self.path.ends_with('&') => "",
            Some(_) => "&",
        };
        format!("{}{}{}", self.path, separator, self.query_string())
    }
}

/// Build the outbound request for a tool from already-bound arguments.
///
/// Fails only when a path placeholder has no bound value.
pub fn build(spec: &ToolSpec, bound: &BoundArguments) -> Result<RequestDescriptor, BindError> {
    let path = fill_path(&spec.path_template, bound)?;
    let mut query = Vec::new();
    let mut body = serde_json::Map::new();

    for param in &spec.params {
        let Some(value) = bound.get(&param.name) else {
            continue;
        };
        match (param.binding, spec.method) {
            (Binding::Path, _) => {}
            (Binding::Body, HttpMethod::Post) => {
                body.insert(param.key().to_string(), value.to_json());
            }
            (Binding::Body, HttpMethod::Get) | (Binding::Query, _) => {
                append_query(&mut query, param, value);
            }
        }
    }

    let body = match spec.method {
        HttpMethod::Post => Some(Value::Object(body)),
        HttpMethod::Get => None,
    };

    Ok(RequestDescriptor {
        method: spec.method,
        path,
        query,
        body,
    })
}

fn fill_path(template: &str, bound: &BoundArguments) -> Result<String, BindError> {
    let mut path = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        let name = &rest[open + 1..open + close];
        let value = bound
            .get(name)
            .ok_or_else(|| BindError::UnresolvedPlaceholder {
                name: name.to_string(),
            })?;
        path.push_str(&rest[..open]);
        path.push_str(&urlencoding::encode(&value.render()));
        rest = &rest[open + close + 1..];
    }
    path.push_str(rest);

    Ok(path)
}

fn append_query(query: &mut Vec<(String, String)>, param: &ParamDef, value: &BoundValue) {
    let key = urlencoding::encode(param.key()).into_owned();
    match (value, param.array_style) {
        (BoundValue::List(items), ArrayStyle::Comma) => {
            let joined = items
                .iter()
                .map(|item| urlencoding::encode(item).into_owned())
                .collect::<Vec<_>>()
                .join(",");
            query.push((key, joined));
        }
        (BoundValue::List(items), ArrayStyle::Repeat) => {
            for item in items {
                query.push((key.clone(), urlencoding::encode(item).into_owned()));
            }
        }
        (scalar, _) => {
            query.push((key, urlencoding::encode(&scalar.render()).into_owned()));
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
