//! Argument binding — validate and coerce raw call arguments against a spec.
//!
//! Arguments arrive as a loosely-typed JSON object (numbers may be floats even
//! when they represent integers). Binding walks the declared parameters in
//! order and produces a [`BoundArguments`] of tagged [`BoundValue`]s, or the
//! first [`BindError`] encountered. Binding is pure: no I/O, no shared state.

use serde_json::Value;

use crate::tools::schema::{ParamType, ToolSpec};
use crate::types::BindError;

/// Raw arguments as received from the calling protocol.
pub type RawArguments = serde_json::Map<String, Value>;

/// A schema-conformant argument value.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    List(Vec<String>),
}

impl BoundValue {
    /// Textual form of a scalar value; lists are comma-joined.
    pub fn render(&self) -> String {
        match self {
            BoundValue::Str(s) => s.clone(),
            BoundValue::Int(i) => i.to_string(),
            BoundValue::Float(f) => f.to_string(),
            BoundValue::Bool(b) => b.to_string(),
            BoundValue::List(items) => items.join(","),
        }
    }

    /// JSON form used for request bodies.
    pub fn to_json(&self) -> Value {
        match self {
            BoundValue::Str(s) => Value::String(s.clone()),
            BoundValue::Int(i) => Value::from(*i),
            BoundValue::Float(f) => Value::from(*f),
            BoundValue::Bool(b) => Value::Bool(*b),
            BoundValue::List(items) => {
                Value::Array(items.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// Validated arguments in parameter declaration order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundArguments {
    entries: Vec<(String, BoundValue)>,
}

impl BoundArguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a bound value. The first value bound under a name is kept.
    pub fn insert(&mut self, name: impl Into<String>, value: BoundValue) {
        let name = name.into();
        if self.get(&name).is_none() {
            self.entries.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&BoundValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BoundValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Bind raw arguments to a tool's declared parameters.
///
/// For each parameter in declaration order: a present value is type-checked
/// and coerced; an absent (or `null`) value falls back to the declared default,
/// is skipped when optional, and fails with `MissingRequiredParameter` when
/// required. Undeclared arguments are ignored.
pub fn bind(spec: &ToolSpec, raw: &RawArguments) -> Result<BoundArguments, BindError> {
    let mut bound = BoundArguments::new();

    for param in &spec.params {
        match raw.get(&param.name).filter(|v| !v.is_null()) {
            Some(value) => {
                bound.insert(&param.name, coerce(&param.name, &param.param_type, value)?);
            }
            None => {
                if let Some(default) = &param.default {
                    bound.insert(&param.name, coerce(&param.name, &param.param_type, default)?);
                } else if param.required {
                    return Err(BindError::MissingRequiredParameter {
                        name: param.name.clone(),
                    });
                }
            }
        }
    }

    for key in raw.keys() {
        if spec.param_def(key).is_none() {
            tracing::debug!(tool = %spec.name, argument = %key, "ignoring undeclared argument");
        }
    }

    Ok(bound)
}

/// Type-check and coerce one value against a parameter type.
pub(crate) fn coerce(
    name: &str,
    param_type: &ParamType,
    value: &Value,
) -> Result<BoundValue, BindError> {
    match param_type {
        ParamType::String => value
            .as_str()
            .map(|s| BoundValue::Str(s.to_string()))
            .ok_or_else(|| mismatch(name, "string", value)),
        ParamType::Int => coerce_int(name, value),
        ParamType::Float => value
            .as_f64()
            .map(BoundValue::Float)
            .ok_or_else(|| mismatch(name, "number", value)),
        ParamType::Bool => value
            .as_bool()
            .map(BoundValue::Bool)
            .ok_or_else(|| mismatch(name, "boolean", value)),
        ParamType::StringList => {
            let items = value
                .as_array()
                .ok_or_else(|| mismatch(name, "array of strings", value))?;
            items
                .iter()
                .enumerate()
                .map(|(i, item)| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| mismatch(&format!("{}[{}]", name, i), "string", item))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(BoundValue::List)
        }
        ParamType::Enum(variants) => {
            let s = value
                .as_str()
                .ok_or_else(|| mismatch(name, "string", value))?;
            if variants.iter().any(|v| v == s) {
                Ok(BoundValue::Str(s.to_string()))
            } else {
                Err(BindError::EnumViolation {
                    name: name.to_string(),
                    value: s.to_string(),
                    allowed: variants.clone(),
                })
            }
        }
    }
}

// 2^63 as f64; every integral f64 strictly below it fits in i64.
const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

fn coerce_int(name: &str, value: &Value) -> Result<BoundValue, BindError> {
    if let Some(i) = value.as_i64() {
        return Ok(BoundValue::Int(i));
    }
    if value.is_u64() {
        return Err(BindError::TypeMismatch {
            name: name.to_string(),
            expected: "integer".to_string(),
            got: format!("out-of-range number {}", value),
        });
    }
    match value.as_f64() {
        Some(f) if f.fract() != 0.0 => Err(BindError::TypeMismatch {
            name: name.to_string(),
            expected: "integer".to_string(),
            got: format!("fractional number {}", f),
        }),
        Some(f) if (-I64_BOUND..I64_BOUND).contains(&f) => Ok(BoundValue::Int(f as i64)),
        Some(f) => Err(BindError::TypeMismatch {
            name: name.to_string(),
            expected: "integer".to_string(),
            got: format!("out-of-range number {}", f),
        }),
        None => Err(mismatch(name, "integer", value)),
    }
}

fn mismatch(name: &str, expected: &str, value: &Value) -> BindError {
    BindError::TypeMismatch {
        name: name.to_string(),
        expected: expected.to_string(),
        got: value_type_name(value).to_string(),
    }
}

pub(crate) fn value_type_name(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Tests
// =============================================================================
