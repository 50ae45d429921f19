//! Tool manifest — discovery metadata derived from registered specs.
//!
//! Everything here is computed from [`ToolSpec`] data alone; building a
//! manifest never touches the backend.

use std::path::Path;

use schemars::schema::RootSchema;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::tools::schema::{ParamType, ToolSpec};
use crate::types::{Error, Result};

/// One entry of the host-facing tool list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolManifestEntry {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

impl ToolManifestEntry {
    pub fn from_spec(spec: &ToolSpec) -> Self {
        Self {
            name: spec.name.clone(),
            description: spec.description.clone(),
            input_schema: input_schema(spec),
        }
    }
}

/// JSON Schema object describing a tool's arguments.
///
/// Parameters with a default are not listed as required: the binder fills
/// them in when the caller leaves them out.
pub fn input_schema(spec: &ToolSpec) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for param in &spec.params {
        let mut property = Map::new();
        property.insert("type".to_string(), json!(param.param_type.json_type()));
        match &param.param_type {
            ParamType::Enum(variants) => {
                property.insert("enum".to_string(), json!(variants));
            }
            ParamType::StringList => {
                property.insert("items".to_string(), json!({"type": "string"}));
            }
            _ => {}
        }
        if !param.description.is_empty() {
            property.insert("description".to_string(), json!(param.description));
        }
        if let Some(default) = &param.default {
            property.insert("default".to_string(), default.clone());
        }
        properties.insert(param.name.clone(), Value::Object(property));

        if !param.is_optional() {
            required.push(Value::String(param.name.clone()));
        }
    }

    json!({
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

/// Load additional tool specs from a JSON file holding an array of specs.
///
/// Specs are only parsed here; they are validated with the rest of the
/// catalog when the registry is built.
pub fn load_catalog_file(path: &Path) -> Result<Vec<ToolSpec>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!("cannot read catalog {}: {}", path.display(), e))
    })?;
    let specs: Vec<ToolSpec> = serde_json::from_str(&content).map_err(|e| {
        Error::config(format!("invalid catalog {}: {}", path.display(), e))
    })?;
    tracing::debug!(path = %path.display(), count = specs.len(), "loaded tool catalog");
    Ok(specs)
}

/// JSON Schema for the catalog file format.
pub fn catalog_file_schema() -> RootSchema {
    schemars::schema_for!(Vec<ToolSpec>)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::schema::ParamDef;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    fn create_bug() -> ToolSpec {
        ToolSpec::post("create_bug", "Report a bug", "/index.php?m=bug&f=create&t=json")
            .param(ParamDef::int("productID").required().describe("Product ID"))
            .param(ParamDef::string("title").required().in_body())
            .param(ParamDef::one_of("severity", &["1", "2", "3", "4"]).in_body().default_value(json!("3")))
            .param(ParamDef::string_list("openedBuild").in_body())
    }

    #[test]
    fn test_input_schema_shape() {
        let schema = input_schema(&create_bug());
        assert_eq!(
            schema,
            json!({
                "type": "object",
                "properties": {
                    "productID": {"type": "integer", "description": "Product ID"},
                    "title": {"type": "string"},
                    "severity": {"type": "string", "enum": ["1", "2", "3", "4"], "default": "3"},
                    "openedBuild": {"type": "array", "items": {"type": "string"}}
                },
                "required": ["productID", "title"]
            })
        );
    }

    #[test]
    fn test_input_schema_accepts_what_binder_accepts() {
        let schema = input_schema(&create_bug());
        let validator = jsonschema::validator_for(&schema).unwrap();

        assert!(validator.is_valid(&json!({"productID": 1, "title": "Crash"})));
        assert!(validator.is_valid(&json!({
            "productID": 1,
            "title": "Crash",
            "severity": "1",
            "openedBuild": ["trunk"]
        })));
        assert!(!validator.is_valid(&json!({"title": "Crash"})));
        assert!(!validator.is_valid(&json!({"productID": 1, "title": "Crash", "severity": "9"})));
    }

    #[test]
    fn test_manifest_entry_serializes_camel_case() {
        let entry = ToolManifestEntry::from_spec(&create_bug());
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["name"], "create_bug");
        assert!(value.get("inputSchema").is_some());
    }

    #[test]
    fn test_load_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{
                "name": "list_docs",
                "description": "List documents",
                "method": "GET",
                "path_template": "/index.php?m=doc&f=browse&t=json",
                "params": [
                    {{"name": "libID", "param_type": "int", "required": true}},
                    {{"name": "type", "param_type": {{"enum": ["text", "url"]}}}}
                ]
            }}]"#
        )
        .unwrap();

        let specs = load_catalog_file(file.path()).unwrap();
        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].name, "list_docs");
        assert_eq!(
            specs[0].params[1].param_type,
            ParamType::Enum(vec!["text".to_string(), "url".to_string()])
        );
        specs[0].validate().unwrap();
    }

    #[test]
    fn test_load_catalog_file_errors_are_config_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();
        let err = load_catalog_file(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));

        let err = load_catalog_file(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_catalog_file_schema_names_tool_fields() {
        let schema = serde_json::to_value(catalog_file_schema()).unwrap();
        let text = schema.to_string();
        assert!(text.contains("path_template"));
        assert!(text.contains("param_type"));
    }
}
