//! Tool definitions and argument checks
//!
//! A definition is a tool's name, description, and JSON schema for its input.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::error::{Result, VaultError};

/// Tool metadata exposed to the calling agent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    /// Create a definition with an empty object schema
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }

    /// Set input schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = schema;
        self
    }

    /// Names of required parameters
    pub fn required_params(&self) -> Vec<&str> {
        self.input_schema["required"]
            .as_array()
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Declared JSON type of a parameter, if any
    pub fn param_type(&self, name: &str) -> Option<&str> {
        self.input_schema["properties"][name]["type"].as_str()
    }

    /// Check arguments against the schema: object shape, required params, declared types.
    pub fn check_arguments(&self, arguments: &Value) -> Result<()> {
        let args = match arguments {
            Value::Object(map) => map,
            Value::Null => return self.check_required(&Map::new()),
            _ => {
                return Err(VaultError::InvalidArgument(format!(
                    "arguments for '{}' must be an object",
                    self.name
                )));
            }
        };

        self.check_required(args)?;

        for (name, value) in args {
            if let Some(expected) = self.param_type(name) {
                if !matches_type(expected, value) {
                    return Err(VaultError::InvalidArgument(format!(
                        "'{}' must be of type {}",
                        name, expected
                    )));
                }
            }
        }

        Ok(())
    }

    fn check_required(&self, args: &Map<String, Value>) -> Result<()> {
        match self.required_params().into_iter().find(|name| !args.contains_key(*name)) {
            Some(missing) => Err(VaultError::InvalidArgument(format!(
                "Missing '{}' parameter",
                missing
            ))),
            None => Ok(()),
        }
    }
}

/// Object schema whose parameters are all required strings
pub fn string_params_schema(params: &[(&str, &str)]) -> Value {
    let properties: Map<String, Value> = params
        .iter()
        .map(|(name, description)| {
            (
                name.to_string(),
                json!({ "type": "string", "description": description }),
            )
        })
        .collect();
    let required: Vec<&str> = params.iter().map(|(name, _)| *name).collect();

    json!({
        "type": "object",
        "properties": properties,
        "required": required
    })
}

fn matches_type(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        _ => true,
    }
}
