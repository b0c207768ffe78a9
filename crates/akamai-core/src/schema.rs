//! Schema descriptors for provider keys, resource attributes and data sources

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Schema map keyed by attribute name
pub type SchemaMap = BTreeMap<String, SchemaField>;

/// Value type of a schema attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Text value
    String,
    /// Integer value
    Int,
    /// Boolean value
    Bool,
    /// Ordered list of strings
    List,
}

/// Description of one schema attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    /// Attribute value type
    pub value_type: ValueType,

    /// Whether the attribute must be set
    pub required: bool,

    /// Whether changing the attribute forces a new resource
    #[serde(default)]
    pub force_new: bool,

    /// Default value when unset
    #[serde(default)]
    pub default: Option<serde_json::Value>,

    /// Environment variable supplying the default, checked before `default`
    #[serde(default)]
    pub env_default: Option<String>,

    /// Human readable description
    #[serde(default)]
    pub description: String,
}

impl SchemaField {
    /// A required attribute
    pub fn required(value_type: ValueType) -> Self {
        Self {
            value_type,
            required: true,
            force_new: false,
            default: None,
            env_default: None,
            description: String::new(),
        }
    }

    /// An optional attribute
    pub fn optional(value_type: ValueType) -> Self {
        Self {
            required: false,
            ..Self::required(value_type)
        }
    }

    /// Set the default value
    pub fn with_default(mut self, default: serde_json::Value) -> Self {
        self.default = Some(default);
        self
    }

    /// Read the default from an environment variable when set
    pub fn with_env_default(mut self, var: impl Into<String>) -> Self {
        self.env_default = Some(var.into());
        self
    }

    /// Mark the attribute as forcing replacement on change
    pub fn with_force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Resolve the default value for this attribute, if any
    pub fn resolve_default(&self) -> Option<serde_json::Value> {
        if let Some(var) = &self.env_default
            && let Ok(value) = std::env::var(var)
        {
            return Some(serde_json::Value::String(value));
        }
        self.default.clone()
    }
}
