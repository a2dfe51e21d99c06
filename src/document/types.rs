//! Type definitions for stored service documentation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One documented request parameter of an endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parameter {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub required: bool,

    /// Declared value type, e.g. "string" or "integer"
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub param_type: Option<String>,
}

/// One documented HTTP operation of a service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// HTTP verb, compared case-insensitively
    #[serde(default)]
    pub method: String,

    #[serde(default)]
    pub path: String,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub parameters: Vec<Parameter>,

    /// Free-form request/response sample kept as scraped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

impl Endpoint {
    /// Endpoints without a method or path cannot be addressed and are never ranked.
    pub fn is_searchable(&self) -> bool {
        !self.method.trim().is_empty() && !self.path.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub description: String,
}

/// The full documentation of one service, keyed externally by its service id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default)]
    pub description: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default)]
    pub base_url: String,

    #[serde(default)]
    pub endpoints: Vec<Endpoint>,

    #[serde(default)]
    pub categories: Vec<Category>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Document {
    /// Display name, falling back to the title and then to the service id.
    pub fn display_name(&self, service_id: &str) -> String {
        if !self.name.is_empty() {
            return self.name.clone();
        }
        match &self.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => service_id.to_string(),
        }
    }
}
