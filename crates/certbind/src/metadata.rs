//! Embedded plugin metadata
//!
//! Parsed once on first use and never mutated afterwards.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

const METADATA_JSON: &str = include_str!("../metadata.json");

static METADATA: Lazy<Result<PluginMetadata, String>> =
    Lazy::new(|| serde_json::from_str(METADATA_JSON).map_err(|e| e.to_string()));

/// Plugin description reported to the host.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginMetadata {
    pub name: String,
    pub description: String,
    pub version: String,
    pub author: String,
    /// Plugin-level settings the host must collect
    #[serde(default)]
    pub config: Map<String, Value>,
    pub actions: Vec<ActionMetadata>,
    /// Keys not modelled above, reported back unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionMetadata {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub params: Map<String, Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The embedded metadata, or the parse error if the document is broken.
pub fn metadata() -> Result<&'static PluginMetadata, &'static str> {
    METADATA.as_ref().map_err(String::as_str)
}
