//! Glossary and tag entity aspects.

use serde::{Deserialize, Serialize};

use super::common::CustomProperties;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryTermInfo {
    pub definition: String,
    pub parent_node: Option<String>,
    pub term_source: String,
    pub source_ref: Option<String>,
    pub source_url: Option<String>,
    #[serde(default)]
    pub custom_properties: CustomProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlossaryNodeInfo {
    pub definition: String,
    pub parent_node: Option<String>,
}

/// Properties of a tag entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TagProperties {
    pub name: String,
    pub description: Option<String>,
}
