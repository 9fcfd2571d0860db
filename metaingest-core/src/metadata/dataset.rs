//! Dataset aspects: properties, deprecation, and upstream lineage.

use serde::{Deserialize, Serialize};

use super::common::{AuditStamp, CustomProperties};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetProperties {
    #[serde(default)]
    pub custom_properties: CustomProperties,
    pub external_url: Option<String>,
    pub description: Option<String>,
    pub uri: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatasetDeprecation {
    pub deprecated: bool,
    pub decommission_time: Option<i64>,
    pub note: String,
    pub actor: Option<String>,
}

/// How an upstream dataset relates to its downstream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DatasetLineageType {
    /// Direct copy without modification.
    #[default]
    #[serde(rename = "COPY")]
    Copy,
    /// Format or content changed on the way.
    #[serde(rename = "TRANSFORMED")]
    Transformed,
    /// A view defined over the upstream.
    #[serde(rename = "VIEW")]
    View,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Upstream {
    pub audit_stamp: AuditStamp,
    /// Upstream dataset URN.
    pub dataset: String,
    #[serde(rename = "type")]
    pub lineage_type: DatasetLineageType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpstreamLineage {
    pub upstreams: Vec<Upstream>,
}
