//! Chart and dashboard aspects.

use serde::{Deserialize, Serialize};

use super::common::{AccessLevel, ChangeAuditStamps, CustomProperties};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartType {
    #[serde(rename = "BAR")]
    Bar,
    #[serde(rename = "PIE")]
    Pie,
    #[serde(rename = "SCATTER")]
    Scatter,
    #[serde(rename = "TABLE")]
    Table,
    #[serde(rename = "TEXT")]
    Text,
    #[serde(rename = "LINE")]
    Line,
    #[serde(rename = "AREA")]
    Area,
    #[serde(rename = "HISTOGRAM")]
    Histogram,
    #[serde(rename = "BOX_PLOT")]
    BoxPlot,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChartQueryType {
    #[default]
    #[serde(rename = "LOOKML")]
    LookMl,
    #[serde(rename = "SQL")]
    Sql,
}

/// Information about a chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartInfo {
    #[serde(default)]
    pub custom_properties: CustomProperties,
    pub external_url: Option<String>,
    pub title: String,
    pub description: String,
    pub last_modified: ChangeAuditStamps,
    pub chart_url: Option<String>,
    /// Dataset URNs the chart reads from.
    pub inputs: Option<Vec<String>>,
    #[serde(rename = "type")]
    pub chart_type: Option<ChartType>,
    pub access: Option<AccessLevel>,
    pub last_refreshed: Option<i64>,
}

/// The query backing a chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartQuery {
    pub raw_query: String,
    #[serde(rename = "type")]
    pub query_type: ChartQueryType,
}

/// Information about a dashboard.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardInfo {
    #[serde(default)]
    pub custom_properties: CustomProperties,
    pub external_url: Option<String>,
    pub title: String,
    pub description: String,
    /// Chart URNs on the dashboard.
    #[serde(default)]
    pub charts: Vec<String>,
    pub last_modified: ChangeAuditStamps,
    pub dashboard_url: Option<String>,
    pub access: Option<AccessLevel>,
    pub last_refreshed: Option<i64>,
}
