//! Data flow, data job, and data process aspects.

use serde::{Deserialize, Serialize};

use super::common::CustomProperties;

/// Job types understood by the Azkaban scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AzkabanJobType {
    #[default]
    #[serde(rename = "COMMAND")]
    Command,
    #[serde(rename = "HADOOP_JAVA")]
    HadoopJava,
    #[serde(rename = "HADOOP_SHELL")]
    HadoopShell,
    #[serde(rename = "HIVE")]
    Hive,
    #[serde(rename = "PIG")]
    Pig,
    #[serde(rename = "SQL")]
    Sql,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataFlowInfo {
    #[serde(default)]
    pub custom_properties: CustomProperties,
    pub external_url: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub project: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataJobInfo {
    #[serde(default)]
    pub custom_properties: CustomProperties,
    pub external_url: Option<String>,
    pub name: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub job_type: AzkabanJobType,
    pub flow_urn: Option<String>,
}

/// Dataset and job lineage edges of a data job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataJobInputOutput {
    pub input_datasets: Vec<String>,
    pub output_datasets: Vec<String>,
    pub input_datajobs: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataProcessInfo {
    pub inputs: Option<Vec<String>>,
    pub outputs: Option<Vec<String>>,
}
