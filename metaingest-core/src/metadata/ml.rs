//! ML feature and model aspects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::common::VersionTag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MlFeatureDataType {
    Useless,
    Nominal,
    Ordinal,
    Binary,
    Count,
    Time,
    Interval,
    Image,
    Video,
    Audio,
    Text,
    Map,
    Sequence,
    Set,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MlFeatureProperties {
    pub description: Option<String>,
    pub data_type: Option<MlFeatureDataType>,
    pub version: Option<VersionTag>,
}

/// A hyper-parameter value; the schema allows string, integer, float, or bool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HyperParameterValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MlModelProperties {
    pub description: Option<String>,
    pub date: Option<i64>,
    pub version: Option<VersionTag>,
    #[serde(rename = "type")]
    pub model_type: Option<String>,
    pub hyper_parameters: Option<BTreeMap<String, HyperParameterValue>>,
    pub ml_features: Option<Vec<String>>,
    #[serde(default)]
    pub tags: Vec<String>,
}
