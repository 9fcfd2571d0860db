//! Typed record model: aspects, entity snapshots and change events.
//!
//! Everything here serializes to the Avro-JSON layout accepted by the
//! metadata service (camelCase fields, unions keyed by schema name).

pub mod chart;
pub mod common;
pub mod datajob;
pub mod dataset;
pub mod glossary;
pub mod identity;
pub mod ml;
pub mod schema;
pub mod snapshot;

use serde::{Deserialize, Serialize};

pub use chart::{ChartInfo, ChartQuery, ChartQueryType, ChartType, DashboardInfo};
pub use common::{
    AccessLevel, AuditStamp, ChangeAuditStamps, Deprecation, GlobalTags, GlossaryTermAssociation,
    GlossaryTerms, InstitutionalMemory, InstitutionalMemoryMetadata, Owner, Ownership,
    OwnershipSource, OwnershipSourceType, OwnershipType, Status, TagAssociation, VersionTag,
};
pub use datajob::{AzkabanJobType, DataFlowInfo, DataJobInfo, DataJobInputOutput, DataProcessInfo};
pub use dataset::{
    DatasetDeprecation, DatasetLineageType, DatasetProperties, Upstream, UpstreamLineage,
};
pub use glossary::{GlossaryNodeInfo, GlossaryTermInfo, TagProperties};
pub use identity::{CorpGroupInfo, CorpUserEditableInfo, CorpUserInfo};
pub use ml::{MlFeatureDataType, MlFeatureProperties, MlModelProperties};
pub use schema::{
    EditableSchemaFieldInfo, EditableSchemaMetadata, PlatformSchema, SchemaField,
    SchemaFieldDataType, SchemaMetadata,
};
pub use snapshot::*;

/// Audit header attached by the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KafkaAuditHeader {
    pub time: i64,
    pub server: String,
    pub instance: Option<String>,
    pub app_name: String,
    /// Raw message id bytes, one character per byte.
    pub message_id: String,
    pub audit_version: Option<i32>,
    pub fabric_urn: Option<String>,
    pub cluster_connection_string: Option<String>,
}

/// A proposed change to one metadata entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataChangeEvent {
    #[serde(default)]
    pub audit_header: Option<KafkaAuditHeader>,
    pub proposed_snapshot: Snapshot,
}

impl MetadataChangeEvent {
    pub fn new(snapshot: impl Into<Snapshot>) -> Self {
        Self {
            audit_header: None,
            proposed_snapshot: snapshot.into(),
        }
    }

    pub fn urn(&self) -> &str {
        self.proposed_snapshot.urn()
    }
}

/// The unit carried by a record envelope.
///
/// `Opaque` holds records outside the change-event model; transformers pass
/// them through and sinks write them verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    ChangeEvent(MetadataChangeEvent),
    Opaque(serde_json::Value),
}

impl Record {
    pub fn as_change_event(&self) -> Option<&MetadataChangeEvent> {
        match self {
            Self::ChangeEvent(mce) => Some(mce),
            Self::Opaque(_) => None,
        }
    }

    pub fn as_change_event_mut(&mut self) -> Option<&mut MetadataChangeEvent> {
        match self {
            Self::ChangeEvent(mce) => Some(mce),
            Self::Opaque(_) => None,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl From<MetadataChangeEvent> for Record {
    fn from(mce: MetadataChangeEvent) -> Self {
        Self::ChangeEvent(mce)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DATASET_MCE: &str = r#"{
        "auditHeader": null,
        "proposedSnapshot": {
            "com.linkedin.pegasus2avro.metadata.snapshot.DatasetSnapshot": {
                "urn": "urn:li:dataset:(urn:li:dataPlatform:kafka,events,PROD)",
                "aspects": [
                    {"com.linkedin.pegasus2avro.common.Ownership": {
                        "owners": [{"owner": "urn:li:corpuser:jdoe", "type": "DATAOWNER", "source": null}],
                        "lastModified": {"time": 0, "actor": "urn:li:corpuser:jdoe", "impersonator": null}
                    }},
                    {"com.linkedin.pegasus2avro.common.GlobalTags": {"tags": [{"tag": "urn:li:tag:pii"}]}}
                ]
            }
        }
    }"#;

    #[test]
    fn test_parse_dataset_change_event() {
        let mce: MetadataChangeEvent = serde_json::from_str(DATASET_MCE).unwrap();
        assert_eq!(mce.proposed_snapshot.kind(), SnapshotKind::Dataset);
        assert_eq!(
            mce.urn(),
            "urn:li:dataset:(urn:li:dataPlatform:kafka,events,PROD)"
        );

        let dataset = mce.proposed_snapshot.as_kind::<DatasetSnapshot>().unwrap();
        let ownership = dataset.aspect::<Ownership>().unwrap();
        assert_eq!(ownership.owners[0].owner_type, OwnershipType::DataOwner);
        assert_eq!(dataset.aspect::<GlobalTags>().unwrap().tags.len(), 1);
    }

    #[test]
    fn test_record_untagged_prefers_change_event() {
        let record: Record = serde_json::from_str(DATASET_MCE).unwrap();
        assert!(record.as_change_event().is_some());

        let record: Record = serde_json::from_str(r#"{"some": "thing"}"#).unwrap();
        assert_eq!(record, Record::Opaque(serde_json::json!({"some": "thing"})));
    }

    #[test]
    fn test_change_event_serializes_audit_header_as_null() {
        let mce = MetadataChangeEvent::new(TagSnapshot::new("urn:li:tag:pii"));
        let json = serde_json::to_value(&mce).unwrap();
        assert_eq!(json["auditHeader"], serde_json::Value::Null);
        assert!(
            json["proposedSnapshot"]
                .get("com.linkedin.pegasus2avro.metadata.snapshot.TagSnapshot")
                .is_some()
        );
    }
}
