//! Record envelopes: a record plus free-form metadata.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::metadata::{MetadataChangeEvent, Record};

/// Metadata key identifying the unit of work that produced a record.
pub const WORKUNIT_ID: &str = "workunit_id";

/// A record travelling through the pipeline.
///
/// Owned by exactly one stage at a time: the source creates it, transformers
/// take it by value and hand it on, the sink consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordEnvelope {
    pub record: Record,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl RecordEnvelope {
    pub fn new(record: impl Into<Record>) -> Self {
        Self {
            record: record.into(),
            metadata: Map::new(),
        }
    }

    /// Envelope tagged with the id of the work unit that produced it.
    pub fn for_workunit(workunit_id: impl Into<String>, record: impl Into<Record>) -> Self {
        let mut envelope = Self::new(record);
        envelope
            .metadata
            .insert(WORKUNIT_ID.to_string(), Value::String(workunit_id.into()));
        envelope
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn workunit_id(&self) -> Option<&str> {
        self.metadata.get(WORKUNIT_ID).and_then(Value::as_str)
    }

    pub fn change_event(&self) -> Option<&MetadataChangeEvent> {
        self.record.as_change_event()
    }

    pub fn change_event_mut(&mut self) -> Option<&mut MetadataChangeEvent> {
        self.record.as_change_event_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::TagSnapshot;

    #[test]
    fn test_workunit_id_roundtrip() {
        let envelope = RecordEnvelope::for_workunit(
            "file://mces.json:0",
            MetadataChangeEvent::new(TagSnapshot::new("urn:li:tag:pii")),
        );
        assert_eq!(envelope.workunit_id(), Some("file://mces.json:0"));
        assert!(envelope.change_event().is_some());
    }

    #[test]
    fn test_opaque_record_has_no_change_event() {
        let envelope = RecordEnvelope::new(Record::Opaque(serde_json::json!([1, 2])))
            .with_metadata("attempt", 1);
        assert!(envelope.change_event().is_none());
        assert_eq!(envelope.metadata["attempt"], 1);
        assert_eq!(envelope.workunit_id(), None);
    }
}
