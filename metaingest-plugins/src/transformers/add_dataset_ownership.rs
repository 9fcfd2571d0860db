//! Transformers that attach owners to dataset snapshots.

use metaingest_core::error::TransformError;
use metaingest_core::metadata::{AuditStamp, DatasetSnapshot, Owner, Ownership, OwnershipType};
use metaingest_core::{
    ConfigError, PipelineContext, PluginClass, RecordEnvelope, Transformer, TransformerFactory,
    parse_plugin_config,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const SIMPLE_KEY: &str = "simple_add_dataset_ownership";

/// Actor credited when an `Ownership` aspect is created by a transformer.
pub const INGESTION_ACTOR: &str = "urn:li:corpuser:ingestion";

/// Computes the owners to add for a dataset.
pub type GetOwnersToAdd = Arc<dyn Fn(&DatasetSnapshot) -> Vec<Owner> + Send + Sync>;

/// Adds owners chosen by a callback to the dataset's `Ownership` aspect.
pub struct AddDatasetOwnership {
    name: String,
    get_owners_to_add: GetOwnersToAdd,
}

impl AddDatasetOwnership {
    pub fn new(get_owners_to_add: GetOwnersToAdd) -> Self {
        Self {
            name: "add_dataset_ownership".to_string(),
            get_owners_to_add,
        }
    }
}

impl Transformer for AddDatasetOwnership {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform_one(
        &self,
        mut envelope: RecordEnvelope,
    ) -> Result<Option<RecordEnvelope>, TransformError> {
        if let Some(dataset) = envelope
            .change_event_mut()
            .and_then(|mce| mce.proposed_snapshot.as_kind_mut::<DatasetSnapshot>())
        {
            let owners_to_add = (self.get_owners_to_add)(dataset);
            if !owners_to_add.is_empty() {
                let ownership = dataset.get_or_add_aspect(Ownership {
                    owners: Vec::new(),
                    last_modified: AuditStamp::now(INGESTION_ACTOR),
                });
                ownership.owners.extend(owners_to_add);
            }
        }
        Ok(Some(envelope))
    }
}

#[derive(Debug, Default)]
pub struct AddDatasetOwnershipFactory;

impl PluginClass for AddDatasetOwnershipFactory {
    fn is_abstract(&self) -> bool {
        true
    }
}

impl TransformerFactory for AddDatasetOwnershipFactory {
    fn create(
        &self,
        _config: &Value,
        _ctx: &PipelineContext,
    ) -> Result<Box<dyn Transformer>, ConfigError> {
        Err(ConfigError::plugin(
            "add_dataset_ownership",
            "requires a programmatic callback; construct AddDatasetOwnership directly",
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimpleAddDatasetOwnershipConfig {
    pub owner_urns: Vec<String>,
    #[serde(default)]
    pub ownership_type: OwnershipType,
}

/// Adds the same owners to every dataset.
pub struct SimpleAddDatasetOwnership;

impl SimpleAddDatasetOwnership {
    pub fn build(config: SimpleAddDatasetOwnershipConfig) -> AddDatasetOwnership {
        let owners: Vec<Owner> = config
            .owner_urns
            .into_iter()
            .map(|urn| Owner::new(urn, config.ownership_type))
            .collect();
        let mut transformer = AddDatasetOwnership::new(Arc::new(move |_| owners.clone()));
        transformer.name = SIMPLE_KEY.to_string();
        transformer
    }
}

#[derive(Debug, Default)]
pub struct SimpleAddDatasetOwnershipFactory;

impl PluginClass for SimpleAddDatasetOwnershipFactory {}

impl TransformerFactory for SimpleAddDatasetOwnershipFactory {
    fn create(
        &self,
        config: &Value,
        _ctx: &PipelineContext,
    ) -> Result<Box<dyn Transformer>, ConfigError> {
        let config: SimpleAddDatasetOwnershipConfig = parse_plugin_config(SIMPLE_KEY, config)?;
        Ok(Box::new(SimpleAddDatasetOwnership::build(config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaingest_core::metadata::{ChartSnapshot, MetadataChangeEvent};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn dataset_envelope() -> RecordEnvelope {
        RecordEnvelope::new(MetadataChangeEvent::new(DatasetSnapshot::new(
            "urn:li:dataset:(urn:li:dataPlatform:mysql,shop.orders,PROD)",
        )))
    }

    fn ownership_of(envelope: &RecordEnvelope) -> Option<Ownership> {
        envelope
            .change_event()
            .and_then(|mce| mce.proposed_snapshot.as_kind::<DatasetSnapshot>())
            .and_then(|d| d.aspect::<Ownership>())
            .cloned()
    }

    #[test]
    fn test_creates_ownership_with_ingestion_actor() {
        let transformer = SimpleAddDatasetOwnershipFactory
            .create(
                &json!({"owner_urns": ["urn:li:corpuser:alice", "urn:li:corpGroup:data"]}),
                &PipelineContext::new("t"),
            )
            .unwrap();
        let out = transformer.transform_one(dataset_envelope()).unwrap().unwrap();

        let ownership = ownership_of(&out).unwrap();
        assert_eq!(ownership.last_modified.actor, INGESTION_ACTOR);
        let owners: Vec<_> = ownership.owners.iter().map(|o| o.owner.as_str()).collect();
        assert_eq!(owners, vec!["urn:li:corpuser:alice", "urn:li:corpGroup:data"]);
        assert!(
            ownership
                .owners
                .iter()
                .all(|o| o.owner_type == OwnershipType::Developer)
        );
    }

    #[test]
    fn test_ownership_type_is_configurable() {
        let config: SimpleAddDatasetOwnershipConfig = parse_plugin_config(
            SIMPLE_KEY,
            &json!({"owner_urns": ["urn:li:corpuser:bob"], "ownership_type": "DATAOWNER"}),
        )
        .unwrap();
        let out = SimpleAddDatasetOwnership::build(config)
            .transform_one(dataset_envelope())
            .unwrap()
            .unwrap();
        assert_eq!(
            ownership_of(&out).unwrap().owners[0].owner_type,
            OwnershipType::DataOwner
        );
    }

    #[test]
    fn test_non_dataset_untouched() {
        let envelope = RecordEnvelope::new(MetadataChangeEvent::new(ChartSnapshot::new(
            "urn:li:chart:(looker,1)",
        )));
        let before = envelope.record.clone();
        let transformer = SimpleAddDatasetOwnership::build(SimpleAddDatasetOwnershipConfig {
            owner_urns: vec!["urn:li:corpuser:alice".into()],
            ownership_type: OwnershipType::Developer,
        });
        let out = transformer.transform_one(envelope).unwrap().unwrap();
        assert_eq!(out.record, before);
    }
}
