//! Property-based tests for core components using proptest.

use proptest::prelude::*;

use metaingest_core::config::expand_env_vars;
use metaingest_core::metadata::{DatasetSnapshot, GlobalTags, TagAssociation};
use metaingest_core::transform::{Passthrough, Transformer, stream_of};
use metaingest_core::urn::{Urn, make_dataset_urn};
use metaingest_core::{PluginClass, RecordEnvelope, RegistrationError, Registry};
use std::sync::Arc;

trait Probe: PluginClass {}

struct Dummy;
impl PluginClass for Dummy {}
impl Probe for Dummy {}

#[derive(Debug)]
struct Reason;
impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("reason")
    }
}
impl std::error::Error for Reason {}

fn dotted_key() -> impl Strategy<Value = String> {
    ("[a-z_-]{0,8}", "[a-z_-]{0,8}").prop_map(|(head, tail)| format!("{head}.{tail}"))
}

// --- Registry key properties ---

proptest! {
    #[test]
    fn dotted_keys_rejected_by_register(key in dotted_key()) {
        let mut registry: Registry<dyn Probe> = Registry::new();
        let err = registry.register(&key, Arc::new(Dummy)).unwrap_err();
        prop_assert_eq!(err, RegistrationError::ReservedCharacter { key });
        prop_assert!(registry.is_empty());
    }

    #[test]
    fn dotted_keys_rejected_by_register_disabled(key in dotted_key()) {
        let mut registry: Registry<dyn Probe> = Registry::new();
        let err = registry.register_disabled(&key, Reason).unwrap_err();
        prop_assert_eq!(err, RegistrationError::ReservedCharacter { key });
        prop_assert!(registry.is_empty());
    }

    #[test]
    fn plain_keys_register_once(key in "[a-z][a-z0-9_-]{0,15}") {
        let mut registry: Registry<dyn Probe> = Registry::new();
        prop_assert!(registry.register(&key, Arc::new(Dummy)).is_ok());
        let duplicate = registry.register_disabled(&key, Reason).unwrap_err();
        prop_assert_eq!(duplicate, RegistrationError::DuplicateKey { key: key.clone() });
        prop_assert!(registry.is_enabled(&key).unwrap());
    }
}

// --- Transform properties ---

proptest! {
    #[test]
    fn passthrough_preserves_length_and_order(n in 0usize..64) {
        let envelopes: Vec<RecordEnvelope> = (0..n)
            .map(|i| RecordEnvelope::for_workunit(
                format!("wu-{i}"),
                metaingest_core::MetadataChangeEvent::new(DatasetSnapshot::new(format!("urn:{i}"))),
            ))
            .collect();
        let out: Vec<RecordEnvelope> = Passthrough
            .transform(stream_of(envelopes.clone()))
            .collect::<Result<_, _>>()
            .unwrap();
        prop_assert_eq!(out, envelopes);
    }

    #[test]
    fn get_or_add_aspect_never_duplicates(tags in proptest::collection::vec("[a-z]{1,6}", 0..10)) {
        let mut snapshot = DatasetSnapshot::new("urn:li:dataset:(urn:li:dataPlatform:hive,t,PROD)");
        for tag in &tags {
            snapshot
                .get_or_add_aspect(GlobalTags::default())
                .tags
                .push(TagAssociation::new(format!("urn:li:tag:{tag}")));
        }
        prop_assert_eq!(snapshot.aspects.len(), usize::from(!tags.is_empty()));
        let added = snapshot.aspect::<GlobalTags>().map_or(0, |t| t.tags.len());
        prop_assert_eq!(added, tags.len());
    }
}

// --- URN and config properties ---

proptest! {
    #[test]
    fn dataset_urn_parses_back(platform in "[a-z]{1,10}", name in "[a-z][a-z0-9_.]{0,20}") {
        let urn = make_dataset_urn(&platform, &name, "PROD");
        let parsed = Urn::parse(&urn).unwrap();
        prop_assert_eq!(parsed.entity_type(), "dataset");
        let parts = parsed.tuple_parts().unwrap();
        prop_assert_eq!(parts[1], name.as_str());
        prop_assert_eq!(parsed.to_string(), urn);
    }

    #[test]
    fn text_without_dollar_is_unchanged(text in "[^$]{0,100}") {
        let out = expand_env_vars(&text, |_| None).unwrap();
        prop_assert_eq!(out, text);
    }
}
