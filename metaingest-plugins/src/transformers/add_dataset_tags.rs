//! Transformers that attach global tags to dataset snapshots.
//!
//! Tags are appended to the dataset's first `GlobalTags` aspect (created when
//! missing). Existing tags are not de-duplicated, so running a transformer
//! twice adds its tags twice. Records other than dataset change events pass
//! through unchanged.

use metaingest_core::error::TransformError;
use metaingest_core::metadata::{DatasetSnapshot, GlobalTags, TagAssociation};
use metaingest_core::{
    ConfigError, PipelineContext, PluginClass, RecordEnvelope, Transformer, TransformerFactory,
    parse_plugin_config,
};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

pub const SIMPLE_KEY: &str = "simple_add_dataset_tags";
pub const PATTERN_KEY: &str = "pattern_add_dataset_tags";

/// Computes the tags to add for a dataset.
pub type GetTagsToAdd = Arc<dyn Fn(&DatasetSnapshot) -> Vec<TagAssociation> + Send + Sync>;

/// Adds tags chosen by a callback.
pub struct AddDatasetTags {
    name: String,
    get_tags_to_add: GetTagsToAdd,
}

impl AddDatasetTags {
    pub fn new(get_tags_to_add: GetTagsToAdd) -> Self {
        Self::named("add_dataset_tags", get_tags_to_add)
    }

    fn named(name: &str, get_tags_to_add: GetTagsToAdd) -> Self {
        Self {
            name: name.to_string(),
            get_tags_to_add,
        }
    }
}

impl Transformer for AddDatasetTags {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform_one(
        &self,
        mut envelope: RecordEnvelope,
    ) -> Result<Option<RecordEnvelope>, TransformError> {
        let dataset = envelope
            .change_event_mut()
            .and_then(|mce| mce.proposed_snapshot.as_kind_mut::<DatasetSnapshot>());
        if let Some(dataset) = dataset {
            let tags_to_add = (self.get_tags_to_add)(dataset);
            if !tags_to_add.is_empty() {
                dataset
                    .get_or_add_aspect(GlobalTags::default())
                    .tags
                    .extend(tags_to_add);
            }
        }
        Ok(Some(envelope))
    }
}

/// Factory for the callback-driven transformer; needs a callback, so it
/// cannot be built from a recipe.
#[derive(Debug, Default)]
pub struct AddDatasetTagsFactory;

impl PluginClass for AddDatasetTagsFactory {
    fn is_abstract(&self) -> bool {
        true
    }
}

impl TransformerFactory for AddDatasetTagsFactory {
    fn create(
        &self,
        _config: &Value,
        _ctx: &PipelineContext,
    ) -> Result<Box<dyn Transformer>, ConfigError> {
        Err(ConfigError::plugin(
            "add_dataset_tags",
            "requires a programmatic callback; construct AddDatasetTags directly",
        ))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimpleAddDatasetTagsConfig {
    pub tag_urns: Vec<String>,
}

/// Adds a fixed list of tags to every dataset.
pub struct SimpleAddDatasetTags;

impl SimpleAddDatasetTags {
    pub fn build(config: SimpleAddDatasetTagsConfig) -> AddDatasetTags {
        let tags: Vec<TagAssociation> = config
            .tag_urns
            .into_iter()
            .map(TagAssociation::new)
            .collect();
        AddDatasetTags::named(SIMPLE_KEY, Arc::new(move |_| tags.clone()))
    }
}

#[derive(Debug, Default)]
pub struct SimpleAddDatasetTagsFactory;

impl PluginClass for SimpleAddDatasetTagsFactory {}

impl TransformerFactory for SimpleAddDatasetTagsFactory {
    fn create(
        &self,
        config: &Value,
        _ctx: &PipelineContext,
    ) -> Result<Box<dyn Transformer>, ConfigError> {
        let config: SimpleAddDatasetTagsConfig = parse_plugin_config(SIMPLE_KEY, config)?;
        Ok(Box::new(SimpleAddDatasetTags::build(config)))
    }
}

/// One pattern rule: datasets whose URN matches `pattern` get `tag_urns`.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TagRule {
    pub pattern: String,
    pub tag_urns: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PatternAddDatasetTagsConfig {
    pub rules: Vec<TagRule>,
}

/// Adds tags from every rule whose pattern matches the dataset URN, in rule
/// order.
pub struct PatternAddDatasetTags;

impl PatternAddDatasetTags {
    pub fn build(config: PatternAddDatasetTagsConfig) -> Result<AddDatasetTags, ConfigError> {
        let rules = config
            .rules
            .into_iter()
            .map(|rule| {
                let regex =
                    Regex::new(&rule.pattern).map_err(|e| ConfigError::plugin(PATTERN_KEY, e))?;
                let tags: Vec<TagAssociation> =
                    rule.tag_urns.into_iter().map(TagAssociation::new).collect();
                Ok((regex, tags))
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        Ok(AddDatasetTags::named(
            PATTERN_KEY,
            Arc::new(move |dataset: &DatasetSnapshot| {
                rules
                    .iter()
                    .filter(|(regex, _)| regex.is_match(&dataset.urn))
                    .flat_map(|(_, tags)| tags.iter().cloned())
                    .collect()
            }),
        ))
    }
}

#[derive(Debug, Default)]
pub struct PatternAddDatasetTagsFactory;

impl PluginClass for PatternAddDatasetTagsFactory {}

impl TransformerFactory for PatternAddDatasetTagsFactory {
    fn create(
        &self,
        config: &Value,
        _ctx: &PipelineContext,
    ) -> Result<Box<dyn Transformer>, ConfigError> {
        let config: PatternAddDatasetTagsConfig = parse_plugin_config(PATTERN_KEY, config)?;
        Ok(Box::new(PatternAddDatasetTags::build(config)?))
    }
}
