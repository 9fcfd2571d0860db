//! End-to-end runs of the built-in plugins through recipes.

use metaingest_core::metadata::{DatasetSnapshot, GlobalTags, Ownership};
use metaingest_core::{
    MetadataChangeEvent, Pipeline, PipelineError, RegistrationError, RegistryError, load_recipe,
};
use metaingest_plugins::builtin_registries;
use pretty_assertions::assert_eq;
use std::path::Path;

const EVENTS: &str = r#"[
  {"proposedSnapshot": {"com.linkedin.pegasus2avro.metadata.snapshot.DatasetSnapshot": {
    "urn": "urn:li:dataset:(urn:li:dataPlatform:hive,db.events,PROD)",
    "aspects": [{"com.linkedin.pegasus2avro.common.Status": {"removed": false}}]
  }}},
  {"proposedSnapshot": {"com.linkedin.pegasus2avro.metadata.snapshot.CorpUserSnapshot": {
    "urn": "urn:li:corpuser:alice",
    "aspects": []
  }}},
  {"proposedSnapshot": {"com.linkedin.pegasus2avro.metadata.snapshot.DatasetSnapshot": {
    "urn": "urn:li:dataset:(urn:li:dataPlatform:kafka,clicks,PROD)",
    "aspects": []
  }}}
]"#;

fn write(dir: &Path, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn read_events(path: &Path) -> Vec<MetadataChangeEvent> {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn dataset(mce: &MetadataChangeEvent) -> Option<&DatasetSnapshot> {
    mce.proposed_snapshot.as_kind::<DatasetSnapshot>()
}

// ── Recipe runs ──

#[test]
fn test_file_to_file_with_tags_and_owners() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = write(dir.path(), "in.json", EVENTS);
    let output = dir.path().join("out.json");
    let recipe = write(
        dir.path(),
        "recipe.yaml",
        &format!(
            r#"
run_id: e2e
source:
  type: file
  config:
    filename: {}
transformers:
  - type: simple_add_dataset_tags
    config:
      tag_urns: ["urn:li:tag:NeedsDocs"]
  - type: pattern_add_dataset_tags
    config:
      rules:
        - pattern: "dataPlatform:kafka"
          tag_urns: ["urn:li:tag:Streaming"]
  - type: simple_add_dataset_ownership
    config:
      owner_urns: ["urn:li:corpuser:alice"]
sink:
  type: file
  config:
    filename: {}
"#,
            input.display(),
            output.display()
        ),
    );

    let registries = builtin_registries().unwrap();
    let config = load_recipe(&recipe).unwrap();
    let mut pipeline = Pipeline::create(config, &registries).unwrap();
    pipeline.run().unwrap();
    pipeline.raise_from_status(true).unwrap();
    assert_eq!(pipeline.source_report().workunits_produced, 3);
    assert_eq!(pipeline.sink_report().records_written, 3);
    drop(pipeline);

    let events = read_events(&output);
    assert_eq!(events.len(), 3);

    let tags = |mce: &MetadataChangeEvent| -> Vec<String> {
        dataset(mce)
            .and_then(|d| d.aspect::<GlobalTags>())
            .map(|t| t.tags.iter().map(|a| a.tag.clone()).collect())
            .unwrap_or_default()
    };
    assert_eq!(tags(&events[0]), vec!["urn:li:tag:NeedsDocs"]);
    assert_eq!(
        tags(&events[2]),
        vec!["urn:li:tag:NeedsDocs", "urn:li:tag:Streaming"]
    );
    assert_eq!(dataset(&events[0]).unwrap().count_aspects::<GlobalTags>(), 1);
    assert_eq!(
        dataset(&events[2]).unwrap().aspect::<Ownership>().unwrap().owners[0].owner,
        "urn:li:corpuser:alice"
    );

    // The corp user passes through untouched.
    assert!(dataset(&events[1]).is_none());
    assert_eq!(events[1].urn(), "urn:li:corpuser:alice");
}

#[test]
fn test_tagging_twice_duplicates_tags() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = write(dir.path(), "in.json", EVENTS);
    let output = dir.path().join("out.json");
    let recipe = write(
        dir.path(),
        "recipe.json",
        &serde_json::json!({
            "source": {"type": "file", "config": {"filename": input}},
            "transformers": [
                {"type": "simple_add_dataset_tags", "config": {"tag_urns": ["urn:li:tag:pii"]}},
                {"type": "simple_add_dataset_tags", "config": {"tag_urns": ["urn:li:tag:pii"]}}
            ],
            "sink": {"type": "file", "config": {"filename": output}}
        })
        .to_string(),
    );

    let registries = builtin_registries().unwrap();
    let mut pipeline = Pipeline::create(load_recipe(&recipe).unwrap(), &registries).unwrap();
    pipeline.run().unwrap();
    drop(pipeline);

    let events = read_events(&output);
    let first = dataset(&events[0]).unwrap().aspect::<GlobalTags>().unwrap();
    assert_eq!(first.tags.len(), 2);
    assert_eq!(first.tags[0], first.tags[1]);
}

#[test]
fn test_missing_input_fails_the_run() {
    let dir = tempfile::TempDir::new().unwrap();
    let output = dir.path().join("out.json");
    let recipe = write(
        dir.path(),
        "recipe.toml",
        &format!(
            r#"
[source]
type = "file"
[source.config]
filename = "{}"

[sink]
type = "file"
[sink.config]
filename = "{}"
"#,
            dir.path().join("missing.json").display(),
            output.display()
        ),
    );

    let registries = builtin_registries().unwrap();
    let mut pipeline = Pipeline::create(load_recipe(&recipe).unwrap(), &registries).unwrap();
    assert!(matches!(pipeline.run(), Err(PipelineError::Source(_))));
    assert!(matches!(
        pipeline.raise_from_status(false),
        Err(PipelineError::RunFailed {
            failures: 1,
            warnings: 0
        })
    ));
}

#[test]
fn test_second_run_leaves_output_valid() {
    let dir = tempfile::TempDir::new().unwrap();
    let input = write(dir.path(), "in.json", EVENTS);
    let output = dir.path().join("out.json");
    let recipe = write(
        dir.path(),
        "recipe.json",
        &serde_json::json!({
            "source": {"type": "file", "config": {"filename": input}},
            "sink": {"type": "file", "config": {"filename": output}}
        })
        .to_string(),
    );

    let registries = builtin_registries().unwrap();
    let mut pipeline = Pipeline::create(load_recipe(&recipe).unwrap(), &registries).unwrap();
    pipeline.run().unwrap();
    assert!(matches!(
        pipeline.run(),
        Err(PipelineError::AlreadyRun { .. })
    ));
    assert_eq!(pipeline.sink_report().records_written, 3);
    drop(pipeline);

    assert_eq!(read_events(&output).len(), 3);
}

// ── Registry surface ──

#[test]
fn test_sink_summary_lists_builtins() {
    let registries = builtin_registries().unwrap();
    let summary = registries.sinks.summary(false);
    let lines: Vec<&str> = summary.lines().collect();
    assert_eq!(lines[0], "console");
    assert!(lines[1].starts_with("datahub-rest"));
    assert_eq!(lines[2], "file");
}

#[test]
fn test_import_abstract_transformer_is_rejected() {
    let registries = builtin_registries().unwrap();
    let err = registries
        .transformers
        .get("metaingest_plugins.transformers.AddDatasetTags")
        .err()
        .unwrap();
    assert!(matches!(
        err,
        RegistryError::Registration(RegistrationError::AbstractClass { .. })
    ));
}

#[test]
fn test_import_concrete_class_by_path() {
    let registries = builtin_registries().unwrap();
    assert!(
        registries
            .sinks
            .get("metaingest_plugins.sinks.FileSink")
            .is_ok()
    );
    // A sink class is not a transformer.
    assert!(matches!(
        registries
            .transformers
            .get("metaingest_plugins.sinks.FileSink")
            .err()
            .unwrap(),
        RegistryError::Registration(RegistrationError::WrongCapability { .. })
    ));
}

#[cfg(feature = "datahub-rest")]
#[test]
fn test_rest_sink_enabled_with_feature() {
    let registries = builtin_registries().unwrap();
    assert!(registries.sinks.is_enabled("datahub-rest").unwrap());
}

#[cfg(not(feature = "datahub-rest"))]
#[test]
fn test_rest_sink_disabled_without_feature() {
    let registries = builtin_registries().unwrap();
    assert!(!registries.sinks.is_enabled("datahub-rest").unwrap());
    let err = registries.sinks.get("datahub-rest").err().unwrap();
    assert_eq!(
        err.to_string(),
        "datahub-rest is disabled; try running: cargo install metaingest --features 'datahub-rest'"
    );
    assert!(
        registries
            .sinks
            .summary(true)
            .contains("dependency 'reqwest' is unavailable")
    );
}
