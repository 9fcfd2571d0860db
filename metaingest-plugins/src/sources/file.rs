//! File source: reads change events from a JSON file.
//!
//! The file holds either a JSON array of change events or a single event.
//! Entries that are not valid change events are reported as failures and
//! skipped. An unreadable file ends the stream with a single error item.

use metaingest_core::error::{PipelineError, SourceError};
use metaingest_core::metadata::MetadataChangeEvent;
use metaingest_core::{
    ConfigError, PipelineContext, PluginClass, RecordEnvelope, RecordStream, Source,
    SourceFactory, SourceReport, parse_plugin_config,
};
use serde::Deserialize;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const KEY: &str = "file";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSourceConfig {
    pub filename: PathBuf,
}

pub struct FileSource {
    config: FileSourceConfig,
    report: SourceReport,
}

impl FileSource {
    pub fn new(config: FileSourceConfig) -> Self {
        Self {
            config,
            report: SourceReport::default(),
        }
    }

    fn read_entries(&self) -> Result<Vec<Value>, SourceError> {
        let text =
            std::fs::read_to_string(&self.config.filename).map_err(|source| SourceError::Read {
                path: self.config.filename.clone(),
                source,
            })?;
        let value: Value = serde_json::from_str(&text).map_err(|e| SourceError::Malformed {
            origin: self.config.filename.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(match value {
            Value::Array(entries) => entries,
            single => vec![single],
        })
    }
}

impl Source for FileSource {
    fn get_records(&mut self) -> RecordStream<'_> {
        let entries = match self.read_entries() {
            Ok(entries) => entries,
            // Not added to the report; the pipeline records the item as a run error.
            Err(err) => {
                return Box::new(std::iter::once(Err::<RecordEnvelope, _>(PipelineError::from(err))));
            }
        };
        debug!(path = %self.config.filename.display(), entries = entries.len(), "Read change events");

        let filename = self.config.filename.display().to_string();
        let report = &mut self.report;
        Box::new(
            entries
                .into_iter()
                .enumerate()
                .filter_map(move |(i, entry)| {
                    let workunit_id = format!("file://{filename}:{i}");
                    match serde_json::from_value::<MetadataChangeEvent>(entry) {
                        Ok(mce) => {
                            report.report_workunit(workunit_id.clone());
                            Some(Ok(RecordEnvelope::for_workunit(workunit_id, mce)))
                        }
                        Err(e) => {
                            warn!(workunit = %workunit_id, error = %e, "Skipping malformed change event");
                            report.report_failure(workunit_id, e.to_string());
                            None
                        }
                    }
                }),
        )
    }

    fn get_report(&self) -> &SourceReport {
        &self.report
    }
}

#[derive(Debug, Default)]
pub struct FileSourceFactory;

impl PluginClass for FileSourceFactory {}

impl SourceFactory for FileSourceFactory {
    fn create(&self, config: &Value, _ctx: &PipelineContext) -> Result<Box<dyn Source>, ConfigError> {
        let config: FileSourceConfig = parse_plugin_config(KEY, config)?;
        Ok(Box::new(FileSource::new(config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    const TAG_MCE: &str = r#"{"proposedSnapshot": {"com.linkedin.pegasus2avro.metadata.snapshot.TagSnapshot": {"urn": "urn:li:tag:pii", "aspects": []}}}"#;

    fn source_for(contents: &str) -> (tempfile::NamedTempFile, FileSource) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        let source = FileSource::new(FileSourceConfig {
            filename: file.path().to_path_buf(),
        });
        (file, source)
    }

    #[test]
    fn test_reads_array_of_events() {
        let (_file, mut source) = source_for(&format!("[{TAG_MCE}, {TAG_MCE}]"));
        let records: Vec<_> = source.get_records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[1].workunit_id().unwrap().ends_with(":1"));
        assert_eq!(source.get_report().workunits_produced, 2);
    }

    #[test]
    fn test_reads_single_event() {
        let (_file, mut source) = source_for(TAG_MCE);
        assert_eq!(source.get_records().count(), 1);
    }

    #[test]
    fn test_malformed_entries_are_skipped_and_reported() {
        let (_file, mut source) = source_for(&format!(r#"[{TAG_MCE}, {{"nope": true}}, {TAG_MCE}]"#));
        let records: Vec<_> = source.get_records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(source.get_report().failure_count(), 1);
        assert_eq!(source.get_report().workunits_produced, 2);
    }

    #[test]
    fn test_missing_file_yields_error_item() {
        let mut source = FileSource::new(FileSourceConfig {
            filename: PathBuf::from("/nonexistent/mces.json"),
        });
        let items: Vec<_> = source.get_records().collect();
        assert_eq!(items.len(), 1);
        assert!(items[0].is_err());
        assert_eq!(source.get_report().failure_count(), 0);
    }

    #[test]
    fn test_factory_rejects_unknown_config() {
        let ctx = PipelineContext::new("t");
        let result = FileSourceFactory.create(&serde_json::json!({"file": "x"}), &ctx);
        assert!(matches!(result, Err(ConfigError::InvalidPluginConfig { .. })));
    }
}
