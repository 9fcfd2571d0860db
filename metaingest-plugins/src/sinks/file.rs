//! File sink: streams records into a JSON array on disk.
//!
//! The opening bracket is written on creation and the closing one on
//! [`Sink::close`], or on drop if the sink was never closed, so an aborted run
//! still leaves a parseable file.

use metaingest_core::error::SinkError;
use metaingest_core::sink::WriteCallback;
use metaingest_core::{
    ConfigError, PipelineContext, PluginClass, RecordEnvelope, Sink, SinkFactory, SinkReport,
    parse_plugin_config,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use tracing::{debug, error};

pub const KEY: &str = "file";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileSinkConfig {
    pub filename: PathBuf,
}

pub struct FileSink {
    config: FileSinkConfig,
    out: BufWriter<File>,
    wrote_something: bool,
    finalized: bool,
    report: SinkReport,
}

impl FileSink {
    pub fn create(config: FileSinkConfig) -> Result<Self, SinkError> {
        let mut out = BufWriter::new(File::create(&config.filename)?);
        out.write_all(b"[\n")?;
        debug!(path = %config.filename.display(), "Opened file sink");
        Ok(Self {
            config,
            out,
            wrote_something: false,
            finalized: false,
            report: SinkReport::default(),
        })
    }

    fn write_record(&mut self, envelope: &RecordEnvelope) -> Result<(), SinkError> {
        if self.wrote_something {
            self.out.write_all(b",\n")?;
        }
        serde_json::to_writer_pretty(&mut self.out, &envelope.record)?;
        self.wrote_something = true;
        Ok(())
    }

    fn finalize(&mut self) -> Result<(), SinkError> {
        if self.finalized {
            return Ok(());
        }
        self.finalized = true;
        self.out.write_all(b"\n]\n")?;
        self.out.flush()?;
        debug!(
            path = %self.config.filename.display(),
            records = self.report.records_written,
            "Closed file sink"
        );
        Ok(())
    }
}

impl Sink for FileSink {
    fn write_record_async(&mut self, envelope: RecordEnvelope, callback: Box<dyn WriteCallback>) {
        match self.write_record(&envelope) {
            Ok(()) => {
                self.report.report_record_written();
                callback.on_success(&envelope, &Map::new());
            }
            Err(err) => {
                self.report.report_failure(err.to_string());
                callback.on_failure(&envelope, &err, &Map::new());
            }
        }
    }

    fn get_report(&self) -> &SinkReport {
        &self.report
    }

    fn close(&mut self) -> Result<(), SinkError> {
        self.finalize()
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Err(e) = self.finalize() {
            error!(path = %self.config.filename.display(), error = %e, "Failed to finalize file sink");
        }
    }
}

#[derive(Debug, Default)]
pub struct FileSinkFactory;

impl PluginClass for FileSinkFactory {}

impl SinkFactory for FileSinkFactory {
    fn create(&self, config: &Value, _ctx: &PipelineContext) -> Result<Box<dyn Sink>, ConfigError> {
        let config: FileSinkConfig = parse_plugin_config(KEY, config)?;
        let sink = FileSink::create(config).map_err(|e| ConfigError::plugin(KEY, e))?;
        Ok(Box::new(sink))
    }
}
