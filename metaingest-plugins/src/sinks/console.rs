//! Console sink: prints each record as JSON.

use metaingest_core::error::SinkError;
use metaingest_core::sink::WriteCallback;
use metaingest_core::{
    ConfigError, PipelineContext, PluginClass, RecordEnvelope, Sink, SinkFactory, SinkReport,
    parse_plugin_config,
};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::Write;

pub const KEY: &str = "console";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConsoleSinkConfig {
    /// Pretty-print each record.
    #[serde(default)]
    pub pretty: bool,
}

pub struct ConsoleSink {
    config: ConsoleSinkConfig,
    out: Box<dyn Write + Send>,
    report: SinkReport,
}

impl ConsoleSink {
    pub fn new(config: ConsoleSinkConfig) -> Self {
        Self::with_writer(config, Box::new(std::io::stdout()))
    }

    pub fn with_writer(config: ConsoleSinkConfig, out: Box<dyn Write + Send>) -> Self {
        Self {
            config,
            out,
            report: SinkReport::default(),
        }
    }

    fn write_record(&mut self, envelope: &RecordEnvelope) -> Result<(), SinkError> {
        if self.config.pretty {
            serde_json::to_writer_pretty(&mut self.out, &envelope.record)?;
        } else {
            serde_json::to_writer(&mut self.out, &envelope.record)?;
        }
        writeln!(self.out)?;
        Ok(())
    }
}

impl Sink for ConsoleSink {
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
        self.out.flush()?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct ConsoleSinkFactory;

impl PluginClass for ConsoleSinkFactory {}

impl SinkFactory for ConsoleSinkFactory {
    fn create(&self, config: &Value, _ctx: &PipelineContext) -> Result<Box<dyn Sink>, ConfigError> {
        let config: ConsoleSinkConfig = parse_plugin_config(KEY, config)?;
        Ok(Box::new(ConsoleSink::new(config)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaingest_core::Record;
    use metaingest_core::sink::NoopCallback;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_prints_one_line_per_record() {
        let buf = SharedBuf::default();
        let mut sink = ConsoleSink::with_writer(ConsoleSinkConfig::default(), Box::new(buf.clone()));
        for i in 0..2 {
            sink.write_record_async(
                RecordEnvelope::new(Record::Opaque(serde_json::json!({"n": i}))),
                Box::new(NoopCallback),
            );
        }
        sink.close().unwrap();

        let out = String::from_utf8(buf.0.lock().unwrap().clone()).unwrap();
        assert_eq!(out, "{\"n\":0}\n{\"n\":1}\n");
        assert_eq!(sink.get_report().records_written, 2);
    }
}
