//! Sink capability: consumes envelopes and reports per-record completion.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::envelope::RecordEnvelope;
use crate::error::{ConfigError, SinkError};
use crate::pipeline::PipelineContext;
use crate::registry::PluginClass;
use crate::report::SinkReport;

/// Completion callback for a single write.
pub trait WriteCallback {
    fn on_success(&self, envelope: &RecordEnvelope, success_metadata: &Map<String, Value>);

    fn on_failure(
        &self,
        envelope: &RecordEnvelope,
        error: &SinkError,
        failure_metadata: &Map<String, Value>,
    );
}

pub trait Sink: Send {
    /// Write one envelope and report the outcome through `callback`.
    ///
    /// Failures are reported through the callback and the sink's own report,
    /// never returned.
    fn write_record_async(&mut self, envelope: RecordEnvelope, callback: Box<dyn WriteCallback>);

    fn get_report(&self) -> &SinkReport;

    /// Flush and release held resources. Called once, also after an aborted run.
    fn close(&mut self) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Builds sinks from their recipe config.
pub trait SinkFactory: PluginClass {
    fn create(&self, config: &Value, ctx: &PipelineContext) -> Result<Box<dyn Sink>, ConfigError>;
}

/// Callback that logs each outcome.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingCallback;

impl WriteCallback for LoggingCallback {
    fn on_success(&self, envelope: &RecordEnvelope, _success_metadata: &Map<String, Value>) {
        debug!(workunit = envelope.workunit_id().unwrap_or("-"), "Sink wrote record");
    }

    fn on_failure(
        &self,
        envelope: &RecordEnvelope,
        error: &SinkError,
        failure_metadata: &Map<String, Value>,
    ) {
        let metadata = Value::Object(failure_metadata.clone());
        warn!(
            workunit = envelope.workunit_id().unwrap_or("-"),
            error = %error,
            metadata = %metadata,
            "Sink failed to write record"
        );
    }
}

/// Callback that ignores outcomes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCallback;

impl WriteCallback for NoopCallback {
    fn on_success(&self, _envelope: &RecordEnvelope, _success_metadata: &Map<String, Value>) {}

    fn on_failure(
        &self,
        _envelope: &RecordEnvelope,
        _error: &SinkError,
        _failure_metadata: &Map<String, Value>,
    ) {
    }
}
