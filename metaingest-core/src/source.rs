//! Source capability: produces the record stream for a run.

use serde_json::Value;

use crate::error::ConfigError;
use crate::pipeline::PipelineContext;
use crate::registry::PluginClass;
use crate::report::SourceReport;
use crate::transform::RecordStream;

pub trait Source: Send {
    /// Lazily produce envelopes. The stream borrows the source, so report
    /// updates made while iterating are visible once it is dropped.
    fn get_records(&mut self) -> RecordStream<'_>;

    fn get_report(&self) -> &SourceReport;

    /// Release held resources. Called once, also after an aborted run.
    fn close(&mut self) {}
}

/// Builds sources from their recipe config.
pub trait SourceFactory: PluginClass {
    fn create(&self, config: &Value, ctx: &PipelineContext)
    -> Result<Box<dyn Source>, ConfigError>;
}
