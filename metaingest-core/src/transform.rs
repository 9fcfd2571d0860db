//! Streaming record transformation.
//!
//! A [`RecordStream`] is a lazy, pull-based sequence of envelopes. Each
//! transformer wraps the stream it receives and returns a new one, so a chain
//! of N transformers holds at most one envelope per stage at any time.

use serde_json::Value;

use crate::envelope::RecordEnvelope;
use crate::error::{ConfigError, PipelineError, TransformError};
use crate::pipeline::PipelineContext;
use crate::registry::PluginClass;

/// Lazy stream of envelopes. An `Err` item aborts the run.
pub type RecordStream<'a> = Box<dyn Iterator<Item = Result<RecordEnvelope, PipelineError>> + 'a>;

/// A stage that rewrites, drops or adds envelopes.
pub trait Transformer: Send {
    /// Name used in logs and error messages.
    fn name(&self) -> &str;

    /// Rewrite a single envelope; `Ok(None)` drops it.
    fn transform_one(
        &self,
        envelope: RecordEnvelope,
    ) -> Result<Option<RecordEnvelope>, TransformError> {
        Ok(Some(envelope))
    }

    /// Wrap `records` lazily. Upstream errors pass through untouched and
    /// order is preserved.
    fn transform<'a>(&'a self, records: RecordStream<'a>) -> RecordStream<'a> {
        Box::new(records.filter_map(move |item| match item {
            Ok(envelope) => self
                .transform_one(envelope)
                .map_err(PipelineError::from)
                .transpose(),
            Err(err) => Some(Err(err)),
        }))
    }
}

/// Builds transformers from their recipe config.
pub trait TransformerFactory: PluginClass {
    fn create(
        &self,
        config: &Value,
        ctx: &PipelineContext,
    ) -> Result<Box<dyn Transformer>, ConfigError>;
}

/// Transformer that forwards every envelope unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Transformer for Passthrough {
    fn name(&self) -> &str {
        "passthrough"
    }
}

#[derive(Debug, Default)]
pub struct PassthroughFactory;

impl PluginClass for PassthroughFactory {}

impl TransformerFactory for PassthroughFactory {
    fn create(
        &self,
        _config: &Value,
        _ctx: &PipelineContext,
    ) -> Result<Box<dyn Transformer>, ConfigError> {
        Ok(Box::new(Passthrough))
    }
}

/// Apply `transformers` in order on top of `records`.
pub fn chain<'a>(
    records: RecordStream<'a>,
    transformers: &'a [Box<dyn Transformer>],
) -> RecordStream<'a> {
    transformers
        .iter()
        .fold(records, |stream, transformer| transformer.transform(stream))
}

/// Wrap an in-memory list of envelopes as a stream.
pub fn stream_of<'a>(envelopes: Vec<RecordEnvelope>) -> RecordStream<'a> {
    Box::new(envelopes.into_iter().map(Ok))
}
