//! Pipeline orchestrator: source → transformers → sink.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};

use crate::config::PipelineConfig;
use crate::discovery::{
    EntryPointProvider, ImportResolver, SINK_GROUP, SOURCE_GROUP, TRANSFORMER_GROUP,
};
use crate::error::{PipelineError, RegistryError};
use crate::registry::Registry;
use crate::report::{self, SinkReport, SourceReport};
use crate::sink::{LoggingCallback, Sink, SinkFactory};
use crate::source::{Source, SourceFactory};
use crate::transform::{self, Transformer, TransformerFactory};

/// Per-run information handed to every plugin factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineContext {
    pub run_id: String,
}

impl PipelineContext {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
        }
    }
}

/// Run id used when the recipe does not set one.
pub fn default_run_id(source_type: &str) -> String {
    format!("{source_type}-{}", Utc::now().format("%Y_%m_%d-%H_%M_%S"))
}

/// The three plugin registries a pipeline resolves against.
pub struct Registries {
    pub sources: Registry<dyn SourceFactory>,
    pub transformers: Registry<dyn TransformerFactory>,
    pub sinks: Registry<dyn SinkFactory>,
}

impl Registries {
    pub fn new() -> Self {
        Self {
            sources: Registry::new(),
            transformers: Registry::new(),
            sinks: Registry::new(),
        }
    }

    /// Use `importer` for dotted keys in all three registries.
    pub fn with_importer(self, importer: Arc<dyn ImportResolver>) -> Self {
        Self {
            sources: self.sources.with_importer(Arc::clone(&importer)),
            transformers: self.transformers.with_importer(Arc::clone(&importer)),
            sinks: self.sinks.with_importer(importer),
        }
    }

    /// Load the source, transformer and sink groups from `provider`.
    pub fn load(&mut self, provider: &dyn EntryPointProvider) -> Result<(), RegistryError> {
        self.sources.load(SOURCE_GROUP, provider)?;
        self.transformers.load(TRANSFORMER_GROUP, provider)?;
        self.sinks.load(SINK_GROUP, provider)?;
        Ok(())
    }
}

impl Default for Registries {
    fn default() -> Self {
        Self::new()
    }
}

/// A configured ingestion run.
pub struct Pipeline {
    ctx: PipelineContext,
    source_type: String,
    sink_type: String,
    source: Box<dyn Source>,
    transformers: Vec<Box<dyn Transformer>>,
    sink: Box<dyn Sink>,
    run_errors: Vec<String>,
    closed: bool,
}

impl Pipeline {
    /// Resolve and build every stage named by `config`.
    pub fn create(config: PipelineConfig, registries: &Registries) -> Result<Self, PipelineError> {
        let run_id = config
            .run_id
            .clone()
            .unwrap_or_else(|| default_run_id(&config.source.plugin_type));
        let ctx = PipelineContext::new(run_id);

        let source = registries
            .sources
            .get(&config.source.plugin_type)?
            .create(&config.source.config, &ctx)?;

        let mut transformers = Vec::with_capacity(config.transformers.len());
        for transformer in &config.transformers {
            let factory = registries.transformers.get(&transformer.plugin_type)?;
            transformers.push(factory.create(&transformer.config, &ctx)?);
        }

        let sink = registries
            .sinks
            .get(&config.sink.plugin_type)?
            .create(&config.sink.config, &ctx)?;

        info!(
            run_id = %ctx.run_id,
            source = %config.source.plugin_type,
            sink = %config.sink.plugin_type,
            transformers = transformers.len(),
            "Created pipeline"
        );

        Ok(Self {
            ctx,
            source_type: config.source.plugin_type,
            sink_type: config.sink.plugin_type,
            source,
            transformers,
            sink,
            run_errors: Vec::new(),
            closed: false,
        })
    }

    pub fn context(&self) -> &PipelineContext {
        &self.ctx
    }

    /// Pull every envelope through the transformers into the sink.
    ///
    /// The first error item stops the run; it is recorded and returned.
    /// Source and sink are closed in every case, so a pipeline runs at most
    /// once; later calls fail with [`PipelineError::AlreadyRun`].
    pub fn run(&mut self) -> Result<(), PipelineError> {
        if self.closed {
            return Err(PipelineError::AlreadyRun {
                run_id: self.ctx.run_id.clone(),
            });
        }
        info!(run_id = %self.ctx.run_id, "Starting pipeline run");
        let pumped = self.pump();
        let closed = self.close();

        let outcome = pumped.and_then(|written| closed.map(|()| written));
        match outcome {
            Ok(written) => {
                info!(run_id = %self.ctx.run_id, records = written, "Pipeline run finished");
                Ok(())
            }
            Err(err) => {
                error!(run_id = %self.ctx.run_id, error = %err, "Pipeline run failed");
                self.run_errors.push(err.to_string());
                Err(err)
            }
        }
    }

    fn pump(&mut self) -> Result<usize, PipelineError> {
        let Self {
            source,
            transformers,
            sink,
            ..
        } = self;
        let mut written = 0;
        for item in transform::chain(source.get_records(), transformers) {
            sink.write_record_async(item?, Box::new(LoggingCallback));
            written += 1;
        }
        Ok(written)
    }

    /// Close source and sink once.
    fn close(&mut self) -> Result<(), PipelineError> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.source.close();
        self.sink.close()?;
        Ok(())
    }

    pub fn source_report(&self) -> &SourceReport {
        self.source.get_report()
    }

    pub fn sink_report(&self) -> &SinkReport {
        self.sink.get_report()
    }

    /// Errors that aborted the run, if any.
    pub fn run_errors(&self) -> &[String] {
        &self.run_errors
    }

    /// Fail when the run, the source or the sink reported failures, or
    /// warnings when `raise_warnings` is set.
    pub fn raise_from_status(&self, raise_warnings: bool) -> Result<(), PipelineError> {
        let source = self.source_report();
        let sink = self.sink_report();
        let failures = self.run_errors.len() + source.failure_count() + sink.failures.len();
        let warnings = source.warning_count() + sink.warnings.len();
        if failures > 0 || (raise_warnings && warnings > 0) {
            return Err(PipelineError::RunFailed { failures, warnings });
        }
        Ok(())
    }

    /// Human-readable run summary.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Source ({}) report:\n", self.source_type));
        out.push_str(&report::render(self.source_report()));
        out.push_str(&format!("\nSink ({}) report:\n", self.sink_type));
        out.push_str(&report::render(self.sink_report()));
        if !self.run_errors.is_empty() {
            out.push_str("\nRun errors:\n");
            for err in &self.run_errors {
                out.push_str(&format!("  - {err}\n"));
            }
        }
        out
    }

    pub fn pretty_print_summary(&self) {
        println!("{}", self.summary());
    }
}

impl Drop for Pipeline {
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            error!(error = %e, "Failed to close pipeline");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_run_id_shape() {
        let run_id = default_run_id("file");
        let stamp = run_id.strip_prefix("file-").unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, "%Y_%m_%d-%H_%M_%S").is_ok());
    }

    #[test]
    fn test_empty_registries() {
        let registries = Registries::default();
        assert!(registries.sources.is_empty());
        assert!(registries.transformers.is_empty());
        assert!(registries.sinks.is_empty());
    }
}
