//! # Metaingest Core
//!
//! Core library for the metaingest metadata ingestion framework.
//! Provides the typed change-event model, the plugin registry with graceful
//! degradation, record envelopes, the streaming transformer pipeline and the
//! pipeline orchestrator.

pub mod config;
pub mod discovery;
pub mod envelope;
pub mod error;
pub mod metadata;
pub mod pipeline;
pub mod registry;
pub mod report;
pub mod sink;
pub mod source;
pub mod transform;
pub mod urn;

// Re-export commonly used types at the crate root.
pub use config::{PipelineConfig, PluginConfig, load_recipe, parse_plugin_config};
pub use discovery::{
    EntryPoint, EntryPointProvider, ImportCatalog, ImportResolver, PluginHandle, SINK_GROUP,
    SOURCE_GROUP, StaticEntryPoints, TRANSFORMER_GROUP,
};
pub use envelope::{RecordEnvelope, WORKUNIT_ID};
pub use error::{
    ConfigError, DependencyUnavailable, ImportError, IngestError, LoadError, PipelineError,
    RegistrationError, RegistryError, SinkError, SourceError, TransformError,
};
pub use metadata::{MetadataChangeEvent, Record, Snapshot, SnapshotKind};
pub use pipeline::{Pipeline, PipelineContext, Registries};
pub use registry::{PluginClass, Registry, RegistryEntry};
pub use report::{SinkReport, SourceReport};
pub use sink::{LoggingCallback, Sink, SinkFactory, WriteCallback};
pub use source::{Source, SourceFactory};
pub use transform::{RecordStream, Transformer, TransformerFactory};
