//! Error types for the metaingest core library.
//!
//! One `thiserror` enum per domain (registration, lookup, loading, config,
//! transformation, sources, sinks and pipeline runs), aggregated into
//! [`IngestError`].

use std::path::PathBuf;
use std::sync::Arc;

/// A shareable, type-erased failure cause.
pub type SharedError = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for the metaingest core library.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("Registration error: {0}")]
    Registration(#[from] RegistrationError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Structural errors raised when a class is registered.
///
/// These are programming errors in the plugin table and always propagate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("Cannot register abstract type {type_name} under key '{key}'")]
    AbstractClass { key: String, type_name: String },

    #[error("Plugin '{key}' ({type_name}) does not provide capability {expected}")]
    WrongCapability {
        key: String,
        type_name: String,
        expected: &'static str,
    },

    #[error("Plugin key already registered: {key}")]
    DuplicateKey { key: String },

    #[error("Plugin key '{key}' must not contain '.'")]
    ReservedCharacter { key: String },
}

/// An optional dependency of a plugin is not available in this build.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("dependency '{dependency}' is unavailable (build with feature '{feature}')")]
pub struct DependencyUnavailable {
    pub dependency: String,
    pub feature: String,
}

/// Failure while loading a discovered entry point.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Recoverable: the plugin is recorded as disabled.
    #[error(transparent)]
    DependencyUnavailable(#[from] DependencyUnavailable),

    #[error("{message}")]
    Other { message: String },
}

/// Failure while resolving a dotted import path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImportError {
    #[error("No module named '{module}'")]
    ModuleNotFound { module: String },

    #[error("Module '{module}' has no item '{item}'")]
    ItemNotFound { module: String, item: String },

    #[error("Invalid import path '{path}'")]
    InvalidPath { path: String },
}

/// Errors from registry lookups and loading.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error("Plugin not found: {key}")]
    NotFound { key: String },

    #[error("{key} is disabled; try running: {remedy}")]
    Disabled {
        key: String,
        remedy: String,
        #[source]
        cause: SharedError,
    },

    #[error("Failed to import '{path}': {source}")]
    Import {
        path: String,
        #[source]
        source: ImportError,
    },

    #[error("Failed to load entry point '{name}' from group '{group}': {source}")]
    LoadFailed {
        group: String,
        name: String,
        #[source]
        source: LoadError,
    },
}

/// Errors raised by a transformer while rewriting a record.
#[derive(Debug, thiserror::Error)]
pub enum TransformError {
    #[error("Transformer '{transformer}' failed: {message}")]
    Failed {
        transformer: String,
        message: String,
    },

    #[error("Invalid record: {message}")]
    InvalidRecord { message: String },
}

/// Errors from recipe and plugin configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Recipe file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Unsupported recipe format for {path}; expected .yml, .yaml, .toml or .json")]
    UnsupportedFormat { path: PathBuf },

    #[error("Environment variable '{name}' referenced in recipe is not set")]
    EnvVarMissing { name: String },

    #[error("Invalid recipe: {0}")]
    Recipe(#[from] Box<figment::Error>),

    #[error("Invalid config for plugin '{plugin}': {message}")]
    InvalidPluginConfig { plugin: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Build an [`ConfigError::InvalidPluginConfig`] from a serde failure.
    pub fn plugin(plugin: &str, err: impl std::fmt::Display) -> Self {
        Self::InvalidPluginConfig {
            plugin: plugin.to_string(),
            message: err.to_string(),
        }
    }
}

/// Errors raised while a source produces records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed record in {origin}: {message}")]
    Malformed { origin: String, message: String },
}

/// Errors raised by sinks.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("Server rejected record with status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Record not supported by sink '{sink}': {message}")]
    Unsupported { sink: String, message: String },
}

/// Errors from building and running a pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("Run failed: {failures} failure(s), {warnings} warning(s)")]
    RunFailed { failures: usize, warnings: usize },

    #[error("Pipeline '{run_id}' has already run; its source and sink are closed")]
    AlreadyRun { run_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_unsupported_format_lists_every_extension() {
        let err = ConfigError::UnsupportedFormat {
            path: PathBuf::from("recipe.ini"),
        };
        assert_eq!(
            err.to_string(),
            "Unsupported recipe format for recipe.ini; expected .yml, .yaml, .toml or .json"
        );
    }

    #[test]
    fn test_disabled_error_message_and_cause() {
        let cause: SharedError = Arc::new(DependencyUnavailable {
            dependency: "reqwest".into(),
            feature: "datahub-rest".into(),
        });
        let err = RegistryError::Disabled {
            key: "datahub-rest".into(),
            remedy: "cargo install metaingest --features 'datahub-rest'".into(),
            cause,
        };
        assert_eq!(
            err.to_string(),
            "datahub-rest is disabled; try running: cargo install metaingest --features 'datahub-rest'"
        );
        let source = err.source().unwrap();
        assert!(source.to_string().contains("reqwest"));
    }

    #[test]
    fn test_pipeline_error_is_transparent() {
        let err = PipelineError::from(TransformError::InvalidRecord {
            message: "bad".into(),
        });
        assert_eq!(err.to_string(), "Invalid record: bad");
    }
}
