//! # Metaingest Plugins
//!
//! Built-in sources, sinks and transformers, plus the entry-point table and
//! import catalog that publish them to the core registries.
//!
//! The REST sink lives behind the `datahub-rest` feature. Builds without it
//! still declare the entry point; loading it reports the missing dependency so
//! the sink shows up as disabled instead of silently vanishing.

pub mod sinks;
pub mod sources;
pub mod transformers;

use std::sync::Arc;

use metaingest_core::{
    ImportCatalog, LoadError, PluginHandle, Registries, RegistryError, SINK_GROUP, SOURCE_GROUP,
    SinkFactory, SourceFactory, StaticEntryPoints, TRANSFORMER_GROUP, TransformerFactory,
};

fn file_source() -> PluginHandle {
    PluginHandle::new::<dyn SourceFactory>(Arc::new(sources::FileSourceFactory))
}

fn console_sink() -> PluginHandle {
    PluginHandle::new::<dyn SinkFactory>(Arc::new(sinks::ConsoleSinkFactory))
}

fn file_sink() -> PluginHandle {
    PluginHandle::new::<dyn SinkFactory>(Arc::new(sinks::FileSinkFactory))
}

#[cfg(feature = "datahub-rest")]
fn load_rest_sink() -> Result<PluginHandle, LoadError> {
    Ok(PluginHandle::new::<dyn SinkFactory>(Arc::new(
        sinks::RestSinkFactory,
    )))
}

#[cfg(not(feature = "datahub-rest"))]
fn load_rest_sink() -> Result<PluginHandle, LoadError> {
    Err(metaingest_core::DependencyUnavailable {
        dependency: "reqwest".to_string(),
        feature: "datahub-rest".to_string(),
    }
    .into())
}

fn add_dataset_tags() -> PluginHandle {
    PluginHandle::new::<dyn TransformerFactory>(Arc::new(transformers::AddDatasetTagsFactory))
}

fn simple_add_dataset_tags() -> PluginHandle {
    PluginHandle::new::<dyn TransformerFactory>(Arc::new(
        transformers::SimpleAddDatasetTagsFactory,
    ))
}

fn pattern_add_dataset_tags() -> PluginHandle {
    PluginHandle::new::<dyn TransformerFactory>(Arc::new(
        transformers::PatternAddDatasetTagsFactory,
    ))
}

fn add_dataset_ownership() -> PluginHandle {
    PluginHandle::new::<dyn TransformerFactory>(Arc::new(
        transformers::AddDatasetOwnershipFactory,
    ))
}

fn simple_add_dataset_ownership() -> PluginHandle {
    PluginHandle::new::<dyn TransformerFactory>(Arc::new(
        transformers::SimpleAddDatasetOwnershipFactory,
    ))
}

/// Entry points for every built-in plugin, grouped by kind.
pub fn builtin_entry_points() -> StaticEntryPoints {
    StaticEntryPoints::new()
        .with(SOURCE_GROUP, sources::file::KEY, || Ok(file_source()))
        .with(SINK_GROUP, sinks::console::KEY, || Ok(console_sink()))
        .with(SINK_GROUP, sinks::file::KEY, || Ok(file_sink()))
        .with(SINK_GROUP, "datahub-rest", load_rest_sink)
        .with(
            TRANSFORMER_GROUP,
            transformers::add_dataset_tags::SIMPLE_KEY,
            || Ok(simple_add_dataset_tags()),
        )
        .with(
            TRANSFORMER_GROUP,
            transformers::add_dataset_tags::PATTERN_KEY,
            || Ok(pattern_add_dataset_tags()),
        )
        .with(
            TRANSFORMER_GROUP,
            transformers::add_dataset_ownership::SIMPLE_KEY,
            || Ok(simple_add_dataset_ownership()),
        )
}

/// Dotted import paths for the built-in plugin classes, including the
/// callback-driven base transformers that are never registered by key.
pub fn builtin_imports() -> Result<ImportCatalog, metaingest_core::ImportError> {
    let mut catalog = ImportCatalog::new();
    catalog.insert("metaingest_plugins.sources.FileSource", file_source)?;
    catalog.insert("metaingest_plugins.sinks.ConsoleSink", console_sink)?;
    catalog.insert("metaingest_plugins.sinks.FileSink", file_sink)?;
    #[cfg(feature = "datahub-rest")]
    catalog.insert("metaingest_plugins.sinks.RestSink", || {
        PluginHandle::new::<dyn SinkFactory>(Arc::new(sinks::RestSinkFactory))
    })?;
    catalog.insert(
        "metaingest_plugins.transformers.AddDatasetTags",
        add_dataset_tags,
    )?;
    catalog.insert(
        "metaingest_plugins.transformers.SimpleAddDatasetTags",
        simple_add_dataset_tags,
    )?;
    catalog.insert(
        "metaingest_plugins.transformers.PatternAddDatasetTags",
        pattern_add_dataset_tags,
    )?;
    catalog.insert(
        "metaingest_plugins.transformers.AddDatasetOwnership",
        add_dataset_ownership,
    )?;
    catalog.insert(
        "metaingest_plugins.transformers.SimpleAddDatasetOwnership",
        simple_add_dataset_ownership,
    )?;
    Ok(catalog)
}

/// Source, transformer and sink registries populated with the built-ins.
pub fn builtin_registries() -> Result<Registries, RegistryError> {
    let catalog = builtin_imports().map_err(|source| RegistryError::Import {
        path: "metaingest_plugins".to_string(),
        source,
    })?;
    let mut registries = Registries::new().with_importer(Arc::new(catalog));
    registries.load(&builtin_entry_points())?;
    Ok(registries)
}
