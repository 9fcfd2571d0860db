//! Plugin discovery: entry-point tables and dotted-path imports.
//!
//! Entry points are declared in a build-time table grouped by plugin kind.
//! A plugin whose Cargo feature is not compiled in still declares its entry
//! point, but the loader returns [`LoadError::DependencyUnavailable`] so the
//! registry can record it as disabled.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{ImportError, LoadError};
use crate::registry::PluginClass;

pub const SOURCE_GROUP: &str = "metaingest.ingestion.source.plugins";
pub const TRANSFORMER_GROUP: &str = "metaingest.ingestion.transformer.plugins";
pub const SINK_GROUP: &str = "metaingest.ingestion.sink.plugins";

/// A type-erased plugin class: an `Arc<T>` for some capability `T`.
///
/// Registries recover the typed class with [`PluginHandle::downcast`]; a
/// handle built for a different capability fails the downcast.
pub struct PluginHandle {
    type_name: &'static str,
    capability: &'static str,
    class: Box<dyn Any + Send + Sync>,
}

impl PluginHandle {
    /// Wrap a class under capability `T`, e.g.
    /// `PluginHandle::new::<dyn SinkFactory>(Arc::new(FileSinkFactory))`.
    pub fn new<T: ?Sized + PluginClass + 'static>(class: Arc<T>) -> Self {
        Self {
            type_name: class.type_name(),
            capability: std::any::type_name::<T>(),
            class: Box::new(class),
        }
    }

    /// Implementation type of the wrapped class.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Capability the handle was built for.
    pub fn capability(&self) -> &'static str {
        self.capability
    }

    /// Recover the class as capability `T`; returns the handle unchanged on
    /// mismatch.
    pub fn downcast<T: ?Sized + 'static>(self) -> Result<Arc<T>, Self> {
        let Self {
            type_name,
            capability,
            class,
        } = self;
        match class.downcast::<Arc<T>>() {
            Ok(class) => Ok(*class),
            Err(class) => Err(Self {
                type_name,
                capability,
                class,
            }),
        }
    }
}

impl fmt::Debug for PluginHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginHandle")
            .field("type_name", &self.type_name)
            .field("capability", &self.capability)
            .finish_non_exhaustive()
    }
}

pub type EntryPointLoader = fn() -> Result<PluginHandle, LoadError>;

/// A named, lazily loaded plugin declaration.
#[derive(Clone)]
pub struct EntryPoint {
    pub name: String,
    pub loader: EntryPointLoader,
}

impl EntryPoint {
    pub fn new(name: impl Into<String>, loader: EntryPointLoader) -> Self {
        Self {
            name: name.into(),
            loader,
        }
    }

    pub fn load(&self) -> Result<PluginHandle, LoadError> {
        (self.loader)()
    }
}

impl fmt::Debug for EntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryPoint")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// Enumerates entry points for a discovery group.
pub trait EntryPointProvider: Send + Sync {
    fn entry_points(&self, group: &str) -> Vec<EntryPoint>;
}

/// Entry points declared in a table at build time.
#[derive(Debug, Clone, Default)]
pub struct StaticEntryPoints {
    groups: HashMap<String, Vec<EntryPoint>>,
}

impl StaticEntryPoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, group: &str, name: &str, loader: EntryPointLoader) -> Self {
        self.add(group, name, loader);
        self
    }

    pub fn add(&mut self, group: &str, name: &str, loader: EntryPointLoader) {
        self.groups
            .entry(group.to_string())
            .or_default()
            .push(EntryPoint::new(name, loader));
    }

    /// Names of the groups with at least one entry point.
    pub fn groups(&self) -> Vec<&str> {
        let mut groups: Vec<&str> = self.groups.keys().map(String::as_str).collect();
        groups.sort_unstable();
        groups
    }
}

impl EntryPointProvider for StaticEntryPoints {
    fn entry_points(&self, group: &str) -> Vec<EntryPoint> {
        self.groups.get(group).cloned().unwrap_or_default()
    }
}

/// Resolves a dotted path such as `metaingest_plugins.sink.FileSink` to a
/// plugin class.
pub trait ImportResolver: Send + Sync {
    fn resolve(&self, path: &str) -> Result<PluginHandle, ImportError>;
}

pub type ClassConstructor = fn() -> PluginHandle;

/// Table-backed [`ImportResolver`]: module path → item name → constructor.
#[derive(Debug, Clone, Default)]
pub struct ImportCatalog {
    modules: HashMap<String, HashMap<String, ClassConstructor>>,
}

impl ImportCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `path` (`module.Item`) to the catalog.
    pub fn insert(&mut self, path: &str, constructor: ClassConstructor) -> Result<(), ImportError> {
        let (module, item) = split_path(path)?;
        self.modules
            .entry(module.to_string())
            .or_default()
            .insert(item.to_string(), constructor);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.modules.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ImportResolver for ImportCatalog {
    fn resolve(&self, path: &str) -> Result<PluginHandle, ImportError> {
        let (module, item) = split_path(path)?;
        let items = self
            .modules
            .get(module)
            .ok_or_else(|| ImportError::ModuleNotFound {
                module: module.to_string(),
            })?;
        let constructor = items.get(item).ok_or_else(|| ImportError::ItemNotFound {
            module: module.to_string(),
            item: item.to_string(),
        })?;
        Ok(constructor())
    }
}

fn split_path(path: &str) -> Result<(&str, &str), ImportError> {
    match path.rsplit_once('.') {
        Some((module, item)) if !module.is_empty() && !item.is_empty() => Ok((module, item)),
        _ => Err(ImportError::InvalidPath {
            path: path.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DependencyUnavailable;

    trait Shape: PluginClass {
        fn sides(&self) -> usize;
    }

    trait Color: PluginClass {}

    struct Square;

    impl PluginClass for Square {}

    impl Shape for Square {
        fn sides(&self) -> usize {
            4
        }
    }

    fn square() -> PluginHandle {
        PluginHandle::new::<dyn Shape>(Arc::new(Square))
    }

    #[test]
    fn test_handle_downcast_to_own_capability() {
        let shape = square().downcast::<dyn Shape>().unwrap();
        assert_eq!(shape.sides(), 4);
    }

    #[test]
    fn test_handle_downcast_to_other_capability_fails() {
        let handle = square().downcast::<dyn Color>().err().unwrap();
        assert!(handle.type_name().ends_with("Square"));
        assert!(handle.capability().contains("Shape"));
    }

    #[test]
    fn test_static_entry_points_keep_order() {
        fn missing() -> Result<PluginHandle, LoadError> {
            Err(DependencyUnavailable {
                dependency: "reqwest".into(),
                feature: "rest".into(),
            }
            .into())
        }
        let table = StaticEntryPoints::new()
            .with("shapes", "square", || Ok(square()))
            .with("shapes", "rest", missing);

        let names: Vec<String> = table
            .entry_points("shapes")
            .into_iter()
            .map(|ep| ep.name)
            .collect();
        assert_eq!(names, vec!["square", "rest"]);
        assert!(table.entry_points("colors").is_empty());
        assert!(table.entry_points("shapes")[1].load().is_err());
    }

    #[test]
    fn test_catalog_resolution_errors() {
        let mut catalog = ImportCatalog::new();
        catalog.insert("geometry.shapes.Square", square).unwrap();
        assert_eq!(catalog.len(), 1);

        assert!(catalog.resolve("geometry.shapes.Square").is_ok());
        assert_eq!(
            catalog.resolve("geometry.colors.Red").unwrap_err(),
            ImportError::ModuleNotFound {
                module: "geometry.colors".into()
            }
        );
        assert_eq!(
            catalog.resolve("geometry.shapes.Circle").unwrap_err(),
            ImportError::ItemNotFound {
                module: "geometry.shapes".into(),
                item: "Circle".into()
            }
        );
        assert!(matches!(
            catalog.resolve("nodots"),
            Err(ImportError::InvalidPath { .. })
        ));
    }
}
