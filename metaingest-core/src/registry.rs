//! Plugin Registry: capability-typed lookup with graceful degradation.
//!
//! A `Registry<T>` maps string keys to plugin classes providing capability
//! `T` (a trait-object type such as `dyn SinkFactory`). Plugins whose
//! optional dependencies are missing are kept as disabled entries so that
//! asking for them yields an actionable configuration error instead of a bare
//! lookup failure.
//!
//! Registration takes `&mut self` and happens at startup. Afterwards a
//! registry is shared read-only, typically behind an `Arc`.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::discovery::{EntryPointProvider, ImportResolver, PluginHandle};
use crate::error::{ImportError, LoadError, RegistrationError, RegistryError, SharedError};

/// Column width used by [`Registry::summary`] for keys.
pub const SUMMARY_COL_WIDTH: usize = 15;
/// Column width used by [`Registry::summary`] for the `(disabled)` marker.
pub const SUMMARY_VERBOSE_COL_WIDTH: usize = 20;

/// Base trait of every plugin capability.
pub trait PluginClass: Send + Sync {
    /// Name of the implementing type.
    fn type_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Abstract classes cannot be built from a config mapping alone and are
    /// refused by [`Registry::register`].
    fn is_abstract(&self) -> bool {
        false
    }
}

/// State of a registered key.
pub enum RegistryEntry<T: ?Sized> {
    Enabled(Arc<T>),
    Disabled(SharedError),
}

impl<T: ?Sized> RegistryEntry<T> {
    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }
}

/// A keyed table of plugin classes for one capability.
pub struct Registry<T: ?Sized + PluginClass + 'static> {
    entries: HashMap<String, RegistryEntry<T>>,
    importer: Option<Arc<dyn ImportResolver>>,
}

impl<T: ?Sized + PluginClass + 'static> Registry<T> {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            importer: None,
        }
    }

    /// Set the resolver used for dotted keys in [`Registry::get`].
    pub fn with_importer(mut self, importer: Arc<dyn ImportResolver>) -> Self {
        self.importer = Some(importer);
        self
    }

    /// Register an enabled class under `key`.
    pub fn register(&mut self, key: &str, class: Arc<T>) -> Result<(), RegistrationError> {
        self.check_key(key)?;
        check_concrete(key, class.as_ref())?;
        debug!(key, class = class.type_name(), capability = capability::<T>(), "Registering plugin");
        self.entries
            .insert(key.to_string(), RegistryEntry::Enabled(class));
        Ok(())
    }

    /// Register a type-erased class, checking at runtime that it provides `T`.
    pub fn register_handle(
        &mut self,
        key: &str,
        handle: PluginHandle,
    ) -> Result<(), RegistrationError> {
        self.check_key(key)?;
        let class = downcast_handle::<T>(key, handle)?;
        self.register(key, class)
    }

    /// Record `key` as present but unusable because of `reason`.
    pub fn register_disabled<E>(&mut self, key: &str, reason: E) -> Result<(), RegistrationError>
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        self.check_key(key)?;
        warn!(key, reason = %reason, "Registering disabled plugin");
        self.entries
            .insert(key.to_string(), RegistryEntry::Disabled(Arc::new(reason)));
        Ok(())
    }

    /// Register every entry point of `group`.
    ///
    /// Entry points whose optional dependency is missing become disabled
    /// entries. Any other load failure and any structural registration error
    /// propagate.
    pub fn load(
        &mut self,
        group: &str,
        provider: &dyn EntryPointProvider,
    ) -> Result<(), RegistryError> {
        for entry_point in provider.entry_points(group) {
            match entry_point.load() {
                Ok(handle) => self.register_handle(&entry_point.name, handle)?,
                Err(LoadError::DependencyUnavailable(missing)) => {
                    self.register_disabled(&entry_point.name, missing)?
                }
                Err(source) => {
                    return Err(RegistryError::LoadFailed {
                        group: group.to_string(),
                        name: entry_point.name,
                        source,
                    });
                }
            }
        }
        debug!(group, plugins = self.len(), "Loaded entry points");
        Ok(())
    }

    /// Look up the class for `key`.
    ///
    /// A key containing `.` is treated as an import path and resolved through
    /// the importer without consulting or modifying the table.
    pub fn get(&self, key: &str) -> Result<Arc<T>, RegistryError> {
        if key.contains('.') {
            return self.import(key);
        }
        match self.entries.get(key) {
            None => Err(RegistryError::NotFound {
                key: key.to_string(),
            }),
            Some(RegistryEntry::Disabled(cause)) => Err(RegistryError::Disabled {
                key: key.to_string(),
                remedy: install_hint(key),
                cause: Arc::clone(cause),
            }),
            Some(RegistryEntry::Enabled(class)) => Ok(Arc::clone(class)),
        }
    }

    pub fn is_enabled(&self, key: &str) -> Result<bool, RegistryError> {
        self.entries
            .get(key)
            .map(RegistryEntry::is_enabled)
            .ok_or_else(|| RegistryError::NotFound {
                key: key.to_string(),
            })
    }

    pub fn entry(&self, key: &str) -> Option<&RegistryEntry<T>> {
        self.entries.get(key)
    }

    /// All keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }

    /// Enabled keys, sorted.
    pub fn enabled_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_enabled())
            .map(|(key, _)| key.as_str())
            .collect();
        keys.sort_unstable();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One line per key in sorted order.
    ///
    /// Disabled keys are marked `(disabled)`. In verbose mode enabled keys
    /// show their implementation type and disabled keys the failure.
    pub fn summary(&self, verbose: bool) -> String {
        let mut lines = Vec::with_capacity(self.entries.len());
        for key in self.keys() {
            let line = match &self.entries[key] {
                RegistryEntry::Enabled(class) if verbose => {
                    format!("{key:<SUMMARY_COL_WIDTH$}{}", short_type_name(class.type_name()))
                }
                RegistryEntry::Enabled(_) => key.to_string(),
                RegistryEntry::Disabled(cause) if verbose => format!(
                    "{key:<SUMMARY_COL_WIDTH$}{:<SUMMARY_VERBOSE_COL_WIDTH$}{cause}",
                    "(disabled)"
                ),
                RegistryEntry::Disabled(_) => format!("{key:<SUMMARY_COL_WIDTH$}(disabled)"),
            };
            lines.push(line);
        }
        lines.join("\n")
    }

    fn check_key(&self, key: &str) -> Result<(), RegistrationError> {
        if self.entries.contains_key(key) {
            return Err(RegistrationError::DuplicateKey {
                key: key.to_string(),
            });
        }
        if key.contains('.') {
            return Err(RegistrationError::ReservedCharacter {
                key: key.to_string(),
            });
        }
        Ok(())
    }

    fn import(&self, path: &str) -> Result<Arc<T>, RegistryError> {
        let import_err = |source| RegistryError::Import {
            path: path.to_string(),
            source,
        };
        let importer = self.importer.as_ref().ok_or_else(|| {
            import_err(ImportError::ModuleNotFound {
                module: path.rsplit_once('.').map_or(path, |(m, _)| m).to_string(),
            })
        })?;
        let handle = importer.resolve(path).map_err(import_err)?;
        let class = downcast_handle::<T>(path, handle)?;
        check_concrete(path, class.as_ref())?;
        debug!(path, class = class.type_name(), "Imported plugin");
        Ok(class)
    }
}

impl<T: ?Sized + PluginClass + 'static> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Remedy shown for disabled plugins.
pub fn install_hint(key: &str) -> String {
    format!("cargo install metaingest --features '{key}'")
}

fn capability<T: ?Sized>() -> &'static str {
    std::any::type_name::<T>()
}

fn check_concrete<T: ?Sized + PluginClass>(key: &str, class: &T) -> Result<(), RegistrationError> {
    if class.is_abstract() {
        return Err(RegistrationError::AbstractClass {
            key: key.to_string(),
            type_name: class.type_name().to_string(),
        });
    }
    Ok(())
}

fn downcast_handle<T: ?Sized + PluginClass + 'static>(
    key: &str,
    handle: PluginHandle,
) -> Result<Arc<T>, RegistrationError> {
    handle
        .downcast::<T>()
        .map_err(|handle| RegistrationError::WrongCapability {
            key: key.to_string(),
            type_name: handle.type_name().to_string(),
            expected: capability::<T>(),
        })
}

fn short_type_name(name: &str) -> &str {
    let base = name.split('<').next().unwrap_or(name);
    base.rsplit("::").next().unwrap_or(base)
}
