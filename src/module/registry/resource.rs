//! Resource loading and module identification
//!
//! A [`ResourceLoader`] turns a candidate path into a [`LoadedResource`] (the
//! set of things that resource exports). A [`ModuleIdentifier`] then picks the
//! module definition out of those exports. Hosts plug in their own loaders and
//! naming conventions; the loader core never hard-codes either.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crate::module::traits::{ModuleError, ModuleHandle};

/// A single exported item of a loaded resource
#[derive(Debug, Clone)]
pub enum Export {
    /// Something that can be registered as a module
    Definition(ModuleHandle),
    /// Plain data; never treated as a module
    Value(serde_json::Value),
}

impl Export {
    pub fn as_definition(&self) -> Option<&ModuleHandle> {
        match self {
            Export::Definition(definition) => Some(definition),
            Export::Value(_) => None,
        }
    }
}

/// Everything a resource exports
#[derive(Debug, Clone, Default)]
pub struct LoadedResource {
    /// Primary export
    pub default: Option<Export>,
    /// Named exports, in declaration order
    pub named: Vec<(String, Export)>,
}

impl LoadedResource {
    /// A resource exporting nothing
    pub fn empty() -> Self {
        Self::default()
    }

    /// A resource whose primary export is `definition`
    pub fn with_default(definition: ModuleHandle) -> Self {
        Self {
            default: Some(Export::Definition(definition)),
            named: Vec::new(),
        }
    }

    /// Add a named export
    pub fn export(mut self, name: impl Into<String>, item: Export) -> Self {
        self.named.push((name.into(), item));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.named.is_empty()
    }
}

/// Loads the resource behind a candidate path
#[async_trait]
pub trait ResourceLoader: Send + Sync {
    async fn load(&self, path: &Path) -> Result<LoadedResource, ModuleError>;
}

/// Picks the module definition out of a loaded resource
pub trait ModuleIdentifier: Send + Sync {
    fn identify(&self, resource: &LoadedResource) -> Option<ModuleHandle>;
}

/// Default identifier: the primary export if it is a definition, otherwise the
/// first named definition whose export name ends with the suffix
#[derive(Debug, Clone)]
pub struct SuffixIdentifier {
    suffix: String,
}

impl SuffixIdentifier {
    pub fn new(suffix: impl Into<String>) -> Self {
        Self {
            suffix: suffix.into(),
        }
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }
}

impl Default for SuffixIdentifier {
    fn default() -> Self {
        Self::new("Module")
    }
}

impl ModuleIdentifier for SuffixIdentifier {
    fn identify(&self, resource: &LoadedResource) -> Option<ModuleHandle> {
        if let Some(definition) = resource.default.as_ref().and_then(Export::as_definition) {
            return Some(Arc::clone(definition));
        }

        resource
            .named
            .iter()
            .filter(|(name, _)| name.ends_with(&self.suffix))
            .find_map(|(_, item)| item.as_definition().cloned())
    }
}

/// Produces a resource for a matched catalog entry
pub type ResourceFn = Arc<dyn Fn(&Path) -> Result<LoadedResource, ModuleError> + Send + Sync>;

/// In-process resource catalog for hosts whose modules are compiled in
///
/// Entries are keyed by full path or by file name; the full path wins.
/// Paths with no entry load as an empty resource.
#[derive(Clone, Default)]
pub struct StaticCatalog {
    entries: HashMap<String, ResourceFn>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fixed resource under `key`
    pub fn with_resource(self, key: impl Into<String>, resource: LoadedResource) -> Self {
        self.with_loader(key, move |_| Ok(resource.clone()))
    }

    /// Register a resource producer under `key`
    pub fn with_loader<F>(mut self, key: impl Into<String>, loader: F) -> Self
    where
        F: Fn(&Path) -> Result<LoadedResource, ModuleError> + Send + Sync + 'static,
    {
        self.entries.insert(key.into(), Arc::new(loader));
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn lookup(&self, path: &Path) -> Option<&ResourceFn> {
        self.entries.get(path.to_string_lossy().as_ref()).or_else(|| {
            path.file_name()
                .and_then(|name| self.entries.get(name.to_string_lossy().as_ref()))
        })
    }
}

#[async_trait]
impl ResourceLoader for StaticCatalog {
    async fn load(&self, path: &Path) -> Result<LoadedResource, ModuleError> {
        match self.lookup(path) {
            Some(loader) => loader(path),
            None => {
                debug!("No catalog entry for {:?}", path);
                Ok(LoadedResource::empty())
            }
        }
    }
}
