//! Module metadata extraction
//!
//! Loads each candidate resource, identifies its module definition and reads
//! the definition's descriptor into the registry. A resource that fails to load
//! or carries no descriptor contributes nothing; extraction always continues.

use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::path::{Path, PathBuf};
use tracing::{debug, error, warn};

use crate::config::ModuleFilter;
use crate::module::registry::resource::{ModuleIdentifier, ResourceLoader};
use crate::module::traits::{ModuleDescriptor, ModuleError, ModuleHandle};
use crate::module::validation::DescriptorValidator;
use crate::utils::panic_message;

/// A descriptor together with its resolved definition and origin
#[derive(Debug, Clone)]
pub struct RegisteredModule {
    pub descriptor: ModuleDescriptor,
    pub definition: ModuleHandle,
    pub source_path: PathBuf,
}

/// Module name -> registered module
#[derive(Debug, Clone, Default)]
pub struct ModuleRegistry {
    entries: HashMap<String, RegisteredModule>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert, returning the entry previously registered under the same name
    pub fn insert(&mut self, module: RegisteredModule) -> Option<RegisteredModule> {
        self.entries.insert(module.descriptor.name.clone(), module)
    }

    pub fn get(&self, name: &str) -> Option<&RegisteredModule> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RegisteredModule)> {
        self.entries.iter()
    }

    /// Snapshot of every registered descriptor
    pub fn descriptors(&self) -> HashMap<String, ModuleDescriptor> {
        self.entries
            .iter()
            .map(|(name, module)| (name.clone(), module.descriptor.clone()))
            .collect()
    }
}

/// Metadata extractor
pub struct MetadataExtractor<'a> {
    loader: &'a dyn ResourceLoader,
    identifier: &'a dyn ModuleIdentifier,
    validator: DescriptorValidator,
    strict: bool,
}

impl<'a> MetadataExtractor<'a> {
    pub fn new(loader: &'a dyn ResourceLoader, identifier: &'a dyn ModuleIdentifier) -> Self {
        Self {
            loader,
            identifier,
            validator: DescriptorValidator::new(),
            strict: false,
        }
    }

    /// Reject invalid descriptors and fail on duplicate names
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Extract descriptors from `paths` into `registry`
    ///
    /// Returns descriptors in extraction order. Only a duplicate name in strict
    /// mode is an error; everything else is logged and skipped.
    pub async fn extract(
        &self,
        paths: &[PathBuf],
        filter: Option<&ModuleFilter>,
        registry: &mut ModuleRegistry,
    ) -> Result<Vec<ModuleDescriptor>, ModuleError> {
        let mut descriptors = Vec::new();

        for path in paths {
            if let Some(filter) = filter {
                if !filter(path.as_path()) {
                    debug!("Module filter rejected {:?}", path);
                    continue;
                }
            }

            let Some((descriptor, definition)) = self.extract_one(path).await else {
                continue;
            };

            // permissive mode only logs the findings
            let validation = self.validator.validate(&descriptor);
            if self.strict {
                if let Err(e) = validation.into_result(&descriptor.name) {
                    error!("Rejecting module from {:?}: {}", path, e);
                    continue;
                }
            }

            let previous = registry.insert(RegisteredModule {
                descriptor: descriptor.clone(),
                definition,
                source_path: path.clone(),
            });

            if let Some(previous) = previous {
                if self.strict {
                    return Err(ModuleError::DuplicateModule(format!(
                        "{} (declared in {:?} and {:?})",
                        descriptor.name, previous.source_path, path
                    )));
                }
                warn!(
                    "Module {} from {:?} replaces the one from {:?}",
                    descriptor.name, path, previous.source_path
                );
            }

            descriptors.push(descriptor);
        }

        Ok(descriptors)
    }

    /// Load, identify and read the descriptor of a single resource
    async fn extract_one(&self, path: &Path) -> Option<(ModuleDescriptor, ModuleHandle)> {
        let loaded = AssertUnwindSafe(self.loader.load(path)).catch_unwind().await;
        let resource = match loaded {
            Ok(Ok(resource)) => resource,
            Ok(Err(e)) => {
                error!("Error loading module from {:?}: {}", path, e);
                return None;
            }
            Err(panic) => {
                error!(
                    "Error loading module from {:?}: {}",
                    path,
                    panic_message(panic.as_ref())
                );
                return None;
            }
        };

        let introspected = std::panic::catch_unwind(AssertUnwindSafe(|| {
            self.identifier
                .identify(&resource)
                .and_then(|definition| definition.descriptor().map(|d| (d, definition)))
        }));

        match introspected {
            Ok(Some(found)) => Some(found),
            Ok(None) => {
                debug!("No module descriptor in {:?}", path);
                None
            }
            Err(panic) => {
                error!(
                    "Error introspecting module from {:?}: {}",
                    path,
                    panic_message(panic.as_ref())
                );
                None
            }
        }
    }
}
