//! Module manager orchestrating discovery and loading
//!
//! Wires scanner -> extractor -> orderer -> loader and owns the registry and
//! the loaded-module map for the lifetime of one manager instance.

use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::config::LoaderOptions;
use crate::module::loader::ModuleLoader;
use crate::module::registry::{
    ManifestResourceLoader, MetadataExtractor, ModuleDependencies, ModuleDiscovery,
    ModuleIdentifier, ModuleRegistry, ResourceLoader, SuffixIdentifier,
};
use crate::module::traits::{ModuleDescriptor, ModuleError, ModuleHandle, ModuleLoadResult};

/// Module manager coordinates discovery and loading of modules
pub struct ModuleManager {
    /// Turns candidate paths into exported items
    resource_loader: Arc<dyn ResourceLoader>,
    /// Picks the module definition out of a loaded resource
    identifier: Arc<dyn ModuleIdentifier>,
    /// Every discovered descriptor, including disabled and unloaded ones
    registry: ModuleRegistry,
    /// Instantiated modules (name -> handle)
    loaded_modules: HashMap<String, ModuleHandle>,
}

impl ModuleManager {
    /// Create a manager using the default `Module`-suffix identifier
    pub fn new(resource_loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            resource_loader,
            identifier: Arc::new(SuffixIdentifier::default()),
            registry: ModuleRegistry::new(),
            loaded_modules: HashMap::new(),
        }
    }

    /// Create a manager reading `*.module.toml` manifests from disk
    pub fn with_manifests() -> Self {
        Self::new(Arc::new(ManifestResourceLoader::new()))
    }

    /// Replace the module identifier
    pub fn with_identifier(mut self, identifier: Arc<dyn ModuleIdentifier>) -> Self {
        self.identifier = identifier;
        self
    }

    /// Scan for modules and optionally load them
    ///
    /// The registry and loaded-module map are rebuilt on every call. Only a
    /// dependency cycle aborts the run (plus duplicate names, missing
    /// dependencies and invalid patterns in strict mode); every per-module
    /// failure is reported in that module's result.
    pub async fn scan_and_load(
        &mut self,
        options: &LoaderOptions,
    ) -> Result<Vec<ModuleLoadResult>, ModuleError> {
        let span = info_span!("scan_and_load", run_id = %Uuid::new_v4());
        self.run(options).instrument(span).await
    }

    async fn run(&mut self, options: &LoaderOptions) -> Result<Vec<ModuleLoadResult>, ModuleError> {
        self.registry.clear();
        self.loaded_modules.clear();

        let files = ModuleDiscovery::from_options(options)?.discover();

        let descriptors = MetadataExtractor::new(
            self.resource_loader.as_ref(),
            self.identifier.as_ref(),
        )
        .strict(options.strict)
        .extract(&files, options.module_filter.as_ref(), &mut self.registry)
        .await?;

        let order = Self::order(&descriptors, options.strict)?;
        info!("Registered {} modules", order.len());

        if !options.auto_load {
            return Ok(order
                .iter()
                .map(|descriptor| ModuleLoadResult::registered(descriptor.name.clone()))
                .collect());
        }

        let results = if options.parallel {
            ModuleLoader::load_parallel(&self.registry, &order).await
        } else {
            ModuleLoader::load_serial(&self.registry, &order).await
        };
        self.record(&results);

        let loaded = results.iter().filter(|r| r.loaded).count();
        info!("Loaded {} of {} modules", loaded, results.len());
        Ok(results)
    }

    fn order(
        descriptors: &[ModuleDescriptor],
        strict: bool,
    ) -> Result<Vec<ModuleDescriptor>, ModuleError> {
        let ordered = if strict {
            ModuleDependencies::order_strict(descriptors)
        } else {
            ModuleDependencies::order(descriptors)
        };
        ordered.map_err(|e| {
            error!("Module ordering failed: {}", e);
            e
        })
    }

    /// Load a specific registered module by name
    ///
    /// Unregistered names are reported in the result, never as an error.
    pub async fn load_module_by_name(&mut self, name: &str) -> ModuleLoadResult {
        let result = ModuleLoader::load(&self.registry, name).await;
        self.record(std::slice::from_ref(&result));
        result
    }

    fn record(&mut self, results: &[ModuleLoadResult]) {
        for result in results.iter().filter(|r| r.loaded) {
            if let Some(handle) = &result.module {
                self.loaded_modules
                    .insert(result.name.clone(), Arc::clone(handle));
            }
        }
    }

    /// Get all loaded modules
    pub fn loaded_modules(&self) -> &HashMap<String, ModuleHandle> {
        &self.loaded_modules
    }

    /// Snapshot of every discovered descriptor
    pub fn module_registry(&self) -> HashMap<String, ModuleDescriptor> {
        self.registry.descriptors()
    }

    /// The registry with resolved definitions and source paths
    pub fn registry(&self) -> &ModuleRegistry {
        &self.registry
    }
}
