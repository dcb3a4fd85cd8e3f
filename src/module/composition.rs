//! Composition helpers for hosts
//!
//! A [`ModuleComposition`] is what a host wires into its own composition
//! root: the options it was built from, the handles of every successfully
//! loaded module, the full per-module results and whether the set is exposed
//! globally.

use std::sync::Arc;
use tracing::info;

use crate::config::LoaderConfig;
use crate::module::manager::ModuleManager;
use crate::module::registry::ResourceLoader;
use crate::module::traits::{ModuleError, ModuleHandle, ModuleLoadResult};

/// Composed module set handed to the host
pub struct ModuleComposition {
    config: LoaderConfig,
    imports: Vec<ModuleHandle>,
    results: Vec<ModuleLoadResult>,
    manager: ModuleManager,
}

impl ModuleComposition {
    /// Compose without scanning
    ///
    /// The manager is ready for a later `scan_and_load`; nothing is imported yet.
    pub fn register(config: LoaderConfig, resource_loader: Arc<dyn ResourceLoader>) -> Self {
        Self {
            config,
            imports: Vec::new(),
            results: Vec::new(),
            manager: ModuleManager::new(resource_loader),
        }
    }

    /// Scan and load, then compose the successfully loaded modules
    ///
    /// Every result is kept; only loaded handles become imports.
    pub async fn register_async(
        config: LoaderConfig,
        resource_loader: Arc<dyn ResourceLoader>,
    ) -> Result<Self, ModuleError> {
        let mut manager = ModuleManager::new(resource_loader);
        let results = manager.scan_and_load(&config.loader).await?;

        let imports: Vec<ModuleHandle> = results
            .iter()
            .filter(|r| r.loaded)
            .filter_map(|r| r.module.clone())
            .collect();

        info!(
            "Composed {} modules (global: {})",
            imports.len(),
            config.is_global
        );

        Ok(Self {
            config,
            imports,
            results,
            manager,
        })
    }

    /// Handles of successfully loaded modules, in load order
    pub fn imports(&self) -> &[ModuleHandle] {
        &self.imports
    }

    /// Every per-module outcome of the scan
    pub fn results(&self) -> &[ModuleLoadResult] {
        &self.results
    }

    pub fn is_global(&self) -> bool {
        self.config.is_global
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn manager(&self) -> &ModuleManager {
        &self.manager
    }

    pub fn manager_mut(&mut self) -> &mut ModuleManager {
        &mut self.manager
    }
}
