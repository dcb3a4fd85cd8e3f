//! Module loader implementation
//!
//! Turns ordered descriptors into load results. Loading never fails as a
//! whole: every failure is captured into the affected module's result.

use futures::future::join_all;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tracing::{error, info};

use crate::module::registry::ModuleRegistry;
use crate::module::traits::{
    ModuleDescriptor, ModuleError, ModuleFactory, ModuleHandle, ModuleLoadResult,
};
use crate::utils::panic_message;

/// Module loader for instantiating registered modules
pub struct ModuleLoader;

impl ModuleLoader {
    /// Load a single module by name from the registry
    ///
    /// Disabled modules are reported with their raw definition and no error.
    pub async fn load(registry: &ModuleRegistry, name: &str) -> ModuleLoadResult {
        let Some(registered) = registry.get(name) else {
            let not_found = ModuleError::ModuleNotFound(name.to_string());
            return ModuleLoadResult::failed(name, not_found.to_string());
        };

        if !registered.descriptor.enabled {
            info!("Skipping disabled module: {}", name);
            return ModuleLoadResult::disabled(name, Arc::clone(&registered.definition));
        }

        info!("Loading module: {}", name);

        match Self::instantiate(&registered.definition).await {
            Ok(handle) => ModuleLoadResult::loaded(name, handle),
            Err(e) => {
                error!("Error loading module {}: {}", name, e);
                ModuleLoadResult::failed(name, e.to_string())
            }
        }
    }

    /// Produce the loaded handle for a definition
    ///
    /// Root registration is preferred over generic registration; without a
    /// factory the definition itself is the handle. Panics while selecting or
    /// running the factory are caught.
    pub async fn instantiate(definition: &ModuleHandle) -> Result<ModuleHandle, ModuleError> {
        let definition = Arc::clone(definition);
        let attempt = AssertUnwindSafe(async move {
            match definition.factory() {
                ModuleFactory::Direct => Ok(definition),
                ModuleFactory::ForRoot(factory) | ModuleFactory::Register(factory) => {
                    factory().await
                }
            }
        });

        match attempt.catch_unwind().await {
            Ok(result) => result,
            Err(panic) => Err(ModuleError::FactoryFailed(panic_message(panic.as_ref()))),
        }
    }

    /// Load modules one after another, in order
    ///
    /// A module's factory runs only after all earlier modules have settled.
    pub async fn load_serial(
        registry: &ModuleRegistry,
        order: &[ModuleDescriptor],
    ) -> Vec<ModuleLoadResult> {
        let mut results = Vec::with_capacity(order.len());
        for descriptor in order {
            results.push(Self::load(registry, &descriptor.name).await);
        }
        results
    }

    /// Dispatch every load concurrently and wait for all to settle
    ///
    /// Results keep the order of `order`.
    pub async fn load_parallel(
        registry: &ModuleRegistry,
        order: &[ModuleDescriptor],
    ) -> Vec<ModuleLoadResult> {
        join_all(
            order
                .iter()
                .map(|descriptor| Self::load(registry, &descriptor.name)),
        )
        .await
    }
}
