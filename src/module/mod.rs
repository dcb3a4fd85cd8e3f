//! Module system for discovering and loading pluggable modules
//!
//! Modules are discovered on disk, their declared descriptors collected into a
//! registry, ordered by weight and dependencies, then instantiated serially or
//! concurrently.
//!
//! ## Architecture
//!
//! - **Discovery**: glob-filtered directory walk (`registry::discovery`)
//! - **Extraction**: pluggable resource loading and module identification
//! - **Ordering**: weight pre-sort plus depth-first dependency resolution
//! - **Loading**: factory probing with per-module failure isolation
//! - **Orchestration**: `ModuleManager` ties the stages together

pub mod composition;
pub mod loader;
pub mod manager;
pub mod registry;
pub mod traits;
pub mod validation;

pub use composition::ModuleComposition;
pub use loader::ModuleLoader;
pub use manager::ModuleManager;
pub use registry::{
    LoadedResource, ManifestResourceLoader, ModuleDependencies, ModuleDiscovery,
    ModuleIdentifier, ModuleRegistry, ResourceLoader, StaticCatalog, SuffixIdentifier,
};
pub use traits::{
    LoadSummary, ModuleDefinition, ModuleDescriptor, ModuleError, ModuleFactory, ModuleHandle,
    ModuleLoadResult,
};
pub use validation::{DescriptorValidator, ValidationResult};
