//! Module Loader - dynamic discovery and loading of pluggable modules
//!
//! Scans a directory tree for module resources, extracts the descriptor each
//! module declares, orders modules by weight and dependencies, and
//! instantiates them with per-module failure isolation.
//!
//! ## Pipeline
//!
//! 1. Discovery (glob include/exclude over relative paths)
//! 2. Extraction (resource loader + module identifier -> registry)
//! 3. Ordering (stable weight sort, depth-first topological order)
//! 4. Loading (root or generic factory, serial or concurrent)
//!
//! ## Design Principles
//!
//! 1. **Loud log, quiet return**: only a dependency cycle aborts a run
//! 2. **No reflection**: descriptors are co-located with their definitions
//! 3. **Host-pluggable**: resource loading and module naming are traits
//!
//! ```rust,no_run
//! use bllvm_module_loader::{LoaderOptions, ModuleManager};
//!
//! # async fn run() -> Result<(), bllvm_module_loader::ModuleError> {
//! let mut manager = ModuleManager::with_manifests();
//! let results = manager.scan_and_load(&LoaderOptions::new("modules")).await?;
//! for result in results.iter().filter(|r| !r.loaded) {
//!     eprintln!("{}: {:?}", result.name, result.error);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod module;
pub mod utils;

// Re-export config module
pub use config::*;

pub use module::{
    LoadSummary, ModuleComposition, ModuleDefinition, ModuleDescriptor, ModuleError,
    ModuleFactory, ModuleHandle, ModuleLoadResult, ModuleManager,
};
