//! Module registry and discovery
//!
//! Handles pattern matching, directory scanning, resource loading, metadata
//! extraction and dependency ordering.

pub mod dependencies;
pub mod discovery;
pub mod extractor;
pub mod manifest;
pub mod pattern;
pub mod resource;

pub use dependencies::{DependencyResolution, MissingDependency, ModuleDependencies};
pub use discovery::{scan, ModuleDiscovery};
pub use extractor::{MetadataExtractor, ModuleRegistry, RegisteredModule};
pub use manifest::{ConfiguredModule, FactoryKind, ManifestModule, ManifestResourceLoader, ModuleManifest};
pub use pattern::{matches, translate, GlobPattern, PatternSet};
pub use resource::{
    Export, LoadedResource, ModuleIdentifier, ResourceFn, ResourceLoader, StaticCatalog,
    SuffixIdentifier,
};
