//! Module system traits and interfaces
//!
//! Defines the declarative registration surface module authors implement and
//! the per-module outcome records the loader hands back to its caller.

use futures::future::{BoxFuture, FutureExt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Shared handle to a module definition or to the instance a factory produced
pub type ModuleHandle = Arc<dyn ModuleDefinition>;

/// Future returned by a module factory
pub type FactoryFuture = BoxFuture<'static, Result<ModuleHandle, ModuleError>>;

/// Parameterless module factory
pub type FactoryFn = Arc<dyn Fn() -> FactoryFuture + Send + Sync>;

/// Declarative metadata attached to a module definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleDescriptor {
    /// Module name (unique identifier, registry key)
    pub name: String,
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Disabled modules are registered and ordered but never instantiated
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Names of modules that must be visited before this one
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Load priority, lower loads earlier
    #[serde(default)]
    pub weight: i32,
}

fn default_true() -> bool {
    true
}

impl ModuleDescriptor {
    /// Create an enabled descriptor with no dependencies and weight 0
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            enabled: true,
            dependencies: Vec::new(),
            weight: 0,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_weight(mut self, weight: i32) -> Self {
        self.weight = weight;
        self
    }

    /// Append a dependency on another module
    pub fn depends_on(mut self, dependency: impl Into<String>) -> Self {
        self.dependencies.push(dependency.into());
        self
    }

    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// How a definition turns into the handle recorded for a loaded module
///
/// `ForRoot` is preferred over `Register`; `Direct` uses the definition as-is.
#[derive(Clone)]
pub enum ModuleFactory {
    /// Use the definition itself as the loaded handle
    Direct,
    /// Root registration factory
    ForRoot(FactoryFn),
    /// Generic registration factory
    Register(FactoryFn),
}

impl ModuleFactory {
    /// Build a root registration factory from an async closure
    pub fn for_root<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ModuleHandle, ModuleError>> + Send + 'static,
    {
        ModuleFactory::ForRoot(Arc::new(move || factory().boxed()))
    }

    /// Build a generic registration factory from an async closure
    pub fn register<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<ModuleHandle, ModuleError>> + Send + 'static,
    {
        ModuleFactory::Register(Arc::new(move || factory().boxed()))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ModuleFactory::Direct => "direct",
            ModuleFactory::ForRoot(_) => "for_root",
            ModuleFactory::Register(_) => "register",
        }
    }
}

impl fmt::Debug for ModuleFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ModuleFactory").field(&self.kind()).finish()
    }
}

/// Module definition trait that all discoverable modules implement
///
/// The descriptor is co-located with the definition instead of being attached
/// by annotation, so discovery never needs runtime reflection.
pub trait ModuleDefinition: Send + Sync + fmt::Debug {
    /// Registration metadata, `None` if this definition does not participate in discovery
    fn descriptor(&self) -> Option<ModuleDescriptor>;

    /// Factory used when the module is loaded
    fn factory(&self) -> ModuleFactory {
        ModuleFactory::Direct
    }
}

/// Outcome of attempting to load one descriptor
#[derive(Debug, Clone)]
pub struct ModuleLoadResult {
    /// Module name
    pub name: String,
    /// Instantiated handle, or the raw definition for a disabled module
    pub module: Option<ModuleHandle>,
    /// True only if the module was enabled and instantiated
    pub loaded: bool,
    /// Failure or not-found explanation
    pub error: Option<String>,
}

impl ModuleLoadResult {
    pub fn loaded(name: impl Into<String>, module: ModuleHandle) -> Self {
        Self {
            name: name.into(),
            module: Some(module),
            loaded: true,
            error: None,
        }
    }

    /// Disabled module: the definition is surfaced, nothing was instantiated
    pub fn disabled(name: impl Into<String>, definition: ModuleHandle) -> Self {
        Self {
            name: name.into(),
            module: Some(definition),
            loaded: false,
            error: None,
        }
    }

    /// Registered only (auto-load off)
    pub fn registered(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: None,
            loaded: false,
            error: None,
        }
    }

    pub fn failed(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            module: None,
            loaded: false,
            error: Some(error.into()),
        }
    }

    /// Serializable view for reports
    pub fn summary(&self) -> LoadSummary {
        LoadSummary {
            name: self.name.clone(),
            loaded: self.loaded,
            has_module: self.module.is_some(),
            error: self.error.clone(),
        }
    }
}

/// Serializable summary of a [`ModuleLoadResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadSummary {
    pub name: String,
    pub loaded: bool,
    pub has_module: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Module system errors
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error("Circular dependency detected for module {0}")]
    CircularDependency(String),

    #[error("Module dependency missing: {0}")]
    DependencyMissing(String),

    #[error("Duplicate module name: {0}")]
    DuplicateModule(String),

    #[error("Module {0} not found in registry")]
    ModuleNotFound(String),

    #[error("Failed to load resource {path:?}: {reason}")]
    ResourceLoad { path: PathBuf, reason: String },

    #[error("Invalid module descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Invalid module manifest: {0}")]
    InvalidManifest(String),

    #[error("Invalid pattern {pattern:?}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Module factory failed: {0}")]
    FactoryFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ModuleError {
    /// Whether this error aborts a whole scan instead of a single module
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            ModuleError::CircularDependency(_)
                | ModuleError::DependencyMissing(_)
                | ModuleError::DuplicateModule(_)
                | ModuleError::InvalidPattern { .. }
        )
    }
}

impl From<toml::de::Error> for ModuleError {
    fn from(e: toml::de::Error) -> Self {
        ModuleError::InvalidManifest(e.to_string())
    }
}
