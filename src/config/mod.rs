//! Configuration management for the module loader
//!
//! Handles loader options, logging configuration, file loading and
//! environment overrides.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::utils::env::{env_bool_opt, env_opt};
use crate::utils::error::with_default;

/// Path-level veto applied before a resource is loaded
pub type ModuleFilter = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// Environment variable overriding `base_path`
pub const ENV_BASE_PATH: &str = "MODULE_LOADER_BASE_PATH";
/// Environment variable overriding `recursive`
pub const ENV_RECURSIVE: &str = "MODULE_LOADER_RECURSIVE";
/// Environment variable overriding `auto_load`
pub const ENV_AUTO_LOAD: &str = "MODULE_LOADER_AUTO_LOAD";
/// Environment variable overriding `parallel`
pub const ENV_PARALLEL: &str = "MODULE_LOADER_PARALLEL";
/// Environment variable overriding `strict`
pub const ENV_STRICT: &str = "MODULE_LOADER_STRICT";

/// Discovery and loading options
#[derive(Clone, Serialize, Deserialize)]
pub struct LoaderOptions {
    /// Base directory to search for modules
    #[serde(default = "default_base_path")]
    pub base_path: PathBuf,

    /// Glob patterns a file must match (any) to be a candidate
    #[serde(default = "default_include")]
    pub include: Vec<String>,

    /// Glob patterns that reject a candidate (any)
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Recurse into subdirectories
    #[serde(default = "default_true")]
    pub recursive: bool,

    /// Instantiate discovered modules; when false only the registry is built
    #[serde(default = "default_true")]
    pub auto_load: bool,

    /// Run factory invocations concurrently
    #[serde(default = "default_true")]
    pub parallel: bool,

    /// Reject duplicate names, missing dependencies and invalid descriptors
    #[serde(default)]
    pub strict: bool,

    /// Custom module filter, applied to absolute candidate paths
    #[serde(skip)]
    pub module_filter: Option<ModuleFilter>,
}

fn default_true() -> bool {
    true
}

fn default_base_path() -> PathBuf {
    with_default(
        std::env::current_dir,
        PathBuf::from("."),
        "Failed to resolve current directory",
    )
    .join("src")
    .join("modules")
}

fn default_include() -> Vec<String> {
    vec!["**/*.module.{ts,js,toml}".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec![
        "**/*.spec.{ts,js,toml}".to_string(),
        "**/*.test.{ts,js,toml}".to_string(),
        "**/node_modules/**".to_string(),
        "**/target/**".to_string(),
    ]
}

impl Default for LoaderOptions {
    fn default() -> Self {
        Self {
            base_path: default_base_path(),
            include: default_include(),
            exclude: default_exclude(),
            recursive: true,
            auto_load: true,
            parallel: true,
            strict: false,
            module_filter: None,
        }
    }
}

impl fmt::Debug for LoaderOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoaderOptions")
            .field("base_path", &self.base_path)
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .field("recursive", &self.recursive)
            .field("auto_load", &self.auto_load)
            .field("parallel", &self.parallel)
            .field("strict", &self.strict)
            .field("module_filter", &self.module_filter.is_some())
            .finish()
    }
}

impl LoaderOptions {
    /// Options rooted at `base_path`, defaults elsewhere
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            ..Self::default()
        }
    }

    pub fn with_include<S: Into<String>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        self.include = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_exclude<S: Into<String>>(mut self, patterns: impl IntoIterator<Item = S>) -> Self {
        self.exclude = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn auto_load(mut self, auto_load: bool) -> Self {
        self.auto_load = auto_load;
        self
    }

    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Install a path-level veto
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        self.module_filter = Some(Arc::new(filter));
        self
    }

    /// Override fields from `MODULE_LOADER_*` environment variables
    pub fn apply_env_overrides(&mut self) {
        if let Some(base_path) = env_opt(ENV_BASE_PATH) {
            debug!("{} overrides base path: {}", ENV_BASE_PATH, base_path);
            self.base_path = PathBuf::from(base_path);
        }
        if let Some(v) = env_bool_opt(ENV_RECURSIVE) {
            self.recursive = v;
        }
        if let Some(v) = env_bool_opt(ENV_AUTO_LOAD) {
            self.auto_load = v;
        }
        if let Some(v) = env_bool_opt(ENV_PARALLEL) {
            self.parallel = v;
        }
        if let Some(v) = env_bool_opt(ENV_STRICT) {
            self.strict = v;
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log filter (e.g. "info", "bllvm_module_loader=debug"); RUST_LOG takes precedence
    #[serde(default)]
    pub filter: Option<String>,

    /// Emit JSON lines (requires the `json-logging` feature)
    #[serde(default)]
    pub json_format: bool,
}

/// Top-level loader configuration file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Discovery and loading options
    #[serde(default)]
    pub loader: LoaderOptions,

    /// Logging configuration
    #[serde(default)]
    pub logging: Option<LoggingConfig>,

    /// Whether the composed module set is exposed globally to the host
    #[serde(default)]
    pub is_global: bool,
}

impl LoaderConfig {
    /// Load configuration from a TOML file
    pub fn from_toml_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LoaderConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a JSON file
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LoaderConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration, picking the format from the file extension
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json_file(path),
            _ => Self::from_toml_file(path),
        }
    }

    /// Save configuration to a JSON file
    pub fn to_json_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
