//! Module manifest parsing
//!
//! Handles `*.module.toml` manifests: a file-backed way to declare a module
//! descriptor together with how the module is instantiated.
//!
//! ```toml
//! name = "wallet"
//! description = "Wallet RPC surface"
//! weight = 10
//! dependencies = ["storage"]
//! export = "WalletModule"   # optional, named export instead of the default
//! factory = "for_root"      # direct | for_root | register
//!
//! [config]
//! network = "regtest"
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::module::registry::resource::{Export, LoadedResource, ResourceLoader};
use crate::module::traits::{
    ModuleDefinition, ModuleDescriptor, ModuleError, ModuleFactory, ModuleHandle,
};

/// Factory selection in a manifest
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactoryKind {
    #[default]
    Direct,
    ForRoot,
    Register,
}

/// Module manifest (`*.module.toml` structure)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleManifest {
    /// Declared descriptor fields
    #[serde(flatten)]
    pub descriptor: ModuleDescriptor,
    /// Export name; `None` exports the module as the default export
    #[serde(default)]
    pub export: Option<String>,
    /// How the module is instantiated
    #[serde(default)]
    pub factory: FactoryKind,
    /// Configuration handed to the instantiated module
    #[serde(default)]
    pub config: toml::Table,
}

impl ModuleManifest {
    /// Parse a manifest from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self, ModuleError> {
        let manifest: ModuleManifest = toml::from_str(contents)?;

        if manifest.descriptor.name.is_empty() {
            return Err(ModuleError::InvalidManifest(
                "Module name cannot be empty".to_string(),
            ));
        }

        Ok(manifest)
    }

    /// Load manifest from file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ModuleError> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    /// Flattened `key -> string` view of the `[config]` table
    pub fn flat_config(&self) -> HashMap<String, String> {
        let mut result = HashMap::new();
        for (key, value) in &self.config {
            flatten_toml_value(key.clone(), value, &mut result);
        }
        result
    }
}

/// Flatten TOML value to string hashmap, nested tables become dot-notation keys
fn flatten_toml_value(prefix: String, value: &toml::Value, result: &mut HashMap<String, String>) {
    use toml::Value;

    match value {
        Value::String(s) => {
            result.insert(prefix, s.clone());
        }
        Value::Integer(i) => {
            result.insert(prefix, i.to_string());
        }
        Value::Float(f) => {
            result.insert(prefix, f.to_string());
        }
        Value::Boolean(b) => {
            result.insert(prefix, b.to_string());
        }
        Value::Array(arr) => {
            let values: Vec<String> = arr
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    _ => v.to_string(),
                })
                .collect();
            result.insert(prefix, values.join(","));
        }
        Value::Table(table) => {
            for (key, val) in table {
                flatten_toml_value(format!("{}.{}", prefix, key), val, result);
            }
        }
        Value::Datetime(dt) => {
            result.insert(prefix, dt.to_string());
        }
    }
}

/// Module definition declared by a manifest file
#[derive(Debug, Clone)]
pub struct ManifestModule {
    pub manifest: ModuleManifest,
    pub source: PathBuf,
}

impl ModuleDefinition for ManifestModule {
    fn descriptor(&self) -> Option<ModuleDescriptor> {
        Some(self.manifest.descriptor.clone())
    }

    fn factory(&self) -> ModuleFactory {
        let make = {
            let manifest = self.manifest.clone();
            move || {
                let configured: ModuleHandle = Arc::new(ConfiguredModule {
                    name: manifest.descriptor.name.clone(),
                    descriptor: manifest.descriptor.clone(),
                    config: manifest.flat_config(),
                });
                async move { Ok(configured) }
            }
        };

        match self.manifest.factory {
            FactoryKind::Direct => ModuleFactory::Direct,
            FactoryKind::ForRoot => ModuleFactory::for_root(make),
            FactoryKind::Register => ModuleFactory::register(make),
        }
    }
}

/// Instance produced by a manifest module's factory
#[derive(Debug, Clone)]
pub struct ConfiguredModule {
    pub name: String,
    pub descriptor: ModuleDescriptor,
    pub config: HashMap<String, String>,
}

impl ConfiguredModule {
    pub fn get_config(&self, key: &str) -> Option<&String> {
        self.config.get(key)
    }
}

impl ModuleDefinition for ConfiguredModule {
    fn descriptor(&self) -> Option<ModuleDescriptor> {
        Some(self.descriptor.clone())
    }
}

/// Resource loader for `*.module.toml` manifests
#[derive(Debug, Clone, Default)]
pub struct ManifestResourceLoader;

impl ManifestResourceLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ResourceLoader for ManifestResourceLoader {
    async fn load(&self, path: &Path) -> Result<LoadedResource, ModuleError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ModuleError::ResourceLoad {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                })?;

        let manifest =
            ModuleManifest::from_toml_str(&contents).map_err(|e| ModuleError::ResourceLoad {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let export = manifest.export.clone();
        let definition: ModuleHandle = Arc::new(ManifestModule {
            manifest,
            source: path.to_path_buf(),
        });

        Ok(match export {
            Some(name) => LoadedResource::empty().export(name, Export::Definition(definition)),
            None => LoadedResource::with_default(definition),
        })
    }
}
