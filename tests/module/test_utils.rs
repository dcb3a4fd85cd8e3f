//! Test utilities for module system testing
//!
//! Provides a temp-dir fixture backed by a [`StaticCatalog`] and scripted modules
//! that count factory invocations.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

use bllvm_module_loader::module::registry::{LoadedResource, StaticCatalog};
use bllvm_module_loader::{
    LoaderOptions, ModuleDefinition, ModuleDescriptor, ModuleError, ModuleFactory, ModuleHandle,
    ModuleLoadResult, ModuleManager,
};

/// How a [`ScriptedModule`] behaves when loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// No factory, the definition is the handle
    Direct,
    /// Root factory producing an [`Instance`]
    ForRoot,
    /// Generic factory producing an [`Instance`]
    Register,
    /// Root factory returning an error
    Fails,
    /// Root factory that panics
    Panics,
    /// Panics while the loader asks for the factory
    LookupPanics,
}

/// Shared record of factory invocations
#[derive(Debug, Clone, Default)]
pub struct FactoryLog {
    calls: Arc<AtomicUsize>,
    order: Arc<Mutex<Vec<String>>>,
}

impl FactoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Module names in the order their factories were invoked
    pub fn order(&self) -> Vec<String> {
        self.order.lock().unwrap().clone()
    }

    fn record(&self, name: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.order.lock().unwrap().push(name.to_string());
    }
}

/// Module definition with a configurable factory
#[derive(Debug)]
pub struct ScriptedModule {
    pub descriptor: ModuleDescriptor,
    pub behavior: Behavior,
    pub log: FactoryLog,
}

impl ModuleDefinition for ScriptedModule {
    fn descriptor(&self) -> Option<ModuleDescriptor> {
        Some(self.descriptor.clone())
    }

    fn factory(&self) -> ModuleFactory {
        let name = self.descriptor.name.clone();
        let behavior = self.behavior;
        let log = self.log.clone();
        let make = move || {
            log.record(&name);
            let name = name.clone();
            async move {
                match behavior {
                    Behavior::Fails => Err(ModuleError::FactoryFailed(format!(
                        "{} could not connect",
                        name
                    ))),
                    Behavior::Panics => panic!("{} exploded", name),
                    _ => Ok(Arc::new(Instance { name }) as ModuleHandle),
                }
            }
        };

        match self.behavior {
            Behavior::LookupPanics => panic!("{} has no usable factory", self.descriptor.name),
            Behavior::Direct => ModuleFactory::Direct,
            Behavior::Register => ModuleFactory::register(make),
            _ => ModuleFactory::for_root(make),
        }
    }
}

/// What a scripted factory produces
#[derive(Debug)]
pub struct Instance {
    pub name: String,
}

pub const INSTANCE_MARKER: &str = "instance";

impl ModuleDefinition for Instance {
    fn descriptor(&self) -> Option<ModuleDescriptor> {
        Some(ModuleDescriptor::new(self.name.clone()).with_description(INSTANCE_MARKER))
    }
}

/// Definition without a descriptor (a utility export)
#[derive(Debug)]
pub struct Helper;

impl ModuleDefinition for Helper {
    fn descriptor(&self) -> Option<ModuleDescriptor> {
        None
    }
}

/// Test fixture for module system tests
pub struct ModuleTestFixture {
    /// Temporary directory for test data
    pub temp_dir: TempDir,
    /// Modules directory path
    pub modules_dir: PathBuf,
    /// Shared factory log for every scripted module added through the fixture
    pub log: FactoryLog,
    catalog: StaticCatalog,
}

impl ModuleTestFixture {
    /// Create a new test fixture with an empty modules directory
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let temp_dir = TempDir::new()?;
        let modules_dir = temp_dir.path().join("modules");
        std::fs::create_dir_all(&modules_dir)?;

        Ok(Self {
            temp_dir,
            modules_dir,
            log: FactoryLog::new(),
            catalog: StaticCatalog::new(),
        })
    }

    /// Create an empty file at `relative` under the modules directory
    pub fn touch(&self, relative: &str) -> PathBuf {
        self.write(relative, "")
    }

    /// Write `contents` to `relative` under the modules directory
    pub fn write(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.modules_dir.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Create `relative` and register a resource for it
    pub fn add_resource(&mut self, relative: &str, resource: LoadedResource) -> PathBuf {
        let path = self.touch(relative);
        let catalog = std::mem::take(&mut self.catalog);
        self.catalog = catalog.with_resource(path.to_string_lossy().into_owned(), resource);
        path
    }

    /// Create `relative` exporting a scripted module as its default export
    pub fn add_module(
        &mut self,
        relative: &str,
        descriptor: ModuleDescriptor,
        behavior: Behavior,
    ) -> PathBuf {
        let scripted = ScriptedModule {
            descriptor,
            behavior,
            log: self.log.clone(),
        };
        self.add_resource(relative, LoadedResource::with_default(Arc::new(scripted)))
    }

    pub fn catalog(&self) -> StaticCatalog {
        self.catalog.clone()
    }

    pub fn manager(&self) -> ModuleManager {
        ModuleManager::new(Arc::new(self.catalog()))
    }

    /// Loader options rooted at the modules directory
    pub fn options(&self) -> LoaderOptions {
        LoaderOptions::new(&self.modules_dir)
    }

    /// Paths relative to the modules directory, `/`-separated
    pub fn relative(&self, paths: &[PathBuf]) -> Vec<String> {
        paths
            .iter()
            .map(|p| relative_to(&self.modules_dir, p))
            .collect()
    }
}

fn relative_to(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Names of results in order
pub fn result_names(results: &[ModuleLoadResult]) -> Vec<&str> {
    results.iter().map(|r| r.name.as_str()).collect()
}

/// Find the result for `name`
pub fn result_for<'a>(results: &'a [ModuleLoadResult], name: &str) -> &'a ModuleLoadResult {
    results
        .iter()
        .find(|r| r.name == name)
        .unwrap_or_else(|| panic!("no result for {}", name))
}

/// Name of the instance a scripted factory produced, `None` for raw definitions
pub fn instance_name(result: &ModuleLoadResult) -> Option<String> {
    let descriptor = result.module.as_ref()?.descriptor()?;
    (descriptor.description.as_deref() == Some(INSTANCE_MARKER)).then_some(descriptor.name)
}
