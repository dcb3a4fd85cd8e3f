//! Module dependency resolution
//!
//! Produces the load order: descriptors are stable-sorted by weight, then
//! visited depth-first so every dependency precedes its dependents. Weight only
//! decides visitation priority where no dependency edge applies.

use std::collections::{HashMap, HashSet};
use tracing::debug;

use crate::module::traits::{ModuleDescriptor, ModuleError};

/// A dependency edge pointing at a module that is not present
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingDependency {
    /// Module declaring the dependency
    pub module: String,
    /// Name that could not be resolved
    pub dependency: String,
}

/// Dependency resolution result
#[derive(Debug, Clone)]
pub struct DependencyResolution {
    /// Modules in load order (dependencies first)
    pub load_order: Vec<ModuleDescriptor>,
    /// Edges that were skipped because the target is unknown
    pub missing: Vec<MissingDependency>,
}

impl DependencyResolution {
    pub fn names(&self) -> Vec<&str> {
        self.load_order.iter().map(|d| d.name.as_str()).collect()
    }
}

/// Dependency resolver
pub struct ModuleDependencies;

impl ModuleDependencies {
    /// Order descriptors for loading
    ///
    /// Fails with [`ModuleError::CircularDependency`] naming the module whose
    /// re-entry closed the cycle. Unknown dependency names are ignored.
    pub fn order(descriptors: &[ModuleDescriptor]) -> Result<Vec<ModuleDescriptor>, ModuleError> {
        Ok(Self::resolve(descriptors)?.load_order)
    }

    /// Like [`order`](Self::order), but unknown dependency names are an error
    pub fn order_strict(
        descriptors: &[ModuleDescriptor],
    ) -> Result<Vec<ModuleDescriptor>, ModuleError> {
        let resolution = Self::resolve(descriptors)?;
        if !resolution.missing.is_empty() {
            let missing: Vec<String> = resolution
                .missing
                .iter()
                .map(|m| format!("{} -> {}", m.module, m.dependency))
                .collect();
            return Err(ModuleError::DependencyMissing(missing.join(", ")));
        }
        Ok(resolution.load_order)
    }

    /// Resolve module dependencies and determine load order
    ///
    /// Duplicate names collapse to the descriptor that comes last in weight order.
    pub fn resolve(descriptors: &[ModuleDescriptor]) -> Result<DependencyResolution, ModuleError> {
        let mut sorted: Vec<&ModuleDescriptor> = descriptors.iter().collect();
        // stable: equal weights keep extraction order
        sorted.sort_by_key(|d| d.weight);

        // last in sorted order wins
        let mut by_name: HashMap<&str, &ModuleDescriptor> = HashMap::new();
        for &descriptor in &sorted {
            by_name.insert(descriptor.name.as_str(), descriptor);
        }

        let mut visiting: HashSet<&str> = HashSet::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut load_order = Vec::with_capacity(by_name.len());
        let mut missing = Vec::new();

        for descriptor in &sorted {
            let name = descriptor.name.as_str();
            if visited.contains(name) {
                continue;
            }

            let root = by_name[name];
            visiting.insert(name);
            // (module, index of the next dependency to visit)
            let mut stack: Vec<(&ModuleDescriptor, usize)> = vec![(root, 0)];

            while let Some(&(current, next)) = stack.last() {
                let Some(dependency) = current.dependencies.get(next) else {
                    stack.pop();
                    visiting.remove(current.name.as_str());
                    visited.insert(current.name.as_str());
                    load_order.push(current.clone());
                    continue;
                };

                if let Some(frame) = stack.last_mut() {
                    frame.1 += 1;
                }

                let Some(&target) = by_name.get(dependency.as_str()) else {
                    debug!(
                        "Module {} depends on unknown module {}, ignoring",
                        current.name, dependency
                    );
                    missing.push(MissingDependency {
                        module: current.name.clone(),
                        dependency: dependency.clone(),
                    });
                    continue;
                };

                if visiting.contains(target.name.as_str()) {
                    return Err(ModuleError::CircularDependency(target.name.clone()));
                }
                if visited.contains(target.name.as_str()) {
                    continue;
                }

                visiting.insert(target.name.as_str());
                stack.push((target, 0));
            }
        }

        debug!(
            "Dependency resolution complete: {:?}",
            load_order.iter().map(|d| d.name.as_str()).collect::<Vec<_>>()
        );

        Ok(DependencyResolution {
            load_order,
            missing,
        })
    }
}
