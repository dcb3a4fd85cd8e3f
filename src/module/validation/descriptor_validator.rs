//! Descriptor validation framework
//!
//! Validates module descriptors for naming and dependency well-formedness.
//! Permissive loaders only log findings; strict loaders reject the module.

use std::collections::HashSet;
use tracing::{debug, warn};

use crate::module::traits::{ModuleDescriptor, ModuleError};

/// Validation result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// Descriptor is valid
    Valid,
    /// Descriptor is invalid with specific errors
    Invalid(Vec<String>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    /// Convert findings for module `name` into an `InvalidDescriptor` error
    pub fn into_result(self, name: &str) -> Result<(), ModuleError> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(errors) => Err(ModuleError::InvalidDescriptor(format!(
                "{}: {}",
                name,
                errors.join("; ")
            ))),
        }
    }
}

/// Descriptor validator
#[derive(Debug, Clone)]
pub struct DescriptorValidator {
    /// Maximum module name length
    max_name_len: usize,
}

impl DescriptorValidator {
    /// Create a new descriptor validator
    pub fn new() -> Self {
        Self { max_name_len: 128 }
    }

    /// Validate a module descriptor
    pub fn validate(&self, descriptor: &ModuleDescriptor) -> ValidationResult {
        let mut errors = Vec::new();

        if descriptor.name.is_empty() {
            errors.push("Module name cannot be empty".to_string());
        } else if !self.is_valid_name(&descriptor.name) {
            errors.push(format!(
                "Invalid module name: {} (must be alphanumeric with dashes/underscores/dots)",
                descriptor.name
            ));
        }

        if let Err(dep_errors) = self.validate_dependencies(descriptor) {
            errors.extend(dep_errors);
        }

        if errors.is_empty() {
            debug!("Descriptor validation passed for module: {}", descriptor.name);
            ValidationResult::Valid
        } else {
            warn!(
                "Descriptor validation failed for module {}: {:?}",
                descriptor.name, errors
            );
            ValidationResult::Invalid(errors)
        }
    }

    /// Validate module name format
    #[inline]
    fn is_valid_name(&self, name: &str) -> bool {
        if name.is_empty() || name.len() > self.max_name_len {
            return false;
        }

        // Must start with alphanumeric
        if !name.chars().next().map_or(false, |c| c.is_alphanumeric()) {
            return false;
        }

        name.chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    }

    /// Validate the dependency list
    fn validate_dependencies(&self, descriptor: &ModuleDescriptor) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();
        let mut seen = HashSet::new();

        for dep in &descriptor.dependencies {
            if !self.is_valid_name(dep) {
                errors.push(format!("Invalid dependency name: {:?}", dep));
            }
            if *dep == descriptor.name {
                errors.push(format!("Module {} depends on itself", descriptor.name));
            }
            if !seen.insert(dep.as_str()) {
                errors.push(format!("Duplicate dependency: {}", dep));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

impl Default for DescriptorValidator {
    fn default() -> Self {
        Self::new()
    }
}
