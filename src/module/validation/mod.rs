//! Module validation framework
//!
//! Validates declared module descriptors before they enter the registry.

pub mod descriptor_validator;

pub use descriptor_validator::{DescriptorValidator, ValidationResult};
