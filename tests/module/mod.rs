//! Module system tests
//!
//! Tests for discovery, dependency ordering, loading and manifests.

pub mod test_utils;
pub mod discovery_tests;
pub mod ordering_tests;
