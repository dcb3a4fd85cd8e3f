//! Module loading system
//!
//! Handles factory probing and serial or concurrent instantiation of
//! registered modules.

pub mod loader;

pub use loader::ModuleLoader;
