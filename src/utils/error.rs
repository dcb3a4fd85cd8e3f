//! Error handling utilities for graceful degradation
//!
//! Helpers for the log-and-continue pattern the loader uses for every
//! per-module failure.

use std::any::Any;
use tracing::{debug, warn};

/// Execute an operation and return a default value on error
///
/// Logs at debug level; use where failure is expected.
///
/// # Example
/// ```rust
/// use bllvm_module_loader::utils::with_default;
///
/// let weight = with_default(|| "heavy".parse::<i32>(), 0, "Failed to parse weight");
/// assert_eq!(weight, 0);
/// ```
pub fn with_default<F, T, E>(operation: F, default: T, context: &str) -> T
where
    F: FnOnce() -> Result<T, E>,
    E: std::fmt::Display,
{
    match operation() {
        Ok(value) => value,
        Err(e) => {
            debug!("{}: {}, using default", context, e);
            default
        }
    }
}

/// Convert a Result to an Option, logging the error
pub fn result_to_option<T, E>(result: Result<T, E>, context: &str) -> Option<T>
where
    E: std::fmt::Display,
{
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{}: {}", context, e);
            None
        }
    }
}

/// Extract a readable message from a caught panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic with non-string payload".to_string()
    }
}
