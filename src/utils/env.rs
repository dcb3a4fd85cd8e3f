//! Environment variable utilities
//!
//! Provides helpers for reading loader overrides from the environment.

/// Get environment variable as Option
///
/// Returns `Some(value)` if set and non-empty, `None` otherwise.
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Parse a boolean flag value
///
/// Accepts "true"/"1"/"yes"/"on" and "false"/"0"/"no"/"off" (case-insensitive).
pub fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Get environment variable as an optional boolean
///
/// Returns `None` if unset or unrecognised, so callers keep their own default.
pub fn env_bool_opt(key: &str) -> Option<bool> {
    std::env::var(key).ok().as_deref().and_then(parse_bool)
}
