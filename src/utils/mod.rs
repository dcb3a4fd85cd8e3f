//! Utility modules shared by the loader and its tools

pub mod env;
pub mod error;
pub mod logging;

// Re-export commonly used items
pub use env::{env_bool_opt, env_opt, parse_bool};
pub use error::{panic_message, result_to_option, with_default};
#[cfg(feature = "json-logging")]
pub use logging::init_json_logging;
pub use logging::{init_logging, init_logging_from_config};
