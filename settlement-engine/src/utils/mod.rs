//! Utility module
//!
//! - [`logger`] - tracing subscriber setup

pub mod logger;

pub use logger::{init_logger, init_logger_from_config, init_logger_with_file};
