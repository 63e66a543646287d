//! Structured logging for the slashwire router.
//!
//! Console output plus an optional rolling NDJSON file, with `RUST_LOG`
//! taking precedence over the configured level.

pub mod logger;

pub use logger::{init_logger, LOG_FILE_PREFIX};
