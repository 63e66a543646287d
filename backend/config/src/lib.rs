//! `slashwire-config` — router runtime configuration.
//!
//! Provides:
//! - Typed config schema (logging, replies, autocomplete)
//! - YAML loading with a first-run default
//! - Default value application
//! - Schema validation

pub mod defaults;
pub mod io;
pub mod schema;
pub mod validation;

// Re-export most-used types at crate root.
pub use schema::{AutocompleteConfig, LoggingConfig, RepliesConfig, SlashwireConfig};
pub use io::{config_dir, config_file_path, load_config};
pub use defaults::apply_all_defaults;
pub use validation::{validate, ValidationReport, ConfigValidationError};

use anyhow::Result;
use std::path::Path;

/// Load, apply defaults to, and validate a config file.
///
/// This is the main entry point for loading a config at runtime. Warnings are
/// logged; the first validation error is returned.
pub async fn load_and_prepare(path: &Path) -> Result<SlashwireConfig> {
    let config = apply_all_defaults(load_config(path).await?);
    check(config)
}

/// Validate an already defaulted config, logging every finding.
///
/// Callers that need the config before a subscriber exists (to set up
/// logging from it) load with [`load_config`] and [`apply_all_defaults`],
/// then call this once logging is up.
pub fn check(config: SlashwireConfig) -> Result<SlashwireConfig> {
    let report = validate(&config);
    for warning in &report.warnings {
        tracing::warn!(path = %warning.path, message = %warning.message, "Config warning");
    }
    for error in &report.errors {
        tracing::error!(path = %error.path, message = %error.message, "Config error");
    }
    if let Some(first) = report.errors.into_iter().next() {
        return Err(first.into());
    }

    Ok(config)
}
