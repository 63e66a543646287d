//! Config validation: schema checks with user-friendly error messages.

use crate::defaults::MAX_AUTOCOMPLETE_CHOICES;
use crate::schema::SlashwireConfig;
use thiserror::Error;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A config validation error with field path and message.
#[derive(Debug, Error)]
#[error("Config validation error at '{path}': {message}")]
pub struct ConfigValidationError {
    pub path: String,
    pub message: String,
}

/// A collection of validation errors found in one pass.
#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }

    fn warn(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            path: path.into(),
            message: message.into(),
        });
    }
}

/// Validate the config and return a report of all errors and warnings.
pub fn validate(config: &SlashwireConfig) -> ValidationReport {
    let mut report = ValidationReport::default();
    validate_logging(config, &mut report);
    validate_replies(config, &mut report);
    validate_autocomplete(config, &mut report);
    report
}

fn validate_logging(config: &SlashwireConfig, report: &mut ValidationReport) {
    let Some(logging) = &config.logging else { return };
    if let Some(level) = &logging.level {
        if !LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            report.error(
                "logging.level",
                format!("Unknown log level '{level}'; expected one of {}", LOG_LEVELS.join(", ")),
            );
        }
    }
    if let Some(dir) = &logging.dir {
        if dir.trim().is_empty() {
            report.warn("logging.dir", "Empty log directory; file logging disabled");
        }
    }
}

fn validate_replies(config: &SlashwireConfig, report: &mut ValidationReport) {
    let Some(replies) = &config.replies else { return };
    if let Some(message) = &replies.success_message {
        if message.trim().is_empty() {
            report.error("replies.successMessage", "Success message cannot be empty");
        }
    }
    if let Some(title) = &replies.error_title {
        if title.trim().is_empty() {
            report.warn("replies.errorTitle", "Error notices will have no title");
        }
    }
    if let Some(color) = replies.error_color {
        if color > 0xFF_FFFF {
            report.error("replies.errorColor", format!("{color:#x} is not a 24-bit RGB colour"));
        }
    }
}

fn validate_autocomplete(config: &SlashwireConfig, report: &mut ValidationReport) {
    let Some(autocomplete) = &config.autocomplete else { return };
    if let Some(max) = autocomplete.max_choices {
        if max == 0 || max > MAX_AUTOCOMPLETE_CHOICES {
            report.error(
                "autocomplete.maxChoices",
                format!("Must be between 1 and {MAX_AUTOCOMPLETE_CHOICES}, got {max}"),
            );
        }
    }
}
