//! Config defaults: applies sensible default values to parsed config.

use crate::schema::{AutocompleteConfig, LoggingConfig, RepliesConfig, SlashwireConfig};

pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Acknowledgment sent when a handler succeeds without replying.
pub const DEFAULT_SUCCESS_MESSAGE: &str = "✅ Success";

pub const DEFAULT_ERROR_TITLE: &str = "Error";

/// The platform's standard red.
pub const DEFAULT_ERROR_COLOR: u32 = 15548997;

/// Most suggestions a single autocomplete response may carry.
pub const MAX_AUTOCOMPLETE_CHOICES: usize = 25;

/// Apply all defaults to a freshly loaded config.
pub fn apply_all_defaults(config: SlashwireConfig) -> SlashwireConfig {
    let config = apply_logging_defaults(config);
    let config = apply_reply_defaults(config);
    apply_autocomplete_defaults(config)
}

fn apply_logging_defaults(mut config: SlashwireConfig) -> SlashwireConfig {
    let logging = config.logging.get_or_insert_with(LoggingConfig::default);
    if logging.level.is_none() {
        logging.level = Some(DEFAULT_LOG_LEVEL.to_string());
    }
    if logging.json.is_none() {
        logging.json = Some(true);
    }
    config
}

fn apply_reply_defaults(mut config: SlashwireConfig) -> SlashwireConfig {
    let replies = config.replies.get_or_insert_with(RepliesConfig::default);
    if replies.success_message.is_none() {
        replies.success_message = Some(DEFAULT_SUCCESS_MESSAGE.to_string());
    }
    if replies.error_title.is_none() {
        replies.error_title = Some(DEFAULT_ERROR_TITLE.to_string());
    }
    if replies.error_color.is_none() {
        replies.error_color = Some(DEFAULT_ERROR_COLOR);
    }
    config
}

fn apply_autocomplete_defaults(mut config: SlashwireConfig) -> SlashwireConfig {
    let autocomplete = config.autocomplete.get_or_insert_with(AutocompleteConfig::default);
    if autocomplete.max_choices.is_none() {
        autocomplete.max_choices = Some(MAX_AUTOCOMPLETE_CHOICES);
    }
    config
}
