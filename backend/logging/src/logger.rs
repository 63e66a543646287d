//! Structured Logger
//!
//! Wraps `tracing` to provide console output, optional NDJSON file rotation,
//! and environment-based level control.

use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name prefix of the daily log; the appender adds `.YYYY-MM-DD`.
pub const LOG_FILE_PREFIX: &str = "slashwire.log";

/// Initialize the global structured logger.
///
/// With `log_dir` set, a rolling file layer is added next to the console
/// layer; `json` selects NDJSON for that file, plain text otherwise.
/// Returns false when a global subscriber was already installed.
pub fn init_logger<P: AsRef<Path>>(log_dir: Option<P>, level: &str, json: bool) -> bool {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(true);

    // Rolling file appender: writes to `<dir>/slashwire.log.YYYY-MM-DD`
    let (json_layer, text_layer) = match log_dir {
        Some(dir) => {
            let appender = RollingFileAppender::new(Rotation::DAILY, dir.as_ref(), LOG_FILE_PREFIX);
            if json {
                (Some(fmt::layer().json().with_writer(appender).with_ansi(false)), None)
            } else {
                (None, Some(fmt::layer().with_writer(appender).with_ansi(false)))
            }
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .is_ok()
}
