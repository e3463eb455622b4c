//! Logging Infrastructure
//!
//! `RUST_LOG` wins when set; otherwise the configured level applies to this
//! crate and to `tower_http`.

use std::path::Path;

use tracing_subscriber::EnvFilter;

use crate::config::Config;

fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("finance_server={level},tower_http={level}").into())
}

/// Initialize the global subscriber from configuration
pub fn init_logger(config: &Config) {
    init_logger_with_file(&config.log_level, config.log_json, config.log_dir.as_deref());
}

/// Initialize the logger with optional JSON output and daily rolling file
///
/// A missing `log_dir` is created; when that fails the logger falls back to
/// stdout and says so once it is up.
pub fn init_logger_with_file(log_level: &str, json: bool, log_dir: Option<&str>) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter(log_level))
        .with_file(false)
        .with_line_number(false)
        .with_thread_ids(false);

    let mut dir_error = None;
    let file_appender = log_dir.map(Path::new).and_then(|dir| {
        match std::fs::create_dir_all(dir) {
            Ok(()) => Some(tracing_appender::rolling::daily(dir, "finance-server")),
            Err(e) => {
                dir_error = Some((dir.display().to_string(), e));
                None
            }
        }
    });

    let result = match (json, file_appender) {
        (true, Some(appender)) => builder.json().with_writer(appender).try_init(),
        (true, None) => builder.json().try_init(),
        (false, Some(appender)) => builder.with_ansi(false).with_writer(appender).try_init(),
        (false, None) => builder.try_init(),
    };

    if let Err(e) = result {
        eprintln!("logger already initialized: {e}");
    }

    if let Some((dir, e)) = dir_error {
        tracing::warn!(log_dir = %dir, error = %e, "Log directory unavailable, logging to stdout");
    }
}
