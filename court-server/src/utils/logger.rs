//! Logging Infrastructure
//!
//! Structured logging setup with support for both development and production environments.
//! Features:
//! - Daily rotating application logs
//! - Separate security log stream (`target: "security"`)

use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the logger with console output only
pub fn init_logger(level: &str) -> anyhow::Result<()> {
    init_logger_with_file(level, false, None)
}

/// Initialize the logging system with daily rotating logs
///
/// # Arguments
/// * `level` - Log level (e.g., "info", "debug", "warn")
/// * `json_format` - Whether to use JSON format on the console
/// * `log_dir` - Optional directory for file logging (e.g., Some("./data/logs"))
///
/// 文件日志分为 `app/` 与 `security/` 两个子目录，security 目录只接收
/// `target: "security"` 的事件。
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .boxed()
    } else {
        fmt::layer().with_target(true).with_line_number(false).boxed()
    };

    let (app_layer, security_layer) = match log_dir {
        Some(log_dir) => {
            let app_log_dir = log_dir.join("app");
            let security_log_dir = log_dir.join("security");
            fs::create_dir_all(&app_log_dir)?;
            fs::create_dir_all(&security_log_dir)?;

            let app_log = RollingFileAppender::new(Rotation::DAILY, app_log_dir, "app");
            let security_log =
                RollingFileAppender::new(Rotation::DAILY, security_log_dir, "security");

            let app_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(app_log)
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() != "security"
                }));
            let security_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_writer(security_log)
                .with_filter(tracing_subscriber::filter::filter_fn(|meta| {
                    meta.target() == "security"
                }));
            (Some(app_layer), Some(security_layer))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(app_layer)
        .with(security_layer)
        .try_init()?;

    Ok(())
}

/// 安全事件日志
///
/// ```ignore
/// security_log!(WARN, "admin_pin_rejected", path = %path);
/// ```
#[macro_export]
macro_rules! security_log {
    (WARN, $event:expr $(, $($field:tt)*)?) => {
        tracing::warn!(target: "security", event = $event $(, $($field)*)?)
    };
    (INFO, $event:expr $(, $($field:tt)*)?) => {
        tracing::info!(target: "security", event = $event $(, $($field)*)?)
    };
}
