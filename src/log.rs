use std::path::Path;

use clap::ValueEnum;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::JsonFields;
use tracing_subscriber::prelude::*;

/// Log verbosity selectable on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Write no log file at all
    #[value(alias = "none")]
    Off,
    Error,
    Warn,
    Info,
    Debug,
}

impl LogLevel {
    fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

/// Installs the JSON file logger.
///
/// Returns `None` when logging is switched off. Otherwise the returned guard
/// must be kept alive for as long as log lines should be flushed.
pub fn init(level: Option<LogLevel>, log_path: &Path) -> anyhow::Result<Option<WorkerGuard>> {
    if level == Some(LogLevel::Off) {
        return Ok(None);
    }

    let log_dir = log_path.parent().unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(log_dir).inspect_err(|e| {
        eprintln!("Failed to create log directory {:?}: {}", log_dir, e);
    })?;

    let file_name = log_path
        .file_name()
        .ok_or_else(|| anyhow::anyhow!("Log path has no file name: {:?}", log_path))?;
    let appender = tracing_appender::rolling::never(log_dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let json_layer = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(writer)
        .fmt_fields(JsonFields::default());

    // Explicit level wins, then RUST_LOG, then INFO
    let env_filter = match level {
        Some(level) => EnvFilter::new(level.as_filter()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .try_init()?;

    Ok(Some(guard))
}

/// Logging capability handed to the diagnostic pipeline
#[cfg_attr(test, mockall::automock)]
pub trait Logger: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards pipeline log lines to `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        tracing::info!("{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!("{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn init_with_logging_off_installs_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let log_path = temp_dir.path().join("logs").join("chapel-lsp.log");

        let guard = init(Some(LogLevel::Off), &log_path).unwrap();

        assert!(guard.is_none());
        assert!(!log_path.parent().unwrap().exists());
    }

    #[test]
    fn none_is_accepted_as_off() {
        assert_eq!(LogLevel::from_str("none", true), Ok(LogLevel::Off));
        assert_eq!(LogLevel::from_str("warn", true), Ok(LogLevel::Warn));
    }
}
