//! Injected logging collaborator
//!
//! The transport receives a `Logger` at construction instead of reaching for
//! a process-wide instance. A `Logger` is a cheap-clone handle over a
//! `LogSink` plus its own level; changing the level of one handle affects
//! every clone of it and nothing else.

use crate::errors::{ClientError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Severity of a log message, ordered from quietest to noisiest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Nothing is emitted
    None = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl LogLevel {
    fn from_u8(value: u8) -> Self {
        match value {
            0 => LogLevel::None,
            1 => LogLevel::Error,
            2 => LogLevel::Warn,
            3 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::None => "none",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "off" => Ok(LogLevel::None),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(ClientError::ConfigError(format!(
                "Invalid log level: {}",
                other
            ))),
        }
    }
}

/// Destination for diagnostic messages
pub trait LogSink: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn log(&self, _level: LogLevel, _message: &str) {}
}

/// Sink that forwards to the `tracing` macros
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::None => {}
            LogLevel::Error => tracing::error!(target: "ollamakit", "{}", message),
            LogLevel::Warn => tracing::warn!(target: "ollamakit", "{}", message),
            LogLevel::Info => tracing::info!(target: "ollamakit", "{}", message),
            LogLevel::Debug => tracing::debug!(target: "ollamakit", "{}", message),
        }
    }
}

/// Leveled logging handle passed to the transport
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
    level: Arc<AtomicU8>,
}

impl Logger {
    /// Logger over a custom sink
    pub fn new(sink: Arc<dyn LogSink>, level: LogLevel) -> Self {
        Self {
            sink,
            level: Arc::new(AtomicU8::new(level as u8)),
        }
    }

    /// Logger that emits nothing
    pub fn noop() -> Self {
        Self::new(Arc::new(NoopSink), LogLevel::None)
    }

    /// Logger backed by `tracing`
    pub fn tracing(level: LogLevel) -> Self {
        Self::new(Arc::new(TracingSink), level)
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        level != LogLevel::None && self.level() >= level
    }

    /// Whether request/response bodies should be dumped
    pub fn debug_enabled(&self) -> bool {
        self.enabled(LogLevel::Debug)
    }

    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        if self.enabled(level) {
            self.sink.log(level, &message.to_string());
        }
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, message);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::noop()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CaptureSink {
        lines: Mutex<Vec<(LogLevel, String)>>,
    }

    impl LogSink for CaptureSink {
        fn log(&self, level: LogLevel, message: &str) {
            self.lines.lock().unwrap().push((level, message.to_string()));
        }
    }

    #[test]
    fn test_level_filtering() {
        let sink = Arc::new(CaptureSink::default());
        let logger = Logger::new(sink.clone(), LogLevel::Warn);

        logger.debug("hidden");
        logger.info("hidden");
        logger.warn("shown");
        logger.error("shown too");

        let lines = sink.lines.lock().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], (LogLevel::Warn, "shown".to_string()));
    }

    #[test]
    fn test_set_level_is_shared_by_clones() {
        let sink = Arc::new(CaptureSink::default());
        let logger = Logger::new(sink.clone(), LogLevel::Error);
        let clone = logger.clone();

        assert!(!clone.debug_enabled());
        logger.set_level(LogLevel::Debug);
        assert!(clone.debug_enabled());

        clone.debug("now visible");
        assert_eq!(sink.lines.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_independent_loggers_do_not_interfere() {
        let a = Logger::tracing(LogLevel::Info);
        let b = Logger::tracing(LogLevel::Info);
        a.set_level(LogLevel::Debug);
        assert_eq!(b.level(), LogLevel::Info);
    }

    #[test]
    fn test_noop_logger_is_silent() {
        let logger = Logger::default();
        assert_eq!(logger.level(), LogLevel::None);
        assert!(!logger.enabled(LogLevel::Error));
        logger.error("dropped");
    }

    #[test]
    fn test_parse_levels() {
        assert_eq!("DEBUG".parse::<LogLevel>().unwrap(), LogLevel::Debug);
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" none ".parse::<LogLevel>().unwrap(), LogLevel::None);
        assert!("loud".parse::<LogLevel>().is_err());
    }
}
