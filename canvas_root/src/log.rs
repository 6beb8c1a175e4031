//! Internal logging system for canvas roots
//!
//! This module provides a flexible logging system with:
//! - Customizable logger via Logger trait
//! - Severity levels (Trace, Debug, Info, Warn, Error)
//! - Colored console output by default
//! - Forwarding to the `log` facade for applications that install their own backend
//! - File and line information for detailed ERROR logs

use colored::*;
use std::time::SystemTime;
use chrono::{DateTime, Local};

/// Logger trait for custom logging implementations
///
/// # Example
///
/// ```no_run
/// use canvas_root::canvas::log::{Logger, LogEntry};
///
/// struct CountingLogger;
///
/// impl Logger for CountingLogger {
///     fn log(&self, entry: &LogEntry) {
///         // Count, store or forward the entry...
///     }
/// }
/// ```
pub trait Logger: Send + Sync {
    /// Log an entry
    fn log(&self, entry: &LogEntry);
}

/// Log entry containing all information about a log message
#[derive(Debug, Clone)]
pub struct LogEntry {
    /// Severity level (Trace, Debug, Info, Warn, Error)
    pub severity: LogSeverity,

    /// Timestamp when the log was created
    pub timestamp: SystemTime,

    /// Source module (e.g., "canvas::Root", "canvas::HeadlessBackend")
    pub source: String,

    /// Log message
    pub message: String,

    /// Source file (only for detailed ERROR logs)
    pub file: Option<&'static str>,

    /// Source line (only for detailed ERROR logs)
    pub line: Option<u32>,
}

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogSeverity {
    /// Very verbose information (per-frame events)
    Trace,

    /// Development/debugging information
    Debug,

    /// Lifecycle events (root created, unmounted)
    Info,

    /// Warning messages (potential issues)
    Warn,

    /// Error messages (with file:line details)
    Error,
}

impl From<LogSeverity> for log::Level {
    fn from(severity: LogSeverity) -> Self {
        match severity {
            LogSeverity::Trace => log::Level::Trace,
            LogSeverity::Debug => log::Level::Debug,
            LogSeverity::Info => log::Level::Info,
            LogSeverity::Warn => log::Level::Warn,
            LogSeverity::Error => log::Level::Error,
        }
    }
}

/// Default logger implementation using colored console output
///
/// Format:
/// - Normal: `[timestamp] [SEVERITY] [source] message`
/// - Error: `[timestamp] [ERROR] [source] message (file:line)`
pub struct DefaultLogger;

impl Logger for DefaultLogger {
    fn log(&self, entry: &LogEntry) {
        let datetime: DateTime<Local> = entry.timestamp.into();
        let timestamp = datetime.format("%Y-%m-%d %H:%M:%S%.3f").to_string();

        let severity_str = match entry.severity {
            LogSeverity::Trace => "TRACE".bright_black(),
            LogSeverity::Debug => "DEBUG".cyan(),
            LogSeverity::Info => "INFO ".green(),
            LogSeverity::Warn => "WARN ".yellow(),
            LogSeverity::Error => "ERROR".red().bold(),
        };

        let source = entry.source.bright_blue();

        if let (Some(file), Some(line)) = (entry.file, entry.line) {
            println!(
                "[{}] [{}] [{}] {} ({}:{})",
                timestamp,
                severity_str,
                source,
                entry.message,
                file,
                line
            );
        } else {
            println!(
                "[{}] [{}] [{}] {}",
                timestamp,
                severity_str,
                source,
                entry.message
            );
        }
    }
}

/// Logger forwarding every entry to the `log` crate facade
///
/// The entry source becomes the log target, so `env_logger` filters such as
/// `RUST_LOG=canvas::Root=debug` apply.
pub struct FacadeLogger;

impl Logger for FacadeLogger {
    fn log(&self, entry: &LogEntry) {
        let level: log::Level = entry.severity.into();
        match (entry.file, entry.line) {
            (Some(file), Some(line)) => {
                log::log!(target: entry.source.as_str(), level, "{} ({}:{})", entry.message, file, line);
            }
            _ => {
                log::log!(target: entry.source.as_str(), level, "{}", entry.message);
            }
        }
    }
}

// ===== LOGGING MACROS =====

/// Log a TRACE message (very verbose, per frame)
#[macro_export]
macro_rules! canvas_trace {
    ($source:expr, $($arg:tt)*) => {
        $crate::canvas::Engine::log(
            $crate::canvas::log::LogSeverity::Trace,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a DEBUG message (development information)
#[macro_export]
macro_rules! canvas_debug {
    ($source:expr, $($arg:tt)*) => {
        $crate::canvas::Engine::log(
            $crate::canvas::log::LogSeverity::Debug,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an INFO message (lifecycle events)
#[macro_export]
macro_rules! canvas_info {
    ($source:expr, $($arg:tt)*) => {
        $crate::canvas::Engine::log(
            $crate::canvas::log::LogSeverity::Info,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log a WARN message (potential issues)
#[macro_export]
macro_rules! canvas_warn {
    ($source:expr, $($arg:tt)*) => {
        $crate::canvas::Engine::log(
            $crate::canvas::log::LogSeverity::Warn,
            $source,
            format!($($arg)*)
        )
    };
}

/// Log an ERROR message with file:line information
#[macro_export]
macro_rules! canvas_error {
    ($source:expr, $($arg:tt)*) => {
        $crate::canvas::Engine::log_detailed(
            $crate::canvas::log::LogSeverity::Error,
            $source,
            format!($($arg)*),
            file!(),
            line!()
        )
    };
}

/// Log an ERROR and return early with `Error::Backend`
///
/// # Example
///
/// ```ignore
/// canvas_bail!("canvas::HeadlessBackend", "Unknown target {:?}", id);
/// ```
#[macro_export]
macro_rules! canvas_bail {
    ($source:expr, $($arg:tt)*) => {{
        let message = format!($($arg)*);
        $crate::canvas::Engine::log_detailed(
            $crate::canvas::log::LogSeverity::Error,
            $source,
            message.clone(),
            file!(),
            line!()
        );
        return Err($crate::canvas::Error::Backend(message));
    }};
}

#[cfg(test)]
#[path = "log_tests.rs"]
mod tests;
