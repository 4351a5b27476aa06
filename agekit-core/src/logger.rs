//! Forwards the crate's `log` records to a host-provided logger.
//!
//! Mobile hosts have their own logging pipelines (os_log, Logcat, crash
//! reporters); this bridge hands them every record the SDK emits instead
//! of writing to stderr. Install it once at app startup:
//!
//! ```swift
//! class AgeKitLoggerBridge: AgeKitCore.Logger {
//!     func log(level: AgeKitCore.LogLevel, message: String) {
//!         os_log("%{public}@", message)
//!     }
//! }
//!
//! setLogger(logger: AgeKitLoggerBridge())
//! ```

use std::sync::{Arc, OnceLock};

/// Receiver for the SDK's log records, implemented by the host app.
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Handles one log record.
    fn log(&self, level: LogLevel, message: String);
}

/// Severity of a forwarded log record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LogLevel {
    /// Very detailed tracing output.
    Trace,
    /// Debugging information.
    Debug,
    /// Progress of normal operation.
    Info,
    /// Potentially harmful situations.
    Warn,
    /// Errors that still allow the SDK to continue.
    Error,
}

const fn log_level(level: log::Level) -> LogLevel {
    match level {
        log::Level::Error => LogLevel::Error,
        log::Level::Warn => LogLevel::Warn,
        log::Level::Info => LogLevel::Info,
        log::Level::Debug => LogLevel::Debug,
        log::Level::Trace => LogLevel::Trace,
    }
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// `log::Log` implementation that forwards to the installed [`Logger`].
struct ForeignLogger;

impl log::Log for ForeignLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        LOGGER_INSTANCE.get().is_some()
    }

    fn log(&self, record: &log::Record) {
        // Debug/trace records from dependencies are dropped; the host only
        // hears this crate's chatter at those levels.
        let from_agekit = record
            .module_path()
            .is_some_and(|module_path| module_path.starts_with("agekit"));
        let debug_or_trace = record.level() >= log::Level::Debug;
        if debug_or_trace && !from_agekit {
            return;
        }

        if let Some(logger) = LOGGER_INSTANCE.get() {
            logger.log(log_level(record.level()), format!("{}", record.args()));
        }
    }

    fn flush(&self) {}
}

/// Installs the host logger and wires it into the `log` facade.
///
/// Call once at app startup, before any SDK operation. Later calls are
/// ignored: both the host logger slot and the `log` facade are
/// set-once-globally.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        return;
    }

    static LOGGER: ForeignLogger = ForeignLogger;
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Trace);
    }
}
