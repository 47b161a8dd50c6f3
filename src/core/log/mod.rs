//! Engine log routing
//!
//! An instance's diagnostic output goes to exactly one [`LogSink`]: nowhere,
//! a user callback, or an append-mode file. The sink lives in a [`LogRouter`]
//! whose address is handed to the engine as the callback context. The router
//! mutex is the single lock covering both sink transitions and the
//! trampoline's dispatch.

mod file;
mod trampoline;

pub use file::LogFile;
pub(crate) use trampoline::log_trampoline;

use parking_lot::Mutex;
use std::fmt;
use std::os::raw::c_int;
use std::sync::Arc;

/// Severity reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Notice,
    Warning,
    Error,
}

impl LogLevel {
    /// Map a `LIBVLC_*` level; unknown values clamp to the nearest level
    pub fn from_raw(level: c_int) -> Self {
        match level {
            i32::MIN..=1 => LogLevel::Debug,
            2 => LogLevel::Notice,
            3 => LogLevel::Warning,
            _ => LogLevel::Error,
        }
    }

    pub fn as_raw(self) -> c_int {
        match self {
            LogLevel::Debug => 0,
            LogLevel::Notice => 2,
            LogLevel::Warning => 3,
            LogLevel::Error => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Notice => "notice",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One engine log message as seen by a callback
///
/// `message` is `None` when the engine's format string could not be
/// rendered.
#[derive(Debug, Clone, Copy)]
pub struct LogRecord<'a> {
    pub level: LogLevel,
    pub message: Option<&'a str>,
    pub module: Option<&'a str>,
    pub file: Option<&'a str>,
    pub line: Option<u32>,
}

/// Callback receiving engine log records
///
/// Runs on engine threads, possibly concurrently with other engine threads,
/// while the instance's log lock is held. It must not block for long.
pub type LogHandler = Arc<dyn Fn(&LogRecord<'_>) + Send + Sync + 'static>;

/// Where an instance's log output currently goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogMode {
    Disabled,
    Callback,
    File,
}

/// The active log destination
pub(crate) enum LogSink {
    Disabled,
    Callback(LogHandler),
    File(LogFile),
}

impl LogSink {
    pub(crate) fn mode(&self) -> LogMode {
        match self {
            LogSink::Disabled => LogMode::Disabled,
            LogSink::Callback(_) => LogMode::Callback,
            LogSink::File(_) => LogMode::File,
        }
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogSink::Disabled => f.write_str("Disabled"),
            LogSink::Callback(_) => f.write_str("Callback(..)"),
            LogSink::File(file) => f.debug_tuple("File").field(&file.path()).finish(),
        }
    }
}

/// Shared sink state; the engine holds a non-owning pointer to it
pub(crate) struct LogRouter {
    sink: Mutex<LogSink>,
}

impl LogRouter {
    pub(crate) fn new() -> Self {
        LogRouter {
            sink: Mutex::new(LogSink::Disabled),
        }
    }

    pub(crate) fn mode(&self) -> LogMode {
        self.sink.lock().mode()
    }

    /// Install `next` and hand back the previous sink
    ///
    /// The previous sink is returned rather than dropped so callers can close
    /// files and release handlers after the lock is gone.
    pub(crate) fn replace(&self, next: LogSink) -> LogSink {
        std::mem::replace(&mut *self.sink.lock(), next)
    }

    /// Swap the handler in place if a callback is active
    ///
    /// Returns the old handler, or gives `handler` back when the sink is not
    /// in callback mode.
    pub(crate) fn swap_handler(
        &self,
        handler: LogHandler,
    ) -> std::result::Result<LogHandler, LogHandler> {
        let mut sink = self.sink.lock();
        match &mut *sink {
            LogSink::Callback(current) => Ok(std::mem::replace(current, handler)),
            _ => Err(handler),
        }
    }

    /// Deliver a record to the callback, if one is active
    ///
    /// Returns whether a handler ran.
    pub(crate) fn dispatch(&self, record: &LogRecord<'_>) -> bool {
        let sink = self.sink.lock();
        match &*sink {
            LogSink::Callback(handler) => {
                handler(record);
                true
            }
            _ => false,
        }
    }
}

/// A handler that forwards engine records to `tracing` under target `vlc`
pub fn tracing_handler() -> LogHandler {
    Arc::new(|record: &LogRecord<'_>| {
        let message = record.message.unwrap_or("<unformattable>");
        let module = record.module.unwrap_or("");
        let file = record.file.unwrap_or("");
        let line = record.line.unwrap_or(0);
        match record.level {
            LogLevel::Debug => {
                tracing::debug!(target: "vlc", module, file, line, "{}", message)
            }
            LogLevel::Notice => {
                tracing::info!(target: "vlc", module, file, line, "{}", message)
            }
            LogLevel::Warning => {
                tracing::warn!(target: "vlc", module, file, line, "{}", message)
            }
            LogLevel::Error => {
                tracing::error!(target: "vlc", module, file, line, "{}", message)
            }
        }
    })
}
