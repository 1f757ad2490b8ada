use std::panic::PanicHookInfo;
use std::sync::{Arc, OnceLock};

use chrono::Utc;

use crate::category::LogCategory;
use crate::entry::{format_time, LogData, SourceLocation};
use crate::event::{LogEventType, APP_CRASH};
use crate::error::LoggerError;
use crate::level::LogLevel;
use crate::writer::LogWriter;
use crate::Result;

/// Injectable wall clock returning milliseconds since the Unix epoch.
pub type WallClock = Arc<dyn Fn() -> i64 + Send + Sync>;

pub fn system_clock() -> WallClock {
    Arc::new(|| Utc::now().timestamp_millis())
}

/// Dispatches every log call to an ordered list of writers.
///
/// Writers are invoked in insertion order; by convention the durable
/// writer goes last so its blocking path never delays the others.
pub struct Logger {
    writers: Vec<Arc<dyn LogWriter>>,
    wall_clock: WallClock,
    debug: bool,
}

impl Logger {
    pub fn new(writers: Vec<Arc<dyn LogWriter>>, wall_clock: WallClock, debug: bool) -> Self {
        Self {
            writers,
            wall_clock,
            debug,
        }
    }

    /// A logger with no writers: every operation is a cheap no-op. This
    /// is what the registry hands out before a real logger is installed,
    /// so code can log unconditionally during early startup and in tests.
    pub fn noop() -> Self {
        Self::new(Vec::new(), system_clock(), false)
    }

    #[track_caller]
    pub fn log(&self, event: LogEventType, message: impl Into<String>) {
        self.dispatch(
            event.level,
            event.category,
            Some(event.name),
            message.into(),
            false,
            SourceLocation::capture(),
        );
    }

    /// Custom event/message at INFO.
    #[track_caller]
    pub fn log_custom(&self, category: LogCategory, message: impl Into<String>) {
        self.dispatch(
            LogLevel::Info,
            category,
            None,
            message.into(),
            false,
            SourceLocation::capture(),
        );
    }

    #[track_caller]
    pub fn log_custom_level(
        &self,
        level: LogLevel,
        category: LogCategory,
        message: impl Into<String>,
    ) {
        self.dispatch(
            level,
            category,
            None,
            message.into(),
            false,
            SourceLocation::capture(),
        );
    }

    /// Waits for persistence before returning. For last-resort logging
    /// (crash handlers) only.
    #[track_caller]
    pub fn log_blocking(&self, event: LogEventType, message: impl Into<String>) {
        self.dispatch(
            event.level,
            event.category,
            Some(event.name),
            message.into(),
            true,
            SourceLocation::capture(),
        );
    }

    pub fn format_time(&self, time_ms: i64) -> String {
        format_time(time_ms)
    }

    /// Verbose diagnostics stay on debug builds; production keeps INFO
    /// and above. Checked once here, not per writer.
    fn should_log(&self, level: LogLevel) -> bool {
        self.debug || level > LogLevel::Debug
    }

    fn dispatch(
        &self,
        level: LogLevel,
        category: LogCategory,
        event_name: Option<&'static str>,
        message: String,
        blocking: bool,
        location: SourceLocation,
    ) {
        if self.writers.is_empty() || !self.should_log(level) {
            return;
        }
        let entry = LogData {
            timestamp: format_time((self.wall_clock)()),
            level,
            category,
            event_name,
            message,
            blocking,
            location: Some(location),
        };
        for writer in &self.writers {
            writer.write(&entry);
        }
    }
}

/// Process-wide logger slot with a first-class no-op default.
///
/// `install` is expected to run once at startup before other threads log;
/// that ordering is a startup invariant, not something enforced here.
pub struct LoggerRegistry {
    slot: OnceLock<Arc<Logger>>,
}

impl LoggerRegistry {
    pub const fn new() -> Self {
        Self {
            slot: OnceLock::new(),
        }
    }

    pub fn install(&self, logger: Arc<Logger>) -> Result<()> {
        self.slot
            .set(logger)
            .map_err(|_| LoggerError::AlreadyInstalled)
    }

    pub fn get(&self) -> Arc<Logger> {
        self.slot.get().cloned().unwrap_or_else(noop_logger)
    }
}

impl Default for LoggerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience registry for truly global, crash-time logging. Library
/// consumers should prefer injecting `Arc<Logger>` directly.
pub static GLOBAL_LOGGER: LoggerRegistry = LoggerRegistry::new();

fn noop_logger() -> Arc<Logger> {
    static NOOP: OnceLock<Arc<Logger>> = OnceLock::new();
    NOOP.get_or_init(|| Arc::new(Logger::noop())).clone()
}

/// Returns a panic hook that force-flushes the panic message to disk
/// before the process dies.
pub fn panic_hook(
    logger: Arc<Logger>,
) -> Box<dyn Fn(&PanicHookInfo<'_>) + Send + Sync + 'static> {
    Box::new(move |info| {
        let message = match info.payload().downcast_ref::<&'static str>() {
            Some(s) => *s,
            None => match info.payload().downcast_ref::<String>() {
                Some(s) => &s[..],
                None => "Box<dyn Any>",
            },
        };
        let location = info
            .location()
            .map(|l| l.to_string())
            .unwrap_or_else(|| "unknown location".to_string());
        logger.log_blocking(APP_CRASH, format!("panicked at '{message}', {location}"));
    })
}
