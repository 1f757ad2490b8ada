use std::path::PathBuf;
use std::sync::Arc;

mod background;
mod category;
mod entry;
mod error;
mod event;
mod facade;
mod level;
mod scrub;
mod semaphore_lite;
mod writer;

#[cfg(test)]
mod tests;

pub use background::{LogFile, RotateCallback};
pub use category::LogCategory;
pub use entry::{format_line_for_display, format_time, LogData, SourceLocation};
pub use error::{ErrorReporter, LoggerError, NoopReporter};
pub use event::*;
pub use facade::{panic_hook, system_clock, Logger, LoggerRegistry, WallClock, GLOBAL_LOGGER};
pub use level::LogLevel;
pub use scrub::{Scrubber, UserIdentity, UserIdentitySource, MASKED_EMAIL, MASKED_IP, MASKED_NAME};
pub use writer::console::ConsoleLogWriter;
pub use writer::file::{FileLogWriter, LogTail};
pub use writer::remote::{BreadcrumbSink, RemoteLogWriter};
pub use writer::tracing::TracingLogWriter;
pub use writer::LogWriter;

pub type Result<T> = std::result::Result<T, LoggerError>;

pub const DEFAULT_ROTATION_MAX_BYTES: u64 = 300 * 1024;
pub const DEFAULT_QUEUE_CAPACITY: usize = 100;

#[derive(Debug, Clone)]
pub struct LoggerConfig {
    /// Application-private directory holding the two rotating files.
    pub log_dir: PathBuf,
    /// Cache directory; upload snapshots go into `log_upload/` below it.
    pub cache_dir: PathBuf,
    pub rotation_max_bytes: u64,
    pub queue_capacity: usize,
    /// Debug builds log DEBUG-and-below and print call sites.
    pub debug: bool,
}

impl LoggerConfig {
    pub fn new(log_dir: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            log_dir: log_dir.into(),
            cache_dir: cache_dir.into(),
            rotation_max_bytes: DEFAULT_ROTATION_MAX_BYTES,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            debug: cfg!(debug_assertions),
        }
    }
}

pub struct LoggerHandles {
    pub logger: Arc<Logger>,
    /// Kept separately so export and live tail stay reachable after the
    /// writer is boxed into the dispatch list.
    pub file_writer: Arc<FileLogWriter>,
}

/// Builds the default writer set (console first, durable last) around a
/// fresh background processor.
pub fn init_logger(config: &LoggerConfig, rotate_callback: RotateCallback) -> LoggerHandles {
    init_logger_with(
        config,
        rotate_callback,
        Arc::new(NoopReporter),
        system_clock(),
    )
}

pub fn init_logger_with(
    config: &LoggerConfig,
    rotate_callback: RotateCallback,
    reporter: Arc<dyn ErrorReporter>,
    wall_clock: WallClock,
) -> LoggerHandles {
    let file_writer = Arc::new(FileLogWriter::new(config, rotate_callback, reporter));
    let console = Arc::new(ConsoleLogWriter::new(config.debug));
    let writers: Vec<Arc<dyn LogWriter>> = vec![console, file_writer.clone()];
    let logger = Arc::new(Logger::new(writers, wall_clock, config.debug));
    LoggerHandles {
        logger,
        file_writer,
    }
}
