use tracing::{debug, error, info, trace, warn};

use crate::entry::LogData;
use crate::level::LogLevel;
use crate::writer::LogWriter;

/// Forwards entries into the `tracing` ecosystem so host applications
/// that already run a subscriber see the same stream.
pub struct TracingLogWriter;

impl LogWriter for TracingLogWriter {
    fn write(&self, entry: &LogData) {
        let line = entry.format_line();
        match entry.level {
            LogLevel::Trace => trace!("{line}"),
            LogLevel::Debug => debug!("{line}"),
            LogLevel::Info => info!("{line}"),
            LogLevel::Warn => warn!("{line}"),
            LogLevel::Error | LogLevel::Fatal => error!("{line}"),
        }
    }
}
