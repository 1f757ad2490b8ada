use crate::entry::LogData;
use crate::writer::LogWriter;

/// Synchronous, ephemeral writer: prints the formatted line immediately
/// on the caller's thread.
pub struct ConsoleLogWriter {
    /// When set, the originating call site is appended to every line.
    /// Off in production builds so call-site info never leaks.
    show_location: bool,
}

impl ConsoleLogWriter {
    pub fn new(show_location: bool) -> Self {
        Self { show_location }
    }
}

impl LogWriter for ConsoleLogWriter {
    fn write(&self, entry: &LogData) {
        let line = entry.format_line();
        match entry.location.filter(|_| self.show_location) {
            Some(location) => println!("{line} ({}:{})", location.file, location.line),
            None => println!("{line}"),
        }
    }
}
