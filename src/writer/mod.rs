use crate::entry::LogData;

pub mod console;
pub mod file;
pub mod remote;
pub mod tracing;

/// One destination for log entries. Fire and forget: implementations may
/// defer work internally but never surface failures to the caller.
pub trait LogWriter: Send + Sync {
    fn write(&self, entry: &LogData);
}
