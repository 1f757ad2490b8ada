use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoggerError {
    /// A registry only accepts one logger for the lifetime of the process.
    #[error("a logger is already installed")]
    AlreadyInstalled,

    #[error("{message} ({})", .path.display())]
    Io {
        message: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The background processor thread is gone; its queue is closed.
    #[error("log processor is not running")]
    ProcessorGone,

    #[error("timed out waiting for the log processor")]
    Timeout,
}

impl LoggerError {
    pub(crate) fn io(message: impl Into<String>, path: impl Into<PathBuf>, source: io::Error) -> Self {
        LoggerError::Io {
            message: message.into(),
            path: path.into(),
            source,
        }
    }
}

/// Side channel for failures that must not reach the calling code.
///
/// Writer I/O errors never propagate to callers; implementations forward
/// them to a crash-reporting service or similar. The default is
/// [`NoopReporter`].
pub trait ErrorReporter: Send + Sync {
    fn report(&self, message: &str, cause: &(dyn std::error::Error + 'static));
}

pub struct NoopReporter;

impl ErrorReporter for NoopReporter {
    fn report(&self, _message: &str, _cause: &(dyn std::error::Error + 'static)) {}
}
