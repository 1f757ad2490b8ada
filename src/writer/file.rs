use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use crate::background::{BackgroundLogger, Command, LogChannel, LogFile, RotateCallback};
use crate::entry::LogData;
use crate::error::{ErrorReporter, LoggerError};
use crate::semaphore_lite::SemaphoreLite;
use crate::writer::LogWriter;
use crate::{LoggerConfig, Result};

/// How long a blocking write waits for the processor before giving up.
const BLOCKING_WAIT: Duration = Duration::from_millis(500);
/// Extra settle time after a blocking write, letting a rotation callback
/// and the flush land before the caller (usually a crash handler) returns.
const BLOCKING_GRACE: Duration = Duration::from_millis(100);
const EXPORT_TIMEOUT: Duration = Duration::from_secs(5);

/// The durable writer: formats entries, hands them to the background
/// processor over a bounded queue and exposes export/tail accessors.
///
/// Non-blocking writes are drop-newest under load; logging must never
/// slow down the rest of the application.
pub struct FileLogWriter {
    channel: Arc<LogChannel>,
    next_tail_id: AtomicU64,
}

impl FileLogWriter {
    pub fn new(
        config: &LoggerConfig,
        rotate_callback: RotateCallback,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        let channel = Arc::new(LogChannel::new(config.queue_capacity));
        BackgroundLogger::spawn(
            channel.clone(),
            config.log_dir.clone(),
            config.cache_dir.clone(),
            config.rotation_max_bytes,
            rotate_callback,
            reporter,
        );
        Self {
            channel,
            next_tail_id: AtomicU64::new(0),
        }
    }

    /// Enqueues an already-formatted line on the non-blocking path.
    /// Returns `false` if the queue was full and the line was dropped.
    pub(crate) fn enqueue_raw(&self, line: String) -> bool {
        self.channel.push_line(line)
    }

    /// Waits for the line to actually hit the file. Bypasses the bounded
    /// queue entirely, so it completes even when the buffer is full.
    /// Intended for last-gasp logging before process death only.
    fn write_blocking(&self, line: String) {
        let done = Arc::new(SemaphoreLite::new());
        self.channel.push_control(Command::BlockingLine {
            line,
            done: done.clone(),
        });
        done.wait_timeout(BLOCKING_WAIT);
        thread::sleep(BLOCKING_GRACE);
    }

    /// Snapshot-copies both log files for upload. The copies are static;
    /// the originals keep growing underneath them.
    pub fn files_for_upload(&self) -> Result<Vec<LogFile>> {
        let (reply, receiver) = mpsc::channel();
        self.channel.push_control(Command::Export { reply });
        match receiver.recv_timeout(EXPORT_TIMEOUT) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(LoggerError::Timeout),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(LoggerError::ProcessorGone),
        }
    }

    /// Deletes upload copies produced by [`files_for_upload`]. Safe to
    /// call repeatedly.
    ///
    /// [`files_for_upload`]: FileLogWriter::files_for_upload
    pub fn clear_upload_temp_files(&self, files: Vec<LogFile>) {
        self.channel.push_control(Command::ClearExport { files });
    }

    /// Live tail: yields every line currently on disk (oldest file
    /// first), then every line as it is appended. Infinite; dropping the
    /// tail detaches it. Each call restarts from the beginning.
    pub fn log_lines(&self) -> LogTail {
        let id = self.next_tail_id.fetch_add(1, Ordering::SeqCst);
        let (sender, receiver) = mpsc::channel();
        self.channel.push_control(Command::Attach { id, sender });
        LogTail {
            id,
            receiver,
            channel: self.channel.clone(),
        }
    }

    /// Blocks until everything queued so far has been written and
    /// flushed, or the timeout elapses. Returns `true` on completion.
    pub fn wait_for_flush_timeout(&self, duration: Duration) -> bool {
        self.channel.wait_for_flush_timeout(duration)
    }
}

impl LogWriter for FileLogWriter {
    fn write(&self, entry: &LogData) {
        let line = entry.format_line();
        if entry.blocking {
            self.write_blocking(line);
        } else {
            self.enqueue_raw(line);
        }
    }
}

impl Drop for FileLogWriter {
    fn drop(&mut self) {
        // Lets the processor drain what is queued and exit.
        self.channel.close();
    }
}

/// Cancelable live tail over the rotating files. Dropping it detaches the
/// listener from the processor, even mid-stream.
pub struct LogTail {
    id: u64,
    receiver: mpsc::Receiver<String>,
    channel: Arc<LogChannel>,
}

impl LogTail {
    /// Waits up to `duration` for the next line.
    pub fn next_timeout(&self, duration: Duration) -> Option<String> {
        self.receiver.recv_timeout(duration).ok()
    }
}

impl Iterator for LogTail {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        self.receiver.recv().ok()
    }
}

impl Drop for LogTail {
    fn drop(&mut self) {
        self.channel.push_control(Command::Detach { id: self.id });
    }
}
