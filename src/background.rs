use std::collections::VecDeque;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, SystemTime};

use parking_lot::Mutex;

use crate::error::{ErrorReporter, LoggerError};
use crate::semaphore_lite::SemaphoreLite;
use crate::Result;

pub(crate) const FILE_NAME: &str = "Data.log";
pub(crate) const FILE_NAME_2: &str = "Data1.log";
pub(crate) const UPLOAD_TEMP_DIR: &str = "log_upload";

static INSTANCE_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// Invoked on the processor thread right after a rotation; the returned
/// lines open the fresh active file so every generation starts with a
/// self-contained state summary. Must not block beyond producing a
/// handful of lines.
pub type RotateCallback = Box<dyn FnMut() -> Vec<String> + Send>;

/// A snapshot copy of one log file, safe to upload while the originals
/// keep being appended to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub name: String,
    pub path: PathBuf,
}

pub(crate) enum Command {
    Line(String),
    BlockingLine {
        line: String,
        done: Arc<SemaphoreLite>,
    },
    /// Barrier: flush everything queued before it, then signal.
    Sync {
        done: Arc<SemaphoreLite>,
    },
    Export {
        reply: mpsc::Sender<Result<Vec<LogFile>>>,
    },
    ClearExport {
        files: Vec<LogFile>,
    },
    Attach {
        id: u64,
        sender: mpsc::Sender<String>,
    },
    Detach {
        id: u64,
    },
}

#[derive(Default)]
struct CommandQueue {
    commands: VecDeque<Command>,
    /// Count of buffered non-blocking lines, bounded by the channel
    /// capacity. Control commands are never counted nor dropped.
    buffered_lines: usize,
}

/// Shared front between log callers and the processor thread.
pub(crate) struct LogChannel {
    semaphore: SemaphoreLite,
    queue: Mutex<CommandQueue>,
    capacity: usize,
    closed: AtomicBool,
}

impl LogChannel {
    pub(crate) fn new(capacity: usize) -> Self {
        LogChannel {
            semaphore: SemaphoreLite::new(),
            queue: Mutex::new(CommandQueue::default()),
            capacity,
            closed: AtomicBool::new(false),
        }
    }

    /// Enqueues a formatted line without blocking. Returns `false` when
    /// the buffer is full and the line was dropped (drop-newest policy).
    pub(crate) fn push_line(&self, line: String) -> bool {
        {
            let mut queue = self.queue.lock();
            if queue.buffered_lines >= self.capacity {
                return false;
            }
            queue.buffered_lines += 1;
            queue.commands.push_back(Command::Line(line));
        }
        self.semaphore.signal();
        true
    }

    pub(crate) fn push_control(&self, command: Command) {
        self.queue.lock().commands.push_back(command);
        self.semaphore.signal();
    }

    pub(crate) fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.semaphore.signal();
    }

    pub(crate) fn wait_for_flush_timeout(&self, duration: Duration) -> bool {
        let done = Arc::new(SemaphoreLite::new());
        self.push_control(Command::Sync { done: done.clone() });
        done.wait_timeout(duration)
    }

    fn drain(&self) -> VecDeque<Command> {
        let mut queue = self.queue.lock();
        queue.buffered_lines = 0;
        std::mem::take(&mut queue.commands)
    }

    fn is_empty(&self) -> bool {
        self.queue.lock().commands.is_empty()
    }
}

struct Listener {
    id: u64,
    sender: mpsc::Sender<String>,
}

/// Single-threaded owner of the two rotating log files. All file mutation
/// happens here, which is what makes the rest of the crate lock-free
/// around file state.
pub(crate) struct BackgroundLogger {
    channel: Arc<LogChannel>,
    log_dir: PathBuf,
    cache_dir: PathBuf,
    rotation_max_bytes: u64,
    rotate_callback: RotateCallback,
    reporter: Arc<dyn ErrorReporter>,

    writer: Option<BufWriter<File>>,
    /// Index of the active slot: 0 => Data.log, 1 => Data1.log.
    active: usize,
    active_len: u64,
    listeners: Vec<Listener>,
    instance: usize,
    temp_counter: u64,
}

impl BackgroundLogger {
    pub(crate) fn spawn(
        channel: Arc<LogChannel>,
        log_dir: PathBuf,
        cache_dir: PathBuf,
        rotation_max_bytes: u64,
        rotate_callback: RotateCallback,
        reporter: Arc<dyn ErrorReporter>,
    ) {
        let instance = INSTANCE_COUNTER.fetch_add(1, Ordering::SeqCst);
        let spawn_reporter = reporter.clone();
        let result = thread::Builder::new()
            .name(format!("vpnlog-{instance}"))
            .spawn(move || {
                let mut logger = BackgroundLogger {
                    channel,
                    log_dir,
                    cache_dir,
                    rotation_max_bytes,
                    rotate_callback,
                    reporter,
                    writer: None,
                    active: 0,
                    active_len: 0,
                    listeners: Vec::new(),
                    instance,
                    temp_counter: 0,
                };
                logger.run();
            });
        if let Err(e) = result {
            spawn_reporter.report("Unable to spawn log processor thread", &e);
        }
    }

    fn run(&mut self) {
        self.initialize();
        self.clear_upload_temp_dir();

        loop {
            let commands = self.channel.drain();
            for command in commands {
                self.handle(command);
            }
            self.flush();

            if self.channel.closed.load(Ordering::SeqCst) && self.channel.is_empty() {
                return;
            }
            if self.channel.is_empty() {
                self.channel.semaphore.wait();
            }
        }
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Line(line) => self.append(&line),
            Command::BlockingLine { line, done } => {
                self.append(&line);
                self.flush();
                done.signal();
            }
            Command::Sync { done } => {
                self.flush();
                done.signal();
            }
            Command::Export { reply } => {
                let _ = reply.send(self.export());
            }
            Command::ClearExport { files } => self.clear_upload_temp_files(&files),
            Command::Attach { id, sender } => self.attach(id, sender),
            Command::Detach { id } => self.listeners.retain(|l| l.id != id),
        }
    }

    /// Opens the active slot. With both slots present the more recently
    /// modified one stays active, so an app restart keeps appending where
    /// it left off.
    fn initialize(&mut self) {
        if let Err(e) = fs::create_dir_all(&self.log_dir) {
            self.reporter.report("Unable to create log directory", &e);
            return;
        }
        let modified_0 = modified_time(&self.slot_path(0));
        let modified_1 = modified_time(&self.slot_path(1));
        self.active = match (modified_0, modified_1) {
            (Some(a), Some(b)) if b > a => 1,
            (None, Some(_)) => 1,
            _ => 0,
        };

        let path = self.slot_path(self.active);
        match OpenOptions::new().create(true).append(true).open(&path) {
            Ok(file) => {
                self.active_len = file.metadata().map(|m| m.len()).unwrap_or(0);
                self.writer = Some(BufWriter::new(file));
            }
            Err(e) => self.reporter.report("Unable to open active log file", &e),
        }
    }

    fn slot_path(&self, slot: usize) -> PathBuf {
        let name = if slot == 0 { FILE_NAME } else { FILE_NAME_2 };
        self.log_dir.join(name)
    }

    /// Both log files, oldest first, skipping slots that do not exist yet.
    fn files_oldest_first(&self) -> Vec<PathBuf> {
        let first = self.log_dir.join(FILE_NAME);
        let second = self.log_dir.join(FILE_NAME_2);
        let mut files = Vec::with_capacity(2);
        let both = first.exists() && second.exists();
        if both && modified_time(&first) < modified_time(&second) {
            files.push(first);
            files.push(second);
        } else {
            if second.exists() {
                files.push(second);
            }
            if first.exists() {
                files.push(first);
            }
        }
        files
    }

    fn append(&mut self, line: &str) {
        self.write_line(line);
        if self.active_len > self.rotation_max_bytes {
            self.rotate();
        }
    }

    /// Appends one line to the active file and forwards it to live-tail
    /// listeners. Never triggers rotation; `append` does that.
    fn write_line(&mut self, line: &str) {
        if let Some(writer) = self.writer.as_mut() {
            let result = writer
                .write_all(line.as_bytes())
                .and_then(|()| writer.write_all(b"\n"));
            match result {
                Ok(()) => self.active_len += line.len() as u64 + 1,
                Err(e) => self.reporter.report("Unable to append to log file", &e),
            }
        }

        self.listeners
            .retain(|listener| listener.sender.send(line.to_string()).is_ok());
    }

    /// Swaps the two slots: the current file becomes the backup, the
    /// other slot is truncated and becomes active, and the rotation
    /// callback's lines open the new generation.
    fn rotate(&mut self) {
        self.flush();
        let next = 1 - self.active;
        let path = self.slot_path(next);
        match File::create(&path) {
            Ok(file) => {
                self.writer = Some(BufWriter::new(file));
                self.active = next;
                self.active_len = 0;
            }
            Err(e) => {
                self.reporter.report("Unable to open rotation slot", &e);
                return;
            }
        }

        let header_lines = (self.rotate_callback)();
        for line in &header_lines {
            self.write_line(line);
        }
    }

    fn flush(&mut self) {
        if let Some(writer) = self.writer.as_mut() {
            if let Err(e) = writer.flush() {
                self.reporter.report("Unable to flush log file", &e);
            }
        }
    }

    /// Copies both files into the upload temp directory so they can be
    /// attached to a bug report while the originals keep growing. The
    /// only operation in this module that fails visibly.
    fn export(&mut self) -> Result<Vec<LogFile>> {
        self.flush();
        let temp_dir = self.cache_dir.join(UPLOAD_TEMP_DIR);
        fs::create_dir_all(&temp_dir)
            .map_err(|e| LoggerError::io("Unable to create upload temp directory", &temp_dir, e))?;

        let mut copies = Vec::with_capacity(2);
        for path in self.files_oldest_first() {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| FILE_NAME.to_string());
            self.temp_counter += 1;
            let temp_path =
                temp_dir.join(format!("{name}.{}.{}.tmp", self.instance, self.temp_counter));
            fs::copy(&path, &temp_path)
                .map_err(|e| LoggerError::io("Unable to copy log file for upload", &path, e))?;
            copies.push(LogFile {
                name,
                path: temp_path,
            });
        }
        Ok(copies)
    }

    /// Deletes only the given copies; missing files are fine, so calling
    /// this twice is a no-op.
    fn clear_upload_temp_files(&self, files: &[LogFile]) {
        for file in files {
            if let Err(e) = fs::remove_file(&file.path) {
                if e.kind() != ErrorKind::NotFound {
                    self.reporter
                        .report("Unable to clear temporary upload log file", &e);
                }
            }
        }
    }

    /// Removes leftovers of a prior run that crashed mid-upload.
    fn clear_upload_temp_dir(&self) {
        let temp_dir = self.cache_dir.join(UPLOAD_TEMP_DIR);
        if let Err(e) = fs::remove_dir_all(&temp_dir) {
            if e.kind() != ErrorKind::NotFound {
                self.reporter
                    .report("Unable to clear temporary upload log files", &e);
            }
        }
    }

    /// Replays both files oldest-first into the listener, then registers
    /// it for live lines. Replay and registration happen on this thread,
    /// between commands, so a line is delivered exactly once: either from
    /// the file or live, never both.
    fn attach(&mut self, id: u64, sender: mpsc::Sender<String>) {
        self.flush();
        for path in self.files_oldest_first() {
            let file = match File::open(&path) {
                Ok(file) => file,
                Err(e) => {
                    self.reporter.report("Unable to read log file for tail", &e);
                    continue;
                }
            };
            for line in BufReader::new(file).lines() {
                match line {
                    Ok(line) => {
                        if sender.send(line).is_err() {
                            // Consumer already gone.
                            return;
                        }
                    }
                    Err(e) => {
                        self.reporter.report("Unable to read log file for tail", &e);
                        break;
                    }
                }
            }
        }
        self.listeners.push(Listener { id, sender });
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|m| m.modified()).ok()
}
