use std::fmt::Write as _;
use std::panic::Location;

use chrono::{DateTime, Local, SecondsFormat, Utc};

use crate::category::LogCategory;
use crate::level::LogLevel;

/// Call-site location, captured explicitly at the facade entry points via
/// `#[track_caller]`. Replaces runtime stack walking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub file: &'static str,
    pub line: u32,
}

impl SourceLocation {
    #[track_caller]
    pub fn capture() -> Self {
        let loc = Location::caller();
        Self {
            file: loc.file(),
            line: loc.line(),
        }
    }
}

/// One log call. Created per call, never mutated, consumed independently
/// by each writer.
#[derive(Debug, Clone)]
pub struct LogData {
    /// Preformatted ISO-8601 UTC timestamp, see [`format_time`].
    pub timestamp: String,
    pub level: LogLevel,
    pub category: LogCategory,
    pub event_name: Option<&'static str>,
    pub message: String,
    /// Whether the caller wants persistence acknowledged before returning.
    pub blocking: bool,
    pub location: Option<SourceLocation>,
}

impl LogData {
    /// Formats the entry into a single line:
    /// `<ts> | <LEVEL> | <category>[:<event>] | <message>`.
    ///
    /// Continuation lines of a multi-line message are indented by one
    /// space; there is no trailing newline.
    pub fn format_line(&self) -> String {
        let mut line = String::with_capacity(self.message.len() + 64);
        let _ = write!(
            line,
            "{} | {:<5} | {}",
            self.timestamp, self.level, self.category
        );
        if let Some(event) = self.event_name {
            let _ = write!(line, ":{event}");
        }
        let _ = write!(line, " | {}", multi_line(&self.message));
        line
    }
}

/// Indents every line after the first so continuation lines stay visually
/// grouped under the entry.
pub(crate) fn multi_line(message: &str) -> String {
    message.replace('\n', "\n ")
}

/// Formats milliseconds since the Unix epoch as ISO-8601 UTC with
/// millisecond precision, e.g. `2024-03-01T12:30:00.000Z`.
pub fn format_time(time_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(time_ms)
        .unwrap_or_default()
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Rewrites a stored line's leading UTC timestamp into local wall time for
/// display. Lines that do not start with a parseable timestamp are
/// returned unchanged.
pub fn format_line_for_display(line: &str) -> String {
    let Some((timestamp, rest)) = line.split_once(" | ") else {
        return line.to_string();
    };
    match DateTime::parse_from_rfc3339(timestamp) {
        Ok(parsed) => {
            let local = parsed.with_timezone(&Local);
            format!("{} | {rest}", local.format("%H:%M:%S%.3f"))
        }
        Err(_) => line.to_string(),
    }
}
