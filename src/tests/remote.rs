use std::sync::Arc;

use parking_lot::Mutex;

use crate::entry::LogData;
use crate::scrub::{UserIdentity, UserIdentitySource};
use crate::writer::remote::{BreadcrumbSink, RemoteLogWriter};
use crate::writer::LogWriter;
use crate::{LogCategory, LogLevel};

#[derive(Default)]
struct RecordingSink {
    breadcrumbs: Mutex<Vec<(LogLevel, String, String)>>,
}

impl BreadcrumbSink for RecordingSink {
    fn add_breadcrumb(&self, level: LogLevel, category: &str, message: &str) {
        self.breadcrumbs
            .lock()
            .push((level, category.to_string(), message.to_string()));
    }
}

struct StaleIdentity;

impl UserIdentitySource for StaleIdentity {
    fn cached_identity(&self) -> Option<UserIdentity> {
        Some(UserIdentity {
            display_name: None,
            username: None,
            email: Some("jamie@example.com".to_string()),
        })
    }
}

struct NoIdentity;

impl UserIdentitySource for NoIdentity {
    fn cached_identity(&self) -> Option<UserIdentity> {
        None
    }
}

fn entry(level: LogLevel, category: LogCategory, message: &str) -> LogData {
    LogData {
        timestamp: "2024-03-01T12:30:00.000Z".to_string(),
        level,
        category,
        event_name: Some("status"),
        message: message.to_string(),
        blocking: false,
        location: None,
    }
}

#[test]
fn test_forwards_scrubbed_breadcrumb() {
    let sink = Arc::new(RecordingSink::default());
    let writer = RemoteLogWriter::new(sink.clone(), Arc::new(StaleIdentity));

    writer.write(&entry(
        LogLevel::Warn,
        LogCategory::Conn,
        "jamie@example.com lost 185.159.157.12",
    ));

    let breadcrumbs = sink.breadcrumbs.lock();
    assert_eq!(breadcrumbs.len(), 1);
    let (level, category, message) = &breadcrumbs[0];
    assert_eq!(*level, LogLevel::Warn);
    assert_eq!(category, "conn:status");
    assert!(!message.contains("jamie@example.com"));
    assert!(!message.contains("185.159.157.12"));
}

#[test]
fn test_breadcrumb_category_uses_dotted_form() {
    let sink = Arc::new(RecordingSink::default());
    let writer = RemoteLogWriter::new(sink.clone(), Arc::new(NoIdentity));

    writer.write(&entry(LogLevel::Info, LogCategory::ConnConnect, "with event"));

    let mut no_event = entry(LogLevel::Info, LogCategory::ConnConnect, "without event");
    no_event.event_name = None;
    writer.write(&no_event);

    let breadcrumbs = sink.breadcrumbs.lock();
    assert_eq!(breadcrumbs[0].1, "conn.connect:status");
    assert_eq!(breadcrumbs[1].1, "conn.connect");
}

#[test]
fn test_debug_and_below_stay_on_device() {
    let sink = Arc::new(RecordingSink::default());
    let writer = RemoteLogWriter::new(sink.clone(), Arc::new(NoIdentity));

    writer.write(&entry(LogLevel::Debug, LogCategory::Api, "verbose"));
    writer.write(&entry(LogLevel::Trace, LogCategory::Api, "more verbose"));
    assert!(sink.breadcrumbs.lock().is_empty());

    writer.write(&entry(LogLevel::Info, LogCategory::Api, "fine"));
    assert_eq!(sink.breadcrumbs.lock().len(), 1);
}

#[test]
fn test_protocol_traces_never_forwarded() {
    let sink = Arc::new(RecordingSink::default());
    let writer = RemoteLogWriter::new(sink.clone(), Arc::new(NoIdentity));

    writer.write(&entry(
        LogLevel::Error,
        LogCategory::Protocol,
        "handshake bytes",
    ));
    assert!(sink.breadcrumbs.lock().is_empty());
}

#[test]
fn test_long_messages_are_truncated() {
    let sink = Arc::new(RecordingSink::default());
    let writer = RemoteLogWriter::new(sink.clone(), Arc::new(NoIdentity));

    writer.write(&entry(LogLevel::Info, LogCategory::App, &"y".repeat(500)));
    assert_eq!(sink.breadcrumbs.lock()[0].2.len(), 200);
}
