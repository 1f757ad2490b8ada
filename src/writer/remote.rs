use std::sync::Arc;

use crate::category::LogCategory;
use crate::entry::LogData;
use crate::level::LogLevel;
use crate::scrub::{Scrubber, UserIdentitySource};
use crate::writer::LogWriter;

/// Breadcrumbs are short; anything longer is cut before leaving the device.
const BREADCRUMB_MAX_LEN: usize = 200;

/// Receives scrubbed breadcrumbs, typically backed by a crash-monitoring
/// SDK. The transport itself lives outside this crate.
pub trait BreadcrumbSink: Send + Sync {
    fn add_breadcrumb(&self, level: LogLevel, category: &str, message: &str);
}

/// Forwards entries to an external monitoring collector as breadcrumbs.
///
/// Low-severity entries and raw protocol traces never leave the device;
/// everything else is scrubbed of user-identifying text first.
pub struct RemoteLogWriter {
    sink: Arc<dyn BreadcrumbSink>,
    identity_source: Arc<dyn UserIdentitySource>,
    scrubber: Scrubber,
}

impl RemoteLogWriter {
    pub fn new(sink: Arc<dyn BreadcrumbSink>, identity_source: Arc<dyn UserIdentitySource>) -> Self {
        Self {
            sink,
            identity_source,
            scrubber: Scrubber::new(BREADCRUMB_MAX_LEN),
        }
    }
}

impl LogWriter for RemoteLogWriter {
    fn write(&self, entry: &LogData) {
        if entry.level <= LogLevel::Debug || entry.category == LogCategory::Protocol {
            return;
        }

        let identity = self.identity_source.cached_identity();
        let message = self.scrubber.scrub(&entry.message, identity.as_ref());
        let category = match entry.event_name {
            Some(event) => format!("{}:{event}", entry.category.to_log()),
            None => entry.category.to_log().to_string(),
        };
        self.sink.add_breadcrumb(entry.level, &category, &message);
    }
}
