//! In-memory capture of tracing events for tests.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::span::{Attributes, Id};
use tracing::subscriber::DefaultGuard;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;

/// One recorded event.
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    /// Event level.
    pub level: Level,
    /// Module target.
    pub target: String,
    /// The `message` field.
    pub message: String,
    /// Remaining fields, formatted.
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    /// Value of a named field, if recorded.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Shared handle to everything captured so far.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
    spans: Arc<Mutex<Vec<String>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl CapturedLogs {
    /// Snapshot of recorded events.
    pub fn events(&self) -> Vec<CapturedEvent> {
        lock(&self.events).clone()
    }

    /// Events at `level` whose message contains `needle`.
    pub fn find(&self, level: Level, needle: &str) -> Vec<CapturedEvent> {
        lock(&self.events)
            .iter()
            .filter(|e| e.level == level && e.message.contains(needle))
            .cloned()
            .collect()
    }

    /// Whether any event at `level` mentions `needle`.
    pub fn has_event(&self, level: Level, needle: &str) -> bool {
        !self.find(level, needle).is_empty()
    }

    /// Number of events at `level`.
    pub fn count_at_level(&self, level: Level) -> usize {
        lock(&self.events).iter().filter(|e| e.level == level).count()
    }

    /// Whether a span named `name` was created.
    pub fn has_span(&self, name: &str) -> bool {
        lock(&self.spans).iter().any(|s| s == name)
    }
}

#[derive(Default)]
struct Recorded {
    message: String,
    fields: Vec<(String, String)>,
}

impl Recorded {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name().to_owned(), value));
        }
    }
}

impl Visit for Recorded {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

struct CaptureLayer {
    logs: CapturedLogs,
}

impl<S: Subscriber> Layer<S> for CaptureLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = Recorded::default();
        event.record(&mut visitor);
        let meta = event.metadata();
        lock(&self.logs.events).push(CapturedEvent {
            level: *meta.level(),
            target: meta.target().to_owned(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }

    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        lock(&self.logs.spans).push(attrs.metadata().name().to_owned());
    }
}

/// Capture every event on the current thread until the guard drops.
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let guard = tracing_subscriber::registry()
        .with(CaptureLayer { logs: logs.clone() })
        .with(LevelFilter::TRACE)
        .set_default();
    (logs, guard)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn captures_message_and_fields() {
        let (logs, _guard) = capture_logs();
        tracing::warn!(request_id = "req_1", kind = "invalid_path", "hook failed");

        let found = logs.find(Level::WARN, "hook failed");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].field("request_id"), Some("req_1"));
        assert_eq!(found[0].field("kind"), Some("invalid_path"));
    }

    #[test]
    fn counts_by_level_and_records_spans() {
        let (logs, _guard) = capture_logs();
        let span = tracing::info_span!("stage");
        let _entered = span.enter();
        tracing::debug!("one");
        tracing::debug!("two");
        tracing::info!("three");

        assert_eq!(logs.count_at_level(Level::DEBUG), 2);
        assert_eq!(logs.count_at_level(Level::INFO), 1);
        assert!(logs.has_span("stage"));
        assert!(!logs.has_event(Level::WARN, "one"));
    }
}
