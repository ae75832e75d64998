//! Tracing event capture.
//!
//! [`LogCapture`] is a `tracing-subscriber` layer that keeps every event it
//! sees, so tests can assert on the diagnostics a call emits.
//!
//! ```rust
//! use kusto_testing::LogCapture;
//! use tracing::Level;
//!
//! let capture = LogCapture::new();
//! tracing::subscriber::with_default(capture.subscriber(), || {
//!     tracing::warn!(attempt = 2, "retrying");
//! });
//!
//! let warnings = capture.at_level(Level::WARN);
//! assert_eq!(warnings[0].message, "retrying");
//! assert_eq!(warnings[0].field("attempt"), Some("2"));
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// One recorded event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedEvent {
    /// Event level.
    pub level: Level,
    /// Event target.
    pub target: String,
    /// Rendered message.
    pub message: String,
    /// Remaining fields in recording order, rendered with `Debug`.
    pub fields: Vec<(String, String)>,
}

impl CapturedEvent {
    /// The rendered value of field `name`.
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Layer that records events.
#[derive(Debug, Clone, Default)]
pub struct LogCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl LogCapture {
    /// Create an empty capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A subscriber that records into this capture, for
    /// `tracing::subscriber::with_default` or `set_default`.
    pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::registry().with(self.clone())
    }

    /// Every event recorded so far.
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events.lock().clone()
    }

    /// Events recorded at exactly `level`.
    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .iter()
            .filter(|event| event.level == level)
            .cloned()
            .collect()
    }
}

impl<S: Subscriber> Layer<S> for LogCapture {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut visitor = FieldVisitor::default();
        event.record(&mut visitor);

        let metadata = event.metadata();
        self.events.lock().push(CapturedEvent {
            level: *metadata.level(),
            target: metadata.target().to_string(),
            message: visitor.message,
            fields: visitor.fields,
        });
    }
}

#[derive(Default)]
struct FieldVisitor {
    message: String,
    fields: Vec<(String, String)>,
}

impl FieldVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = value;
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for FieldVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.push(field, format!("{value:?}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_level_target_and_fields() {
        let capture = LogCapture::new();
        tracing::subscriber::with_default(capture.subscriber(), || {
            tracing::debug!(
                target: "capture::test",
                method = %"azure-cli",
                "Using {} authentication",
                "Azure CLI"
            );
            tracing::error!(name = "value", "failed");
        });

        let events = capture.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].level, Level::DEBUG);
        assert_eq!(events[0].target, "capture::test");
        assert_eq!(events[0].message, "Using Azure CLI authentication");
        assert_eq!(events[0].field("method"), Some("azure-cli"));
        assert_eq!(events[1].field("name"), Some("value"));
        assert_eq!(capture.at_level(Level::ERROR).len(), 1);
    }

    #[test]
    fn test_events_outside_subscriber_are_not_recorded() {
        let capture = LogCapture::new();
        tracing::info!("not captured");
        assert!(capture.events().is_empty());
    }
}
