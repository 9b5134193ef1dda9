#![forbid(unsafe_code)]

//! Tracing capture for asserting on log output.
//!
//! ```rust,ignore
//! let (_, logs) = with_captured_tracing(|| tour.prevent_move());
//! assert_eq!(logs.warnings("waymark.tour").len(), 1);
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

/// A captured span.
#[derive(Debug, Clone)]
pub struct CapturedSpan {
    pub name: String,
    pub fields: HashMap<String, String>,
}

/// A captured event.
#[derive(Debug, Clone)]
pub struct CapturedEvent {
    pub level: tracing::Level,
    pub target: String,
    pub fields: HashMap<String, String>,
}

impl CapturedEvent {
    /// The formatted message, if any.
    pub fn message(&self) -> &str {
        self.fields.get("message").map_or("", String::as_str)
    }
}

type Shared<T> = Arc<Mutex<Vec<T>>>;

struct SpanCapture {
    spans: Shared<CapturedSpan>,
    events: Shared<CapturedEvent>,
}

/// Read side of a capture.
#[derive(Debug, Clone)]
pub struct CaptureHandle {
    spans: Shared<CapturedSpan>,
    events: Shared<CapturedEvent>,
}

impl CaptureHandle {
    pub fn spans(&self) -> Vec<CapturedSpan> {
        self.spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn events(&self) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Events at `level` with the given target.
    pub fn at(&self, level: tracing::Level, target: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|event| event.level == level && event.target == target)
            .collect()
    }

    pub fn warnings(&self, target: &str) -> Vec<CapturedEvent> {
        self.at(tracing::Level::WARN, target)
    }

    pub fn errors(&self, target: &str) -> Vec<CapturedEvent> {
        self.at(tracing::Level::ERROR, target)
    }

    /// Whether any event message contains `needle`.
    pub fn mentions(&self, needle: &str) -> bool {
        self.events()
            .iter()
            .any(|event| event.message().contains(needle))
    }
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }
    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_i64(&mut self, field: &tracing::field::Field, value: i64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for SpanCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut visitor = FieldVisitor(Vec::new());
        attrs.record(&mut visitor);
        self.spans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedSpan {
                name: attrs.metadata().name().to_string(),
                fields: visitor.0.into_iter().collect(),
            });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(CapturedEvent {
                level: *event.metadata().level(),
                target: event.metadata().target().to_string(),
                fields: visitor.0.into_iter().collect(),
            });
    }
}

/// Run `f` with a capturing subscriber installed for the current thread.
pub fn with_captured_tracing<F, R>(f: F) -> (R, CaptureHandle)
where
    F: FnOnce() -> R,
{
    let spans = Arc::new(Mutex::new(Vec::new()));
    let events = Arc::new(Mutex::new(Vec::new()));
    let handle = CaptureHandle {
        spans: Arc::clone(&spans),
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(SpanCapture { spans, events });
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, handle)
}
