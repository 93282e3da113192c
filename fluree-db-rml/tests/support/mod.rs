//! Shared helpers for fluree-db-rml integration tests.
//!
//! `init_test_tracing()` installs a thread-local subscriber that records span
//! creation and events into a `TraceStore`, so tests can assert on the
//! instrumentation of an evaluation.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use fluree_db_rml::{RawValue, Row, RowSchema};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

/// A span or event recorded by the capture layer.
#[derive(Debug, Clone)]
pub struct Captured {
    pub name: &'static str,
    pub level: tracing::Level,
    pub fields: HashMap<String, String>,
}

#[derive(Debug, Default)]
struct Inner {
    spans: Vec<Captured>,
    events: Vec<Captured>,
}

/// Thread-safe store of captured spans and events.
#[derive(Debug, Clone, Default)]
pub struct TraceStore(Arc<Mutex<Inner>>);

impl TraceStore {
    /// Spans with the given name, in creation order.
    pub fn spans_named(&self, name: &str) -> Vec<Captured> {
        self.0
            .lock()
            .unwrap()
            .spans
            .iter()
            .filter(|s| s.name == name)
            .cloned()
            .collect()
    }

    /// Events at the given level, in emission order.
    pub fn events_at(&self, level: tracing::Level) -> Vec<Captured> {
        self.0
            .lock()
            .unwrap()
            .events
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }
}

struct CaptureLayer {
    store: TraceStore,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        _id: &tracing::span::Id,
        _ctx: Context<'_, S>,
    ) {
        let mut fields = FieldVisitor(HashMap::new());
        attrs.record(&mut fields);
        let meta = attrs.metadata();
        self.store.0.lock().unwrap().spans.push(Captured {
            name: meta.name(),
            level: *meta.level(),
            fields: fields.0,
        });
    }

    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = FieldVisitor(HashMap::new());
        event.record(&mut fields);
        let meta = event.metadata();
        self.store.0.lock().unwrap().events.push(Captured {
            name: meta.name(),
            level: *meta.level(),
            fields: fields.0,
        });
    }
}

struct FieldVisitor(HashMap<String, String>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

/// Install a capturing subscriber for the current thread.
///
/// Hold the returned guard for the duration of the test.
pub fn init_test_tracing() -> (TraceStore, tracing::subscriber::DefaultGuard) {
    let store = TraceStore::default();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer {
        store: store.clone(),
    });
    let guard = tracing::subscriber::set_default(subscriber);
    (store, guard)
}

/// Rows of a small `airlines` table: (id, name, country).
pub fn airline_rows() -> Vec<Row> {
    let schema = Arc::new(RowSchema::new(["id", "name", "country"]));
    let data: Vec<(i64, Option<&str>, Option<&str>)> = vec![
        (1, Some("Air France"), Some("FR")),
        (2, Some("KLM"), Some("NL")),
        (3, None, Some("BE")),
    ];
    data.into_iter()
        .map(|(id, name, country)| {
            Row::new(
                schema.clone(),
                vec![RawValue::Integer(id), name.into(), country.into()],
            )
            .unwrap()
        })
        .collect()
}
