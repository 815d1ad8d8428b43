use std::sync::Mutex;

use crate::trace::{Direction, Explanation, TraceSink};

#[derive(Debug, Default, Clone, Copy)]
pub struct NullTrace;

impl TraceSink for NullTrace {
    fn on_message(&self, _direction: Direction, _label: &str, _bytes: &[u8]) {}
    fn explain(&self, _explanation: &Explanation) {}
}

// Emits every event through `tracing` at debug level, payloads hex-encoded.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogTrace;

impl TraceSink for LogTrace {
    fn on_message(&self, direction: Direction, label: &str, bytes: &[u8]) {
        tracing::debug!(len = bytes.len(), payload = %hex::encode(bytes), "{} {}", direction.arrow(), label);
    }

    fn explain(&self, explanation: &Explanation) {
        tracing::debug!("{}", explanation.title);
        for (label, value) in &explanation.entries {
            tracing::debug!(len = value.len(), value = %hex::encode(value), "  {}", label);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Message { direction: Direction, label: String, bytes: Vec<u8> },
    Explanation(Explanation),
}

// Keeps every event in memory for later rendering or inspection.
#[derive(Debug, Default)]
pub struct RecordingTrace {
    events: Mutex<Vec<TraceEvent>>,
}

impl RecordingTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.lock().clone()
    }

    pub fn explanation(&self, title: &str) -> Option<Explanation> {
        self.lock().iter().find_map(|e| match e {
            TraceEvent::Explanation(x) if x.title == title => Some(x.clone()),
            _ => None,
        })
    }

    pub fn message_labels(&self, direction: Direction) -> Vec<String> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                TraceEvent::Message { direction: d, label, .. } if *d == direction => Some(label.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<TraceEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TraceSink for RecordingTrace {
    fn on_message(&self, direction: Direction, label: &str, bytes: &[u8]) {
        self.lock().push(TraceEvent::Message { direction, label: label.to_string(), bytes: bytes.to_vec() });
    }

    fn explain(&self, explanation: &Explanation) {
        self.lock().push(TraceEvent::Explanation(explanation.clone()));
    }
}
