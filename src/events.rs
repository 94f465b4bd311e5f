//! Ingestion events and the sinks that receive them.
//!
//! Sinks are constructed by the caller and passed to the pipeline; there is
//! no process-wide buffer.

use std::path::PathBuf;
use std::sync::Mutex;

use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq)]
pub enum IngestEvent {
    SourceStarted {
        currency: String,
        provider: &'static str,
    },
    SourceSucceeded {
        currency: String,
        years: usize,
        earliest: i32,
        latest: i32,
    },
    SourceFailed {
        currency: String,
        provider: &'static str,
        reason: String,
    },
    RecordWritten {
        currency: String,
        path: PathBuf,
    },
}

pub trait EventSink: Send + Sync {
    fn record(&self, event: &IngestEvent);

    /// Called once the run is complete.
    fn flush(&self) {}
}

/// Emits each event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &IngestEvent) {
        match event {
            IngestEvent::SourceStarted { currency, provider } => {
                info!(currency = %currency, provider, "source started");
            }
            IngestEvent::SourceSucceeded {
                currency,
                years,
                earliest,
                latest,
            } => {
                info!(currency = %currency, years, earliest, latest, "source normalized");
            }
            IngestEvent::SourceFailed {
                currency,
                provider,
                reason,
            } => {
                warn!(currency = %currency, provider, reason = %reason, "source failed");
            }
            IngestEvent::RecordWritten { currency, path } => {
                info!(currency = %currency, path = %path.display(), "record written");
            }
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<IngestEvent>>,
}

impl MemorySink {
    pub fn events(&self) -> Vec<IngestEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl EventSink for MemorySink {
    fn record(&self, event: &IngestEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}
