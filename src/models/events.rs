//! Capture events for audit and observability.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Shared event metadata.
#[derive(Debug, Clone)]
pub struct EventMeta {
    /// Unique identifier for this event.
    pub event_id: String,
    /// Emitting component.
    pub source: &'static str,
    /// When the event was emitted.
    pub timestamp: DateTime<Utc>,
}

impl EventMeta {
    /// Creates new event metadata stamped with the current time.
    #[must_use]
    pub fn new(source: &'static str) -> Self {
        Self {
            event_id: Uuid::new_v4().to_string(),
            source,
            timestamp: Utc::now(),
        }
    }
}

/// Events emitted by the capture pipeline.
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    /// A record was captured and stored.
    Captured {
        /// Event metadata.
        meta: EventMeta,
        /// Whether the record needed repair before storage.
        repaired: bool,
        /// Fields the validator reported absent or malformed.
        missing: Vec<String>,
    },
    /// An artifact was exported.
    Exported {
        /// Event metadata.
        meta: EventMeta,
        /// Artifact name.
        artifact: String,
    },
    /// An export attempt failed.
    ExportFailed {
        /// Event metadata.
        meta: EventMeta,
        /// Human-readable failure reason.
        reason: String,
    },
}

impl CaptureEvent {
    /// Returns the event type name.
    #[must_use]
    pub const fn event_type(&self) -> &'static str {
        match self {
            Self::Captured { .. } => "captured",
            Self::Exported { .. } => "exported",
            Self::ExportFailed { .. } => "export_failed",
        }
    }

    /// Returns the event metadata.
    #[must_use]
    pub const fn meta(&self) -> &EventMeta {
        match self {
            Self::Captured { meta, .. }
            | Self::Exported { meta, .. }
            | Self::ExportFailed { meta, .. } => meta,
        }
    }
}

/// Receives pipeline events for diagnostics.
///
/// Implementations must not fail back into the pipeline; they are purely
/// observational.
pub trait CaptureObserver {
    /// Called for every event the pipeline emits.
    fn on_event(&mut self, event: &CaptureEvent);
}
