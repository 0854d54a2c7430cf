//! Single-slot capture storage.

use crate::models::Snapshot;
use chrono::{DateTime, Utc};
use std::sync::{Mutex, MutexGuard, PoisonError};

/// A stored capture: the record plus the time it was taken.
#[derive(Debug, Clone)]
pub struct Capture {
    /// The captured, possibly repaired, record.
    pub record: Snapshot,
    /// When the capture happened. Also names the export artifact.
    pub captured_at: DateTime<Utc>,
}

/// Outcome of the most recent successful export.
#[derive(Debug, Clone)]
pub struct ExportStatus {
    /// Name of the exported artifact.
    pub artifact: String,
    /// When the export completed.
    pub exported_at: DateTime<Utc>,
}

/// Holds at most one capture at a time, plus the export sequence counter.
///
/// A new capture unconditionally replaces the previous one. The counter is
/// monotonic for the lifetime of the process and never reused, so default
/// artifact names stay unique even for captures with identical timestamps.
/// State is process-scoped and in-memory only.
///
/// The pipeline itself is single-threaded, but the store guards its slot
/// and counter with a mutex so embedding it in a concurrent host preserves
/// last-write-wins semantics and counter uniqueness.
#[derive(Debug, Default)]
pub struct CaptureStore {
    inner: Mutex<StoreInner>,
}

#[derive(Debug, Default)]
struct StoreInner {
    current: Option<Capture>,
    sequence: u64,
    last_export: Option<ExportStatus>,
}

impl CaptureStore {
    /// Creates an empty store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(StoreInner {
                current: None,
                sequence: 0,
                last_export: None,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Stores a record as the current capture, stamped with the current
    /// time, replacing any previous capture.
    pub fn put(&self, record: Snapshot) {
        self.put_at(record, Utc::now());
    }

    /// Stores a record with an explicit capture time.
    pub fn put_at(&self, record: Snapshot, captured_at: DateTime<Utc>) {
        self.lock().current = Some(Capture {
            record,
            captured_at,
        });
    }

    /// Returns a copy of the current capture, if any.
    #[must_use]
    pub fn get(&self) -> Option<Capture> {
        self.lock().current.clone()
    }

    /// Returns whether a capture is currently held.
    #[must_use]
    pub fn has_capture(&self) -> bool {
        self.lock().current.is_some()
    }

    /// Returns the next export sequence number, starting at 0.
    pub fn next_export_sequence(&self) -> u64 {
        let mut inner = self.lock();
        let sequence = inner.sequence;
        inner.sequence += 1;
        sequence
    }

    /// Records the outcome of a successful export.
    pub fn record_export(&self, status: ExportStatus) {
        self.lock().last_export = Some(status);
    }

    /// Returns the most recent successful export, if any.
    #[must_use]
    pub fn last_export(&self) -> Option<ExportStatus> {
        self.lock().last_export.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_store() {
        let store = CaptureStore::new();
        assert!(store.get().is_none());
        assert!(!store.has_capture());
        assert!(store.last_export().is_none());
    }

    #[test]
    fn test_last_write_wins() {
        let store = CaptureStore::new();
        store.put(Snapshot::Text("first".to_string()));
        store.put(Snapshot::Text("second".to_string()));

        let capture = store.get().unwrap();
        assert_eq!(capture.record, Snapshot::Text("second".to_string()));
    }

    #[test]
    fn test_sequence_monotonic_from_zero() {
        let store = CaptureStore::new();
        let values: Vec<u64> = (0..5).map(|_| store.next_export_sequence()).collect();
        assert_eq!(values, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_export_status_recorded() {
        let store = CaptureStore::new();
        store.record_export(ExportStatus {
            artifact: "prompt_struct_0_x.json".to_string(),
            exported_at: Utc::now(),
        });
        assert_eq!(
            store.last_export().map(|s| s.artifact),
            Some("prompt_struct_0_x.json".to_string())
        );
    }
}
