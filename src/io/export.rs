//! Artifact export.

use crate::capture::{CaptureStore, ExportStatus};
use crate::io::sink::ExportSink;
use chrono::{DateTime, SecondsFormat, Utc};
use tracing::{info, warn};

/// Ways an export can fail, surfaced to the caller as short messages.
#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    /// The store holds no capture yet.
    #[error("no capture available; trigger a prompt first")]
    NoCaptureAvailable,

    /// JSON encoding failed. Snapshots are built to always serialize, so
    /// this is handled defensively rather than expected.
    #[error("failed to serialize capture: {cause}")]
    Serialization {
        /// The underlying cause.
        cause: String,
    },

    /// The sink rejected the artifact.
    #[error("failed to deliver artifact '{name}': {cause}")]
    Sink {
        /// Artifact name that failed to deliver.
        name: String,
        /// The underlying cause.
        cause: String,
    },
}

/// Options controlling artifact encoding.
#[derive(Debug, Clone, Copy)]
pub struct ExportOptions {
    /// Pretty-print with 2-space indentation instead of compact output.
    pub pretty_print: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self { pretty_print: true }
    }
}

/// Builds the default artifact name for a capture.
///
/// `prompt_struct_<sequence>_<timestamp>.json`, where the timestamp is the
/// capture time in ISO-8601 with the filename-unsafe `:` and `.` replaced
/// by `-`.
#[must_use]
pub fn artifact_name(sequence: u64, captured_at: DateTime<Utc>) -> String {
    let timestamp = captured_at
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("prompt_struct_{sequence}_{timestamp}.json")
}

/// Serializes the current capture and hands it to the sink.
///
/// One invocation is one terminal attempt: it completes or fails
/// synchronously, and there is no retry; the caller may simply invoke
/// again.
pub struct Exporter {
    sink: Box<dyn ExportSink>,
    options: ExportOptions,
}

impl Exporter {
    /// Creates an exporter delivering through the given sink.
    #[must_use]
    pub fn new(sink: Box<dyn ExportSink>) -> Self {
        Self {
            sink,
            options: ExportOptions::default(),
        }
    }

    /// Sets the encoding options.
    #[must_use]
    pub const fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    /// Exports the store's current capture.
    ///
    /// Consumes one sequence number per attempt on a present capture, so a
    /// failed delivery never reuses a name.
    ///
    /// # Errors
    ///
    /// [`ExportError::NoCaptureAvailable`] when the store is empty,
    /// [`ExportError::Serialization`] when encoding fails, and
    /// [`ExportError::Sink`] when the sink rejects the artifact.
    pub fn export(&mut self, store: &CaptureStore) -> Result<String, ExportError> {
        let capture = store.get().ok_or(ExportError::NoCaptureAvailable)?;
        let sequence = store.next_export_sequence();
        let name = artifact_name(sequence, capture.captured_at);

        let bytes = if self.options.pretty_print {
            serde_json::to_vec_pretty(&capture.record)
        } else {
            serde_json::to_vec(&capture.record)
        }
        .map_err(|e| ExportError::Serialization {
            cause: e.to_string(),
        })?;

        self.sink
            .deliver(&name, &bytes)
            .map_err(|e| ExportError::Sink {
                name: name.clone(),
                cause: e.to_string(),
            })
            .inspect_err(|e| warn!(error = %e, "export failed"))?;

        store.record_export(ExportStatus {
            artifact: name.clone(),
            exported_at: Utc::now(),
        });
        info!(artifact = %name, bytes = bytes.len(), "exported capture");
        Ok(name)
    }
}
