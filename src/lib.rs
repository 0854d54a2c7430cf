//! # Promptscope
//!
//! A capture and export sidecar for chat application prompt structures.
//!
//! Promptscope observes a host's "prompt ready" events, takes a defensive
//! snapshot of the assembled prompt structure, validates and repairs its
//! shape, and exports it to a JSON artifact on demand or automatically.
//!
//! ## Features
//!
//! - Total safe copy of arbitrary host values (cycles, map/set-likes,
//!   dates, patterns, callables, errors) into serializable snapshots
//! - Structural validation with field-qualified diagnostics
//! - Self-healing repair of partially-malformed records
//! - Single-slot capture store with unique, timestamped artifact naming
//! - Two inbound paths: a JSON hook handler and an in-process interception
//!   port
//!
//! ## Example
//!
//! ```rust,ignore
//! use promptscope::{CapturePipeline, CaptureStore, FileSink, PromptScopeConfig};
//! use std::sync::Arc;
//!
//! let config = PromptScopeConfig::load_default();
//! let store = Arc::new(CaptureStore::new());
//! let sink = Box::new(FileSink::new(&config.output_dir));
//! let mut pipeline = CapturePipeline::new(config, store, sink);
//!
//! let outcome = pipeline.handle_prompt_ready(&value);
//! let artifact = pipeline.export_now()?;
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

use thiserror::Error as ThisError;

// Module declarations
pub mod capture;
pub mod config;
pub mod hooks;
pub mod io;
pub mod models;
pub mod observability;
pub mod services;

// Re-exports for convenience
pub use capture::{Capture, CaptureStore, SafeCopy, ValidationReport, repair, validate};
pub use config::PromptScopeConfig;
pub use hooks::{HookHandler, InterceptionPort, PromptReadyHandler};
pub use io::{BufferSink, ExportError, ExportOptions, ExportSink, Exporter, FileSink};
pub use models::{CaptureEvent, ChatTurn, HostValue, Snapshot};
pub use services::{CaptureOutcome, CapturePipeline, PromptObserver};

/// Error type for promptscope operations.
///
/// Uses `thiserror` for automatic `Display` and `Error` trait
/// implementations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Malformed CLI input, unreadable capture payloads |
/// | `OperationFailed` | Filesystem I/O errors, config parse failures |
/// | `Export` | The exporter's own failure taxonomy |
///
/// The capture path itself never raises: safe copy recovers internally,
/// validation returns a report, and repair cannot fail by design.
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    ///
    /// Raised when:
    /// - Filesystem I/O errors occur
    /// - The config file cannot be read or parsed
    /// - A hook response cannot be encoded
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// An export failed. See [`ExportError`] for the cases.
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Result type alias for promptscope operations.
pub type Result<T> = std::result::Result<T, Error>;
