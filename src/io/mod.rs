//! Artifact export: encoding and delivery.

mod export;
mod sink;

pub use export::{ExportError, ExportOptions, Exporter, artifact_name};
pub use sink::{BufferSink, ExportSink, FileSink};
