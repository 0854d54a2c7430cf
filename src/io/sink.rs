//! Artifact delivery sinks.
//!
//! The sink is the explicit boundary to the outside world: the exporter
//! builds the artifact bytes, the sink owns the side effect of putting them
//! somewhere. File delivery is the default; tests use the buffer sink.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Delivers finished artifact bytes under a given name.
pub trait ExportSink {
    /// Delivers one artifact.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery fails; the exporter surfaces it as a
    /// sink failure.
    fn deliver(&mut self, name: &str, bytes: &[u8]) -> Result<()>;
}

/// Writes artifacts as files into a directory, creating it on first use.
#[derive(Debug, Clone)]
pub struct FileSink {
    dir: PathBuf,
}

impl FileSink {
    /// Creates a sink writing into `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory artifacts are written into.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ExportSink for FileSink {
    fn deliver(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        // Artifact names are plain file names; anything path-like would
        // escape the output directory.
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(Error::InvalidInput(format!(
                "artifact name '{name}' is not a plain file name"
            )));
        }

        std::fs::create_dir_all(&self.dir).map_err(|e| Error::OperationFailed {
            operation: "create_export_dir".to_string(),
            cause: e.to_string(),
        })?;

        let path = self.dir.join(name);
        std::fs::write(&path, bytes).map_err(|e| Error::OperationFailed {
            operation: "write_artifact".to_string(),
            cause: e.to_string(),
        })
    }
}

/// Collects artifacts in memory. Used in tests and anywhere delivery is
/// handled by the embedding host instead of the filesystem.
#[derive(Debug, Default)]
pub struct BufferSink {
    artifacts: Vec<(String, Vec<u8>)>,
}

impl BufferSink {
    /// Creates an empty buffer sink.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            artifacts: Vec::new(),
        }
    }

    /// Delivered artifacts, in order.
    #[must_use]
    pub fn artifacts(&self) -> &[(String, Vec<u8>)] {
        &self.artifacts
    }
}

impl ExportSink for BufferSink {
    fn deliver(&mut self, name: &str, bytes: &[u8]) -> Result<()> {
        self.artifacts.push((name.to_string(), bytes.to_vec()));
        Ok(())
    }
}
