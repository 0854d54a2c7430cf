//! Service layer: pipeline orchestration over the capture core.

mod pipeline;

pub use pipeline::{CaptureOutcome, CapturePipeline, PromptObserver};
