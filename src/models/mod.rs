//! Data models for promptscope.
//!
//! This module contains the core data structures used throughout the system.

mod events;
mod host;
pub mod record;
mod snapshot;

pub use events::{CaptureEvent, CaptureObserver, EventMeta};
pub use host::{HostValue, SharedValue};
pub use record::{ChatTurn, empty_section, raw_chat_view};
pub use snapshot::{CIRCULAR_PLACEHOLDER, Snapshot, TYPE_TAG};
