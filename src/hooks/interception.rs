//! The interception port.
//!
//! Hosts that can surface the return value of their prompt-building
//! function do so through this explicit registration API, instead of
//! anything rebinding host internals. The host owns a port, observers
//! register on it, and the host calls [`InterceptionPort::notify`] with
//! each built prompt.

use crate::models::HostValue;
use crate::services::{CaptureOutcome, PromptObserver};
use tracing::debug;

/// Registration point for prompt observers.
#[derive(Default)]
pub struct InterceptionPort {
    observers: Vec<Box<dyn PromptObserver>>,
}

impl InterceptionPort {
    /// Creates a port with no observers.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            observers: Vec::new(),
        }
    }

    /// Registers an observer. Observers are notified in registration order.
    pub fn register(&mut self, observer: Box<dyn PromptObserver>) {
        self.observers.push(observer);
    }

    /// Number of registered observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Notifies every observer of a built prompt value, collecting each
    /// outcome. Observation never fails back into the host.
    pub fn notify(&mut self, value: &HostValue) -> Vec<CaptureOutcome> {
        debug!(observers = self.observers.len(), "intercepted prompt value");
        self.observers
            .iter_mut()
            .map(|observer| observer.observe(value))
            .collect()
    }
}
