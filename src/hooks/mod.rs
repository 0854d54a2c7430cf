//! Host integration surfaces.
//!
//! Two inbound paths feed the capture pipeline:
//!
//! | Source | Carrier | Entry point |
//! |--------|---------|-------------|
//! | "prompt ready" event | JSON payload | [`PromptReadyHandler`] |
//! | Interception port | in-process [`HostValue`](crate::models::HostValue) | [`InterceptionPort`] |
//!
//! Both paths write to the same single-slot store; whichever fires last
//! wins, and neither is privileged over the other.
//!
//! Handlers never fail back into the host's dispatch: malformed input is
//! logged, reported in the handler's JSON response, and otherwise ignored.

mod interception;
mod prompt_ready;

pub use interception::InterceptionPort;
pub use prompt_ready::PromptReadyHandler;

use crate::Result;

/// Trait for hook handlers.
pub trait HookHandler {
    /// The hook event type this handler processes.
    fn event_type(&self) -> &'static str;

    /// Handles the hook event payload, returning a JSON response.
    ///
    /// # Errors
    ///
    /// Returns an error only when building the response itself fails;
    /// malformed payloads are handled, not propagated.
    fn handle(&mut self, input: &str) -> Result<String>;
}
