//! Prompt ready hook handler.

use super::HookHandler;
use crate::Result;
use crate::models::HostValue;
use crate::services::{CaptureOutcome, CapturePipeline};
use serde::Serialize;
use tracing::warn;

/// Handles the host's "prompt ready" notification.
///
/// The payload is the PromptRecord-shaped value itself, as JSON. Invalid
/// JSON is treated as an absent value: logged, noted in the response, and
/// never an error back into the host.
pub struct PromptReadyHandler {
    pipeline: CapturePipeline,
}

/// JSON response returned to the host after handling.
#[derive(Debug, Serialize)]
struct PromptReadyResponse {
    stored: bool,
    repaired: bool,
    missing: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<String>,
}

impl From<CaptureOutcome> for PromptReadyResponse {
    fn from(outcome: CaptureOutcome) -> Self {
        Self {
            stored: outcome.stored,
            repaired: outcome.repaired,
            missing: outcome.missing,
            artifact: outcome.artifact,
            warnings: outcome.warnings,
        }
    }
}

impl PromptReadyHandler {
    /// Creates a handler feeding the given pipeline.
    #[must_use]
    pub const fn new(pipeline: CapturePipeline) -> Self {
        Self { pipeline }
    }

    /// The pipeline behind this handler.
    #[must_use]
    pub const fn pipeline(&self) -> &CapturePipeline {
        &self.pipeline
    }

    /// Mutable access to the pipeline, for the manual export trigger.
    pub const fn pipeline_mut(&mut self) -> &mut CapturePipeline {
        &mut self.pipeline
    }
}

impl HookHandler for PromptReadyHandler {
    fn event_type(&self) -> &'static str {
        "PromptReady"
    }

    fn handle(&mut self, input: &str) -> Result<String> {
        let value = match serde_json::from_str::<serde_json::Value>(input) {
            Ok(json) => HostValue::from(json),
            Err(e) => {
                warn!(error = %e, "prompt ready payload is not valid JSON");
                HostValue::Null
            },
        };

        let outcome = self.pipeline.handle_prompt_ready(&value);
        let response = PromptReadyResponse::from(outcome);
        serde_json::to_string(&response).map_err(|e| crate::Error::OperationFailed {
            operation: "encode_hook_response".to_string(),
            cause: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::CaptureStore;
    use crate::config::PromptScopeConfig;
    use crate::io::BufferSink;
    use serde_json::{Value, json};
    use std::sync::Arc;

    fn handler() -> PromptReadyHandler {
        PromptReadyHandler::new(CapturePipeline::new(
            PromptScopeConfig::default(),
            Arc::new(CaptureStore::new()),
            Box::new(BufferSink::new()),
        ))
    }

    #[test]
    fn test_event_type() {
        assert_eq!(handler().event_type(), "PromptReady");
    }

    #[test]
    fn test_handle_well_formed_payload() {
        let mut handler = handler();
        let payload = json!({
            "charSection": {"text": [], "additionalChatLog": [], "extension": {}},
            "userSection": {"text": [], "additionalChatLog": [], "extension": {}},
            "worldSection": {"text": [], "additionalChatLog": [], "extension": {}},
            "chatLog": [],
        })
        .to_string();

        let response: Value =
            serde_json::from_str(&handler.handle(&payload).unwrap()).unwrap();
        assert_eq!(response["stored"], json!(true));
        assert_eq!(response["repaired"], json!(false));
    }

    #[test]
    fn test_handle_invalid_json_degrades() {
        let mut handler = handler();
        let response: Value =
            serde_json::from_str(&handler.handle("not json {{{").unwrap()).unwrap();

        assert_eq!(response["stored"], json!(false));
        assert!(!handler.pipeline().store().has_capture());
    }

    #[test]
    fn test_handle_wrong_json_type_repaired() {
        let mut handler = handler();
        let response: Value =
            serde_json::from_str(&handler.handle("[1, 2, 3]").unwrap()).unwrap();

        assert_eq!(response["stored"], json!(true));
        assert_eq!(response["repaired"], json!(true));
    }
}
