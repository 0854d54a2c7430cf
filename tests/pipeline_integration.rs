//! End-to-end pipeline tests.
//!
//! Drives the public surface the way a host would: payload in, capture,
//! artifact out, parsed back from disk. No internals are reached into
//! beyond the store handle the host itself owns.

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use promptscope::config::PromptScopeConfig;
use promptscope::hooks::{HookHandler, PromptReadyHandler};
use promptscope::{
    CapturePipeline, CaptureStore, ExportError, FileSink, HostValue,
};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;

fn pipeline_into(dir: &Path, config: PromptScopeConfig) -> CapturePipeline {
    CapturePipeline::new(
        config,
        Arc::new(CaptureStore::new()),
        Box::new(FileSink::new(dir)),
    )
}

fn read_artifact(dir: &Path, name: &str) -> Value {
    let bytes = std::fs::read(dir.join(name)).expect("artifact file exists");
    serde_json::from_slice(&bytes).expect("artifact is valid JSON")
}

fn well_formed_payload() -> Value {
    json!({
        "charSection": {"text": [], "additionalChatLog": [], "extension": {}},
        "userSection": {"text": ["hi"], "additionalChatLog": [], "extension": {}},
        "worldSection": {"text": [], "additionalChatLog": [], "extension": {}},
        "chatLog": [{"role": "user", "content": "hi"}],
    })
}

// ============================================================================
// Capture and export round trips
// ============================================================================

mod round_trips {
    use super::*;

    #[test]
    fn test_well_formed_record_exports_intact() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_into(dir.path(), PromptScopeConfig::default());

        let outcome =
            pipeline.handle_prompt_ready(&HostValue::from(well_formed_payload()));
        assert!(outcome.stored);
        assert!(!outcome.repaired);

        let artifact = pipeline.export_now().unwrap();
        let content = read_artifact(dir.path(), &artifact);
        assert_eq!(content["userSection"]["text"], json!(["hi"]));
        assert_eq!(content["chatLog"][0]["role"], json!("user"));
    }

    #[test]
    fn test_record_missing_all_sections_repaired_and_exported() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_into(dir.path(), PromptScopeConfig::default());

        let outcome = pipeline.handle_prompt_ready(&HostValue::from(json!({"chatLog": []})));
        assert!(outcome.stored);
        assert!(outcome.repaired);

        let artifact = pipeline.export_now().unwrap();
        let content = read_artifact(dir.path(), &artifact);
        assert_eq!(
            content["charSection"],
            json!({"text": [], "additionalChatLog": [], "extension": {}})
        );
    }

    #[test]
    fn test_raw_chat_projection_in_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let config = PromptScopeConfig {
            include_raw_data: true,
            ..PromptScopeConfig::default()
        };
        let mut pipeline = pipeline_into(dir.path(), config);

        let payload = json!({
            "chatLog": [{"role": "assistant", "content": "hello", "tokens": 3}],
        });
        pipeline.handle_prompt_ready(&HostValue::from(payload));

        let artifact = pipeline.export_now().unwrap();
        let content = read_artifact(dir.path(), &artifact);
        assert_eq!(
            content["_rawChat"],
            json!([{"role": "assistant", "content": "hello"}])
        );
    }

    #[test]
    fn test_raw_chat_absent_when_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = PromptScopeConfig {
            include_raw_data: false,
            ..PromptScopeConfig::default()
        };
        let mut pipeline = pipeline_into(dir.path(), config);

        pipeline.handle_prompt_ready(&HostValue::from(well_formed_payload()));
        let artifact = pipeline.export_now().unwrap();
        let content = read_artifact(dir.path(), &artifact);
        assert!(content.get("_rawChat").is_none());
    }

    #[test]
    fn test_auto_export_writes_file_per_capture() {
        let dir = tempfile::tempdir().unwrap();
        let config = PromptScopeConfig {
            auto_export: true,
            ..PromptScopeConfig::default()
        };
        let mut pipeline = pipeline_into(dir.path(), config);

        let first = pipeline.handle_prompt_ready(&HostValue::from(well_formed_payload()));
        let second = pipeline.handle_prompt_ready(&HostValue::from(well_formed_payload()));

        let first_name = first.artifact.unwrap();
        let second_name = second.artifact.unwrap();
        assert_ne!(first_name, second_name);
        assert!(first_name.starts_with("prompt_struct_0_"));
        assert!(second_name.starts_with("prompt_struct_1_"));
        assert!(dir.path().join(&first_name).exists());
        assert!(dir.path().join(&second_name).exists());
    }

    #[test]
    fn test_last_capture_wins_on_export() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_into(dir.path(), PromptScopeConfig::default());

        pipeline.handle_prompt_ready(&HostValue::from(json!({"marker": 1})));
        pipeline.handle_prompt_ready(&HostValue::from(json!({"marker": 2})));

        let artifact = pipeline.export_now().unwrap();
        let content = read_artifact(dir.path(), &artifact);
        assert_eq!(content["marker"], json!(2.0));
    }
}

// ============================================================================
// Export failure surface
// ============================================================================

mod export_errors {
    use super::*;

    #[test]
    fn test_export_before_any_capture() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_into(dir.path(), PromptScopeConfig::default());

        match pipeline.export_now() {
            Err(ExportError::NoCaptureAvailable) => {},
            other => panic!("expected NoCaptureAvailable, got {other:?}"),
        }
    }

    #[test]
    fn test_failed_export_reports_short_message() {
        let dir = tempfile::tempdir().unwrap();
        let mut pipeline = pipeline_into(dir.path(), PromptScopeConfig::default());

        let message = pipeline.export_now().unwrap_err().to_string();
        assert_eq!(message, "no capture available; trigger a prompt first");
    }
}

// ============================================================================
// Hook handler surface
// ============================================================================

mod hook_handler {
    use super::*;

    fn handler_into(dir: &Path) -> PromptReadyHandler {
        PromptReadyHandler::new(pipeline_into(dir, PromptScopeConfig::default()))
    }

    #[test]
    fn test_handle_payload_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let mut handler = handler_into(dir.path());

        let response: Value = serde_json::from_str(
            &handler.handle(&well_formed_payload().to_string()).unwrap(),
        )
        .unwrap();
        assert_eq!(response["stored"], json!(true));
        assert_eq!(response["repaired"], json!(false));

        let artifact = handler.pipeline_mut().export_now().unwrap();
        let content = read_artifact(dir.path(), &artifact);
        assert_eq!(content["userSection"]["text"], json!(["hi"]));
    }

    #[test]
    fn test_handle_empty_input() {
        let dir = tempfile::tempdir().unwrap();
        let mut handler = handler_into(dir.path());

        // An empty object is a record missing everything: captured after
        // repair, not rejected.
        let response: Value = serde_json::from_str(&handler.handle("{}").unwrap()).unwrap();
        assert_eq!(response["stored"], json!(true));
        assert_eq!(response["repaired"], json!(true));
    }

    #[test]
    fn test_handle_invalid_json_never_errors() {
        let dir = tempfile::tempdir().unwrap();
        let mut handler = handler_into(dir.path());

        for payload in ["not valid json {{{{", "", "\u{0}binary\u{1}"] {
            let result = handler.handle(payload);
            assert!(result.is_ok(), "payload {payload:?} must not error");
        }
    }
}
