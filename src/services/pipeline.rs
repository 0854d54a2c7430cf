//! The capture pipeline.
//!
//! Wires the capture core together behind the single inbound entry point:
//! safe copy, validation, repair when needed, the optional raw-chat
//! projection, storage, and auto-export. The entry point is total: no
//! inbound value, however malformed, fails back into the host's event
//! dispatch.

use crate::capture::{CaptureStore, SafeCopy, inspect, repair, validate};
use crate::config::PromptScopeConfig;
use crate::io::{ExportError, ExportOptions, Exporter, ExportSink};
use crate::models::record::RAW_CHAT;
use crate::models::{
    CaptureEvent, CaptureObserver, EventMeta, HostValue, Snapshot, raw_chat_view,
};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Event source name stamped on pipeline events.
const EVENT_SOURCE: &str = "capture_pipeline";

/// What one inbound event amounted to.
#[derive(Debug, Clone, Default)]
pub struct CaptureOutcome {
    /// Whether a record was stored.
    pub stored: bool,
    /// Whether the record needed repair before storage.
    pub repaired: bool,
    /// Fields the validator reported absent or malformed.
    pub missing: Vec<String>,
    /// Artifact name when an auto-export ran and succeeded.
    pub artifact: Option<String>,
    /// Non-fatal notes for the caller to surface.
    pub warnings: Vec<String>,
}

impl CaptureOutcome {
    fn skipped(warning: impl Into<String>) -> Self {
        Self {
            warnings: vec![warning.into()],
            ..Self::default()
        }
    }
}

/// Observes prompt values produced by the host.
///
/// Implemented by [`CapturePipeline`]; the host-side registration surface
/// is [`crate::hooks::InterceptionPort`].
pub trait PromptObserver {
    /// Handles one observed prompt value.
    fn observe(&mut self, value: &HostValue) -> CaptureOutcome;
}

/// The capture-validate-repair-export pipeline.
///
/// Holds the configuration it was constructed with; there is no ambient
/// global state beyond the store instance the caller passes in.
pub struct CapturePipeline {
    config: PromptScopeConfig,
    store: Arc<CaptureStore>,
    copier: SafeCopy,
    exporter: Exporter,
    observer: Option<Box<dyn CaptureObserver>>,
}

impl CapturePipeline {
    /// Creates a pipeline over the given store, delivering exports through
    /// `sink`.
    #[must_use]
    pub fn new(
        config: PromptScopeConfig,
        store: Arc<CaptureStore>,
        sink: Box<dyn ExportSink>,
    ) -> Self {
        let exporter = Exporter::new(sink).with_options(ExportOptions {
            pretty_print: config.pretty_print,
        });
        Self {
            config,
            store,
            copier: SafeCopy::new(),
            exporter,
            observer: None,
        }
    }

    /// Attaches an event observer for diagnostics.
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn CaptureObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The store this pipeline writes to.
    #[must_use]
    pub fn store(&self) -> &Arc<CaptureStore> {
        &self.store
    }

    /// Handles one "prompt ready" value from the host.
    ///
    /// Total: every failure mode is captured in the returned outcome.
    pub fn handle_prompt_ready(&mut self, value: &HostValue) -> CaptureOutcome {
        if !self.config.enabled {
            debug!("capture disabled, ignoring prompt");
            return CaptureOutcome::default();
        }
        if value.is_null() {
            warn!("prompt ready event carried no value");
            return CaptureOutcome::skipped("prompt ready event carried no value");
        }

        info!("capturing prompt structure");
        let mut record = self.copier.copy(value);
        if self.config.debug_mode {
            inspect(&record);
        }

        let report = validate(&record);
        let repaired = !report.ok;
        if repaired {
            warn!(missing = ?report.missing, "captured record failed validation, repairing");
            repair(&mut record);
        }

        if self.config.include_raw_data {
            record.set(RAW_CHAT, raw_chat_snapshot(&record));
        }

        self.store.put(record);
        debug!("capture stored");
        self.emit(CaptureEvent::Captured {
            meta: EventMeta::new(EVENT_SOURCE),
            repaired,
            missing: report.missing.clone(),
        });

        let mut outcome = CaptureOutcome {
            stored: true,
            repaired,
            missing: report.missing,
            artifact: None,
            warnings: Vec::new(),
        };

        if self.config.auto_export {
            match self.export_now() {
                Ok(artifact) => outcome.artifact = Some(artifact),
                Err(e) => outcome.warnings.push(e.to_string()),
            }
        }

        outcome
    }

    /// Exports the current capture on demand (the manual trigger).
    ///
    /// # Errors
    ///
    /// Propagates the exporter's failure taxonomy; see [`ExportError`].
    pub fn export_now(&mut self) -> Result<String, ExportError> {
        let result = self.exporter.export(&self.store);
        match &result {
            Ok(artifact) => self.emit(CaptureEvent::Exported {
                meta: EventMeta::new(EVENT_SOURCE),
                artifact: artifact.clone(),
            }),
            Err(e) => self.emit(CaptureEvent::ExportFailed {
                meta: EventMeta::new(EVENT_SOURCE),
                reason: e.to_string(),
            }),
        }
        result
    }

    fn emit(&mut self, event: CaptureEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_event(&event);
        }
    }
}

impl PromptObserver for CapturePipeline {
    fn observe(&mut self, value: &HostValue) -> CaptureOutcome {
        self.handle_prompt_ready(value)
    }
}

/// Builds the `_rawChat` snapshot from the record's chat log.
fn raw_chat_snapshot(record: &Snapshot) -> Snapshot {
    Snapshot::Seq(
        raw_chat_view(record)
            .into_iter()
            .map(|turn| {
                Snapshot::Record(vec![
                    ("role".to_string(), Snapshot::Text(turn.role)),
                    ("content".to_string(), json_to_snapshot(turn.content)),
                ])
            })
            .collect(),
    )
}

/// Converts plain JSON back into a snapshot for embedding in the record.
fn json_to_snapshot(value: serde_json::Value) -> Snapshot {
    match value {
        serde_json::Value::Null => Snapshot::Null,
        serde_json::Value::Bool(b) => Snapshot::Bool(b),
        serde_json::Value::Number(n) => Snapshot::Number(n.as_f64().unwrap_or(0.0)),
        serde_json::Value::String(s) => Snapshot::Text(s),
        serde_json::Value::Array(items) => {
            Snapshot::Seq(items.into_iter().map(json_to_snapshot).collect())
        },
        serde_json::Value::Object(entries) => Snapshot::Record(
            entries
                .into_iter()
                .map(|(k, v)| (k, json_to_snapshot(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::BufferSink;
    use crate::models::record::{CHAR_SECTION, CHAT_LOG, USER_SECTION, WORLD_SECTION};
    use serde_json::json;

    fn pipeline(config: PromptScopeConfig) -> CapturePipeline {
        CapturePipeline::new(config, Arc::new(CaptureStore::new()), Box::new(BufferSink::new()))
    }

    fn well_formed_event() -> HostValue {
        HostValue::from(json!({
            "charSection": {"text": [], "additionalChatLog": [], "extension": {}},
            "userSection": {"text": ["hi"], "additionalChatLog": [], "extension": {}},
            "worldSection": {"text": [], "additionalChatLog": [], "extension": {}},
            "chatLog": [{"role": "user", "content": "hi"}],
        }))
    }

    #[test]
    fn test_disabled_pipeline_ignores_events() {
        let config = PromptScopeConfig {
            enabled: false,
            ..PromptScopeConfig::default()
        };
        let mut pipeline = pipeline(config);
        let outcome = pipeline.handle_prompt_ready(&well_formed_event());

        assert!(!outcome.stored);
        assert!(!pipeline.store().has_capture());
    }

    #[test]
    fn test_null_value_skipped_with_warning() {
        let mut pipeline = pipeline(PromptScopeConfig::default());
        let outcome = pipeline.handle_prompt_ready(&HostValue::Null);

        assert!(!outcome.stored);
        assert_eq!(outcome.warnings.len(), 1);
    }

    #[test]
    fn test_well_formed_record_stored_without_repair() {
        let mut pipeline = pipeline(PromptScopeConfig {
            include_raw_data: false,
            ..PromptScopeConfig::default()
        });
        let outcome = pipeline.handle_prompt_ready(&well_formed_event());

        assert!(outcome.stored);
        assert!(!outcome.repaired);
        let capture = pipeline.store().get().unwrap();
        assert_eq!(
            capture.record.get(USER_SECTION).and_then(|s| s.get("text")),
            Some(&Snapshot::Seq(vec![Snapshot::Text("hi".to_string())]))
        );
    }

    #[test]
    fn test_malformed_record_repaired() {
        let mut pipeline = pipeline(PromptScopeConfig::default());
        let outcome = pipeline.handle_prompt_ready(&HostValue::from(json!({"chatLog": []})));

        assert!(outcome.stored);
        assert!(outcome.repaired);
        assert!(outcome.missing.contains(&CHAR_SECTION.to_string()));

        let capture = pipeline.store().get().unwrap();
        assert_eq!(
            capture.record.get(WORLD_SECTION).map(Snapshot::to_json),
            Some(json!({"text": [], "additionalChatLog": [], "extension": {}}))
        );
    }

    #[test]
    fn test_raw_chat_attached_when_configured() {
        let mut pipeline = pipeline(PromptScopeConfig::default());
        pipeline.handle_prompt_ready(&well_formed_event());

        let capture = pipeline.store().get().unwrap();
        assert_eq!(
            capture.record.get(RAW_CHAT).map(Snapshot::to_json),
            Some(json!([{"role": "user", "content": "hi"}]))
        );
    }

    #[test]
    fn test_raw_chat_tolerates_missing_log() {
        let mut pipeline = pipeline(PromptScopeConfig::default());
        let event = HostValue::from(json!({
            "charSection": {"text": [], "additionalChatLog": [], "extension": {}},
        }));
        let outcome = pipeline.handle_prompt_ready(&event);

        assert!(outcome.stored);
        let capture = pipeline.store().get().unwrap();
        assert_eq!(
            capture.record.get(RAW_CHAT).map(Snapshot::to_json),
            Some(json!([]))
        );
        // Repair fills sections but never invents a chat log.
        assert!(capture.record.get(CHAT_LOG).is_none());
    }

    #[test]
    fn test_auto_export_produces_artifact() {
        let config = PromptScopeConfig {
            auto_export: true,
            ..PromptScopeConfig::default()
        };
        let mut pipeline = pipeline(config);
        let outcome = pipeline.handle_prompt_ready(&well_formed_event());

        let artifact = outcome.artifact.unwrap();
        assert!(artifact.starts_with("prompt_struct_0_"));
        assert_eq!(
            pipeline.store().last_export().map(|s| s.artifact),
            Some(artifact)
        );
    }

    #[test]
    fn test_manual_export_without_capture_fails() {
        let mut pipeline = pipeline(PromptScopeConfig::default());
        assert!(matches!(
            pipeline.export_now(),
            Err(ExportError::NoCaptureAvailable)
        ));
    }

    #[test]
    fn test_observer_sees_events() {
        #[derive(Default)]
        struct Recorder(std::rc::Rc<std::cell::RefCell<Vec<&'static str>>>);
        impl CaptureObserver for Recorder {
            fn on_event(&mut self, event: &CaptureEvent) {
                self.0.borrow_mut().push(event.event_type());
            }
        }

        let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        let config = PromptScopeConfig {
            auto_export: true,
            ..PromptScopeConfig::default()
        };
        let mut pipeline = CapturePipeline::new(
            config,
            Arc::new(CaptureStore::new()),
            Box::new(BufferSink::new()),
        )
        .with_observer(Box::new(Recorder(std::rc::Rc::clone(&seen))));

        pipeline.handle_prompt_ready(&well_formed_event());
        assert_eq!(*seen.borrow(), vec!["captured", "exported"]);
    }
}
