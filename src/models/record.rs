//! The captured prompt record shape.
//!
//! A prompt record is dynamic data shaped by the host, so the shape is
//! expressed as field-name constants over [`Snapshot`] rather than a rigid
//! struct: validation and repair work structurally, and unknown fields pass
//! through to the artifact untouched.

use super::Snapshot;
use serde::{Deserialize, Serialize};

/// The character contributor's section.
pub const CHAR_SECTION: &str = "charSection";
/// The user contributor's section.
pub const USER_SECTION: &str = "userSection";
/// The world contributor's section.
pub const WORLD_SECTION: &str = "worldSection";
/// The ordered chat log.
pub const CHAT_LOG: &str = "chatLog";
/// Optional mapping from plugin identifier to section.
pub const PLUGIN_SECTIONS: &str = "pluginSections";
/// Optional mapping from character identifier to section.
pub const OTHER_CHARACTER_SECTIONS: &str = "otherCharacterSections";

/// Ordered text entries within a section.
pub const TEXT: &str = "text";
/// Chat-log entries contributed by a section.
pub const ADDITIONAL_CHAT_LOG: &str = "additionalChatLog";
/// Free-form extension data within a section.
pub const EXTENSION: &str = "extension";

/// Field holding the raw-chat projection on exported artifacts.
pub const RAW_CHAT: &str = "_rawChat";

/// The three sections every record must carry.
pub const MANDATORY_SECTIONS: [&str; 3] = [CHAR_SECTION, USER_SECTION, WORLD_SECTION];

/// All required top-level fields.
pub const REQUIRED_FIELDS: [&str; 4] = [CHAR_SECTION, USER_SECTION, WORLD_SECTION, CHAT_LOG];

/// One turn of the raw-chat view: the `{role, content}` projection of a
/// chat-log entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    /// Speaker role.
    pub role: String,
    /// Turn content, opaque to this crate.
    pub content: serde_json::Value,
}

/// Builds a well-formed empty section:
/// `{ text: [], additionalChatLog: [], extension: {} }`.
#[must_use]
pub fn empty_section() -> Snapshot {
    Snapshot::Record(vec![
        (TEXT.to_string(), Snapshot::Seq(Vec::new())),
        (ADDITIONAL_CHAT_LOG.to_string(), Snapshot::Seq(Vec::new())),
        (EXTENSION.to_string(), Snapshot::Record(Vec::new())),
    ])
}

/// Projects the record's chat log into [`ChatTurn`]s.
///
/// An absent or malformed `chatLog` yields an empty view; entries without a
/// textual role get an empty role. The record itself is left as-is.
#[must_use]
pub fn raw_chat_view(record: &Snapshot) -> Vec<ChatTurn> {
    let Some(Snapshot::Seq(entries)) = record.get(CHAT_LOG) else {
        return Vec::new();
    };

    entries
        .iter()
        .map(|entry| ChatTurn {
            role: match entry.get("role") {
                Some(Snapshot::Text(role)) => role.clone(),
                _ => String::new(),
            },
            content: entry.get("content").map_or(serde_json::Value::Null, Snapshot::to_json),
        })
        .collect()
}
