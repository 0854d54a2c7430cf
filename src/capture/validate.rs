//! Structural validation of captured records.

use crate::models::record::{
    ADDITIONAL_CHAT_LOG, EXTENSION, MANDATORY_SECTIONS, OTHER_CHARACTER_SECTIONS,
    PLUGIN_SECTIONS, REQUIRED_FIELDS, TEXT,
};
use crate::models::Snapshot;
use tracing::debug;

/// Entry used in [`ValidationReport::missing`] when the captured value is
/// not a record at all.
pub const MISSING_ALL: &str = "all";

/// Outcome of validating a captured record.
///
/// `ok` reflects the three mandatory sections: each must be present and
/// well-formed. `missing` additionally lists any absent required top-level
/// field, including `chatLog`, whose absence is tolerated downstream and
/// therefore does not clear `ok`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Whether the record's mandatory sections are intact.
    pub ok: bool,
    /// Absent or malformed fields, field-qualified (e.g. `userSection.text`).
    pub missing: Vec<String>,
}

impl ValidationReport {
    /// A report for a fully intact record.
    #[must_use]
    pub const fn valid() -> Self {
        Self {
            ok: true,
            missing: Vec::new(),
        }
    }

    /// The report for a value that is not a record.
    #[must_use]
    pub fn not_a_record() -> Self {
        Self {
            ok: false,
            missing: vec![MISSING_ALL.to_string()],
        }
    }
}

/// Validates a captured record against the required shape.
///
/// Pure: the record is never modified and the only output is the report.
#[must_use]
pub fn validate(record: &Snapshot) -> ValidationReport {
    if !record.is_record() {
        return ValidationReport::not_a_record();
    }

    let mut missing = Vec::new();
    let mut sections_ok = true;

    for field in REQUIRED_FIELDS {
        if record.get(field).is_none() {
            missing.push(field.to_string());
        }
    }

    for name in MANDATORY_SECTIONS {
        match record.get(name) {
            None => sections_ok = false,
            Some(section) => {
                if !section.is_record() {
                    missing.push(name.to_string());
                    sections_ok = false;
                    continue;
                }
                if !section.get(TEXT).is_some_and(Snapshot::is_sequence) {
                    missing.push(format!("{name}.{TEXT}"));
                    sections_ok = false;
                }
                if !section
                    .get(ADDITIONAL_CHAT_LOG)
                    .is_some_and(Snapshot::is_sequence)
                {
                    missing.push(format!("{name}.{ADDITIONAL_CHAT_LOG}"));
                    sections_ok = false;
                }
                if !section.get(EXTENSION).is_some_and(Snapshot::is_map_shaped) {
                    missing.push(format!("{name}.{EXTENSION}"));
                    sections_ok = false;
                }
            },
        }
    }

    ValidationReport {
        ok: sections_ok,
        missing,
    }
}

/// Logs the shape of a captured record at debug level.
///
/// Verbosity only: no part of the capture path depends on this.
pub fn inspect(record: &Snapshot) {
    let Snapshot::Record(entries) = record else {
        debug!(kind = ?record, "captured value is not a record");
        return;
    };

    let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
    debug!(field_count = entries.len(), fields = ?keys, "captured record");

    for name in MANDATORY_SECTIONS {
        inspect_section(record, name);
    }

    for group in [PLUGIN_SECTIONS, OTHER_CHARACTER_SECTIONS] {
        if let Some(Snapshot::Record(sections)) = record.get(group) {
            debug!(group, count = sections.len(), "optional section group");
            for (key, _) in sections {
                debug!(group, section = %key, "optional section entry");
            }
        }
    }
}

fn inspect_section(record: &Snapshot, name: &str) {
    let Some(section) = record.get(name) else {
        debug!(section = name, "section absent");
        return;
    };
    if !section.is_record() {
        debug!(section = name, "section is not a record");
        return;
    }

    let text_len = match section.get(TEXT) {
        Some(Snapshot::Seq(items)) => Some(items.len()),
        _ => None,
    };
    let log_len = match section.get(ADDITIONAL_CHAT_LOG) {
        Some(Snapshot::Seq(items)) => Some(items.len()),
        _ => None,
    };
    let extension_keys = match section.get(EXTENSION) {
        Some(Snapshot::Record(entries)) => Some(entries.len()),
        Some(Snapshot::Mapping(pairs)) => Some(pairs.len()),
        _ => None,
    };
    debug!(
        section = name,
        text_len, log_len, extension_keys, "section shape"
    );
}
