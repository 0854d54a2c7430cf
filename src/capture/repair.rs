//! Best-effort normalization of malformed records.

use crate::models::record::{
    ADDITIONAL_CHAT_LOG, EXTENSION, MANDATORY_SECTIONS, TEXT,
};
use crate::models::{Snapshot, empty_section};
use tracing::debug;

/// Repairs a captured record in place and returns it.
///
/// For each mandatory section: absent or not a record means wholesale
/// replacement with an empty section; present but with malformed sub-fields
/// means only those sub-fields are reset to their empty defaults. `chatLog`
/// is left untouched; downstream consumers tolerate its absence as an
/// empty sequence. A value that is not a record at all is replaced with a
/// fresh record shell carrying the three empty sections.
///
/// This is display normalization, not error handling: it always succeeds,
/// is idempotent, and operates only on safe-copied data, never on the
/// host's live value.
pub fn repair(record: &mut Snapshot) -> &mut Snapshot {
    if !record.is_record() {
        debug!("captured value is not a record, rebuilding shell");
        *record = Snapshot::Record(
            MANDATORY_SECTIONS
                .iter()
                .map(|name| ((*name).to_string(), empty_section()))
                .collect(),
        );
        return record;
    }

    for name in MANDATORY_SECTIONS {
        match record.get_mut(name) {
            Some(section) if section.is_record() => {
                repair_subfields(section, name);
            },
            _ => {
                debug!(section = name, "section absent or malformed, replacing");
                record.set(name, empty_section());
            },
        }
    }

    record
}

/// Resets malformed sub-fields of an otherwise intact section.
fn repair_subfields(section: &mut Snapshot, name: &str) {
    if !section.get(TEXT).is_some_and(Snapshot::is_sequence) {
        debug!(section = name, field = TEXT, "resetting sub-field");
        section.set(TEXT, Snapshot::Seq(Vec::new()));
    }
    if !section
        .get(ADDITIONAL_CHAT_LOG)
        .is_some_and(Snapshot::is_sequence)
    {
        debug!(section = name, field = ADDITIONAL_CHAT_LOG, "resetting sub-field");
        section.set(ADDITIONAL_CHAT_LOG, Snapshot::Seq(Vec::new()));
    }
    if !section.get(EXTENSION).is_some_and(Snapshot::is_map_shaped) {
        debug!(section = name, field = EXTENSION, "resetting sub-field");
        section.set(EXTENSION, Snapshot::Record(Vec::new()));
    }
}
