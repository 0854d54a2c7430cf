//! Serializable snapshots of captured host values.
//!
//! A [`Snapshot`] is the output of the safe-copy step: a self-contained tree
//! with no shared nodes, no cycles, and a JSON rendering for every variant.
//! Host types with no plain JSON shape are carried as explicit variants and
//! serialize as `__type`-tagged objects, so an exported artifact remains
//! readable without this crate.

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

/// Placeholder text carried by circular-reference markers.
///
/// Cycles are cut, not preserved: a snapshot is a debug view, not a format
/// that round-trips object identity.
pub const CIRCULAR_PLACEHOLDER: &str = "[circular reference]";

/// Tag key used for the non-plain variants in JSON output.
pub const TYPE_TAG: &str = "__type";

/// A copied value, safe to store and serialize.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Snapshot {
    /// Absent value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Numeric value.
    Number(f64),
    /// Text value.
    Text(String),
    /// Ordered sequence.
    Seq(Vec<Snapshot>),
    /// String-keyed record with insertion order preserved.
    Record(Vec<(String, Snapshot)>),
    /// Map-like collection, kept as ordered key/value pairs.
    Mapping(Vec<(Snapshot, Snapshot)>),
    /// Set-like collection, kept as ordered members.
    SetLike(Vec<Snapshot>),
    /// Point in time as ISO-8601 text.
    Moment(String),
    /// Compiled pattern.
    Pattern {
        /// Source pattern text.
        source: String,
        /// Flag string.
        flags: String,
    },
    /// Callable, reduced to a stable name.
    Callable {
        /// Callable name, or the anonymous placeholder.
        name: String,
    },
    /// Error-like value, or a recorded copy failure.
    Failure {
        /// Error message.
        message: String,
        /// Trace text, if any was retained.
        trace: Option<String>,
    },
    /// Marker left where a reference cycle was cut.
    CircularRef,
}

impl Snapshot {
    /// Looks up a record field by name.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Record(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Looks up a record field by name, mutably.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Self> {
        match self {
            Self::Record(entries) => {
                entries.iter_mut().find(|(k, _)| k == key).map(|(_, v)| v)
            },
            _ => None,
        }
    }

    /// Sets a record field, replacing an existing entry or appending a new
    /// one. No-op when the snapshot is not a record.
    pub fn set(&mut self, key: &str, value: Self) {
        if let Self::Record(entries) = self {
            if let Some(slot) = entries.iter_mut().find(|(k, _)| k == key) {
                slot.1 = value;
            } else {
                entries.push((key.to_string(), value));
            }
        }
    }

    /// Returns true for record snapshots.
    #[must_use]
    pub const fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// Returns true for ordered sequences.
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(self, Self::Seq(_))
    }

    /// Returns true for values that render as a string-keyed JSON object:
    /// records and map-like collections.
    #[must_use]
    pub const fn is_map_shaped(&self) -> bool {
        matches!(self, Self::Record(_) | Self::Mapping(_))
    }

    /// Renders the snapshot as a `serde_json` value.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl Serialize for Snapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => serializer.serialize_f64(*n),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            },
            Self::Record(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            },
            Self::Mapping(pairs) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(TYPE_TAG, "Map")?;
                map.serialize_entry("entries", &Pairs(pairs))?;
                map.end()
            },
            Self::SetLike(members) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(TYPE_TAG, "Set")?;
                map.serialize_entry("members", members)?;
                map.end()
            },
            Self::Moment(iso) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(TYPE_TAG, "Date")?;
                map.serialize_entry("iso", iso)?;
                map.end()
            },
            Self::Pattern { source, flags } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry(TYPE_TAG, "RegExp")?;
                map.serialize_entry("source", source)?;
                map.serialize_entry("flags", flags)?;
                map.end()
            },
            Self::Callable { name } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(TYPE_TAG, "Function")?;
                map.serialize_entry("name", name)?;
                map.end()
            },
            Self::Failure { message, trace } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry(TYPE_TAG, "Error")?;
                map.serialize_entry("message", message)?;
                map.serialize_entry("trace", trace)?;
                map.end()
            },
            Self::CircularRef => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry(TYPE_TAG, "Circular")?;
                map.serialize_entry("note", CIRCULAR_PLACEHOLDER)?;
                map.end()
            },
        }
    }
}

/// Serializes mapping pairs as a JSON array of two-element arrays.
struct Pairs<'a>(&'a [(Snapshot, Snapshot)]);

impl Serialize for Pairs<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.0.len()))?;
        for (key, value) in self.0 {
            seq.serialize_element(&[key, value])?;
        }
        seq.end()
    }
}
