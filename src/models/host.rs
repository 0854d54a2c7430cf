//! In-memory host values as handed to the capture pipeline.
//!
//! The host application assembles prompts from live objects that are richer
//! than plain JSON: map-like and set-like collections, timestamps, compiled
//! patterns, callables, error objects, and shared nodes that may alias each
//! other or form reference cycles. [`HostValue`] models that surface
//! explicitly so the copy step can be total over it.

use chrono::{DateTime, Utc};
use std::cell::RefCell;
use std::rc::Rc;

/// A node that can be referenced from more than one place in a host value
/// graph. Aliasing and cycles are only possible through shared nodes.
pub type SharedValue = Rc<RefCell<HostValue>>;

/// A value as produced by the host's prompt assembly.
///
/// Plain variants mirror JSON; the remaining variants cover the host types
/// that have no direct JSON representation and the shared nodes that allow
/// cyclic graphs.
#[derive(Debug, Clone, Default)]
pub enum HostValue {
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
    Array(Vec<HostValue>),
    /// String-keyed object with insertion order preserved.
    Object(Vec<(String, HostValue)>),
    /// A node that may be referenced from multiple places, or from itself.
    Shared(SharedValue),
    /// Map-like collection with arbitrary keys.
    Mapping(Vec<(HostValue, HostValue)>),
    /// Set-like collection.
    SetLike(Vec<HostValue>),
    /// Point-in-time value.
    Moment(DateTime<Utc>),
    /// Compiled pattern.
    Pattern {
        /// Source pattern text.
        source: String,
        /// Flag string.
        flags: String,
    },
    /// Callable value. The host may or may not know its name.
    Callable {
        /// Stable name, if the callable has one.
        name: Option<String>,
    },
    /// Error-like value.
    Failure {
        /// Error message.
        message: String,
        /// Trace text, when the host retained one.
        trace: Option<String>,
    },
}

impl HostValue {
    /// Wraps a value in a shared node.
    #[must_use]
    pub fn shared(value: Self) -> SharedValue {
        Rc::new(RefCell::new(value))
    }

    /// Short kind name used in diagnostics and shallow-copy placeholders.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Number(_) => "number",
            Self::Text(_) => "text",
            Self::Array(_) => "array",
            Self::Object(_) => "object",
            Self::Shared(_) => "shared",
            Self::Mapping(_) => "mapping",
            Self::SetLike(_) => "set",
            Self::Moment(_) => "moment",
            Self::Pattern { .. } => "pattern",
            Self::Callable { .. } => "callable",
            Self::Failure { .. } => "failure",
        }
    }

    /// Returns true for `Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<serde_json::Value> for HostValue {
    /// Converts a JSON event payload into a host value.
    ///
    /// JSON cannot express aliasing, cycles, or the non-plain host types, so
    /// the conversion is purely structural. The in-process interception path
    /// hands over [`HostValue`] graphs directly and does not go through JSON.
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or(0.0)),
            serde_json::Value::String(s) => Self::Text(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            },
            serde_json::Value::Object(entries) => {
                Self::Object(entries.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            },
        }
    }
}
