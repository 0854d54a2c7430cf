//! Defensive deep copy of host values.
//!
//! The host hands the pipeline live data that may contain reference cycles,
//! aliased nodes, and types with no plain JSON shape. [`SafeCopy`] turns any
//! such value into a self-contained [`Snapshot`] and is total: no input
//! makes it fail or panic.

use crate::models::{HostValue, Snapshot};
use chrono::SecondsFormat;
use std::cell::RefCell;
use tracing::{debug, warn};

/// Default bound on traversal depth. Hitting it is treated as a copy
/// failure and recovered through the shallow fallback.
pub const MAX_DEPTH: usize = 64;

/// Name recorded for callables the host could not name.
pub const ANONYMOUS_CALLABLE: &str = "anonymous";

/// Internal copy failure; never escapes [`SafeCopy::copy`].
struct CopyFailure {
    message: String,
}

impl CopyFailure {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Deep-copies host values into snapshots.
#[derive(Debug, Clone)]
pub struct SafeCopy {
    /// Maximum traversal depth before the shallow fallback takes over.
    max_depth: usize,
}

impl Default for SafeCopy {
    fn default() -> Self {
        Self::new()
    }
}

impl SafeCopy {
    /// Creates a copier with the default depth bound.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_depth: MAX_DEPTH,
        }
    }

    /// Overrides the traversal depth bound.
    #[must_use]
    pub const fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Copies a host value into a snapshot.
    ///
    /// Cycles through shared nodes are cut with a circular-reference marker.
    /// Sibling references to the same shared node are each copied in full:
    /// only a node already on the current traversal path counts as a cycle.
    /// When deep traversal fails the copy degrades to the value's own
    /// top-level entries, and when even that is impossible the result is a
    /// failure snapshot carrying the message. This function never fails.
    #[must_use]
    pub fn copy(&self, value: &HostValue) -> Snapshot {
        let mut path: Vec<*const RefCell<HostValue>> = Vec::new();
        match self.deep(value, &mut path, 0) {
            Ok(snapshot) => snapshot,
            Err(failure) => {
                warn!(
                    reason = %failure.message,
                    "deep copy failed, falling back to shallow copy"
                );
                self.shallow(value, &failure)
            },
        }
    }

    /// Depth-first copy. `path` holds the shared nodes currently being
    /// traversed; it is pushed before descending into a shared node and
    /// popped after, so aliases outside the path copy normally.
    fn deep(
        &self,
        value: &HostValue,
        path: &mut Vec<*const RefCell<HostValue>>,
        depth: usize,
    ) -> Result<Snapshot, CopyFailure> {
        if depth > self.max_depth {
            return Err(CopyFailure::new(format!(
                "traversal exceeded depth bound of {}",
                self.max_depth
            )));
        }

        match value {
            HostValue::Null => Ok(Snapshot::Null),
            HostValue::Bool(b) => Ok(Snapshot::Bool(*b)),
            HostValue::Number(n) => Ok(Snapshot::Number(*n)),
            HostValue::Text(s) => Ok(Snapshot::Text(s.clone())),
            HostValue::Array(items) => {
                let mut copied = Vec::with_capacity(items.len());
                for item in items {
                    copied.push(self.deep(item, path, depth + 1)?);
                }
                Ok(Snapshot::Seq(copied))
            },
            HostValue::Object(entries) => {
                let mut copied = Vec::with_capacity(entries.len());
                for (key, entry) in entries {
                    copied.push((key.clone(), self.deep(entry, path, depth + 1)?));
                }
                Ok(Snapshot::Record(copied))
            },
            HostValue::Shared(cell) => {
                let ptr = std::rc::Rc::as_ptr(cell);
                if path.contains(&ptr) {
                    debug!("cycle detected, inserting circular marker");
                    return Ok(Snapshot::CircularRef);
                }
                let inner = cell.try_borrow().map_err(|_| {
                    CopyFailure::new("shared node is mutably borrowed during capture")
                })?;
                path.push(ptr);
                let result = self.deep(&inner, path, depth + 1);
                path.pop();
                result
            },
            HostValue::Mapping(pairs) => {
                let mut copied = Vec::with_capacity(pairs.len());
                for (key, entry) in pairs {
                    copied.push((
                        self.deep(key, path, depth + 1)?,
                        self.deep(entry, path, depth + 1)?,
                    ));
                }
                Ok(Snapshot::Mapping(copied))
            },
            HostValue::SetLike(members) => {
                let mut copied = Vec::with_capacity(members.len());
                for member in members {
                    copied.push(self.deep(member, path, depth + 1)?);
                }
                Ok(Snapshot::SetLike(copied))
            },
            other => Ok(Self::leaf(other)),
        }
    }

    /// Shallow fallback: the value's own top-level entries, with nested
    /// containers reduced to placeholders. Cannot recurse, so it cannot hit
    /// the failure that brought us here.
    fn shallow(&self, value: &HostValue, failure: &CopyFailure) -> Snapshot {
        match value {
            HostValue::Object(entries) => Snapshot::Record(
                entries
                    .iter()
                    .map(|(key, entry)| (key.clone(), Self::shallow_leaf(entry)))
                    .collect(),
            ),
            HostValue::Array(items) => {
                Snapshot::Seq(items.iter().map(Self::shallow_leaf).collect())
            },
            HostValue::Shared(cell) => cell.try_borrow().map_or_else(
                |_| Snapshot::Failure {
                    message: failure.message.clone(),
                    trace: None,
                },
                |inner| self.shallow(&inner, failure),
            ),
            other => Self::shallow_leaf(other),
        }
    }

    /// Converts a value without recursing: primitives and tagged leaves are
    /// copied, anything that would require traversal becomes a placeholder.
    fn shallow_leaf(value: &HostValue) -> Snapshot {
        match value {
            HostValue::Array(_)
            | HostValue::Object(_)
            | HostValue::Shared(_)
            | HostValue::Mapping(_)
            | HostValue::SetLike(_) => Snapshot::Text(format!("[omitted {}]", value.kind())),
            other => Self::leaf(other),
        }
    }

    /// Converts a non-container value.
    fn leaf(value: &HostValue) -> Snapshot {
        match value {
            HostValue::Null => Snapshot::Null,
            HostValue::Bool(b) => Snapshot::Bool(*b),
            HostValue::Number(n) => Snapshot::Number(*n),
            HostValue::Text(s) => Snapshot::Text(s.clone()),
            HostValue::Moment(at) => {
                Snapshot::Moment(at.to_rfc3339_opts(SecondsFormat::Millis, true))
            },
            HostValue::Pattern { source, flags } => Snapshot::Pattern {
                source: source.clone(),
                flags: flags.clone(),
            },
            HostValue::Callable { name } => Snapshot::Callable {
                name: name
                    .clone()
                    .unwrap_or_else(|| ANONYMOUS_CALLABLE.to_string()),
            },
            HostValue::Failure { message, trace } => Snapshot::Failure {
                message: message.clone(),
                trace: trace.clone(),
            },
            // Containers never reach here; deep() and shallow_leaf() handle
            // them first.
            _ => Snapshot::Null,
        }
    }
}
