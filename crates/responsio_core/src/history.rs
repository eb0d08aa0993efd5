//! Per-session intent history.

use crate::{IntentRecord, SharedIntent};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Ordered, append-only log of intent records awaiting resolution.
///
/// The history is truncated only by wholesale replacement after a turn has
/// discarded the segments consumed by completed stories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_more::Deref)]
#[serde(transparent)]
pub struct History(Vec<SharedIntent>);

impl History {
    /// Creates an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new record and returns the shared handle to it.
    pub fn push(&mut self, intent: IntentRecord) -> SharedIntent {
        let shared = Arc::new(intent);
        self.0.push(Arc::clone(&shared));
        shared
    }

    /// Returns the records in order.
    pub fn records(&self) -> &[SharedIntent] {
        &self.0
    }

    /// Replaces the retained records.
    pub fn replace(&mut self, records: Vec<SharedIntent>) {
        self.0 = records;
    }

    /// Removes every record.
    pub fn clear(&mut self) {
        self.0.clear();
    }

    /// Returns the intent names in order.
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(|intent| intent.name().as_str()).collect()
    }
}

impl FromIterator<IntentRecord> for History {
    fn from_iter<I: IntoIterator<Item = IntentRecord>>(iter: I) -> Self {
        Self(iter.into_iter().map(Arc::new).collect())
    }
}
