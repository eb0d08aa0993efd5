//! Classified intent records.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Named entities extracted from a single user input.
pub type Entities = BTreeMap<String, String>;

/// Session slot values.
pub type Slots = BTreeMap<String, serde_json::Value>;

/// Intent record shared between the session history and matching windows.
pub type SharedIntent = Arc<IntentRecord>;

/// One classified turn of user input.
///
/// Records are produced by the classifier, appended to the session history,
/// and never mutated afterwards. The slot map is a snapshot of the session
/// slots at the time the input arrived.
///
/// # Examples
///
/// ```
/// use responsio_core::IntentRecord;
///
/// let intent = IntentRecord::named("tell_name").with_entity("name", "Ada");
/// assert_eq!(intent.name(), "tell_name");
/// assert_eq!(intent.entities().get("name").map(String::as_str), Some("Ada"));
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_setters::Setters,
    derive_new::new,
)]
#[setters(prefix = "with_")]
pub struct IntentRecord {
    /// Intent name as determined by the classifier
    #[setters(skip)]
    name: String,
    /// Entities extracted from the input
    #[serde(default)]
    entities: Entities,
    /// Slot snapshot at the time of the turn
    #[serde(default)]
    slots: Slots,
}

impl IntentRecord {
    /// Creates a record with no entities and an empty slot snapshot.
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name.into(), Entities::new(), Slots::new())
    }

    /// Adds a single extracted entity.
    pub fn with_entity(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entities.insert(key.into(), value.into());
        self
    }

    /// Returns an extracted entity value.
    pub fn entity(&self, key: &str) -> Option<&str> {
        self.entities.get(key).map(String::as_str)
    }

    /// Returns a snapshot slot value.
    pub fn slot(&self, key: &str) -> Option<&serde_json::Value> {
        self.slots.get(key)
    }
}
