//! Per-user conversation state.

use chrono::{DateTime, Utc};
use responsio_core::{History, IntentRecord, SharedIntent, Slots};
use responsio_error::SessionError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// Conversation state for one user of one assistant.
///
/// Sessions are independent of each other; processing a turn needs exclusive
/// access to the session it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct ClientSession {
    /// Assistant the session belongs to
    identity: String,
    /// Client-supplied user identifier
    user_id: String,
    /// Preferred language for utterance lookup
    language: String,
    /// Current slot values
    #[serde(default)]
    slots: Slots,
    /// Unresolved intent history
    #[serde(default)]
    history: History,
    /// Time of the last processed input
    last_activity: DateTime<Utc>,
}

impl ClientSession {
    /// Creates an empty session.
    pub fn new(
        identity: impl Into<String>,
        user_id: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            identity: identity.into(),
            user_id: user_id.into(),
            language: language.into(),
            slots: Slots::new(),
            history: History::new(),
            last_activity: Utc::now(),
        }
    }

    /// Loads a previously saved session from JSON.
    pub fn from_json(content: &str) -> Result<Self, SessionError> {
        serde_json::from_str(content)
            .map_err(|e| SessionError::new(format!("Failed to parse session: {}", e)))
    }

    /// Loads a previously saved session from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SessionError::new(format!(
                "Failed to read session file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    /// Serializes the session to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, SessionError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| SessionError::new(format!("Failed to serialize session: {}", e)))
    }

    /// Saves the session as JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SessionError> {
        let path = path.as_ref();
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|e| {
            SessionError::new(format!(
                "Failed to write session file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Changes the preferred language.
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = language.into();
    }

    /// Returns a slot value.
    pub fn slot(&self, name: &str) -> Option<&Value> {
        self.slots.get(name)
    }

    /// Sets a slot value.
    pub fn set_slot(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        debug!(user_id = %self.user_id, slot = %name, "Set slot");
        self.slots.insert(name, value);
    }

    /// Removes a slot, returning its previous value.
    pub fn clear_slot(&mut self, name: &str) -> Option<Value> {
        debug!(user_id = %self.user_id, slot = %name, "Clear slot");
        self.slots.remove(name)
    }

    /// Mutable access to the history.
    pub fn history_mut(&mut self) -> &mut History {
        &mut self.history
    }

    /// Snapshots the current slots into `intent` and appends it to the history.
    pub fn record_intent(&mut self, intent: IntentRecord) -> SharedIntent {
        let intent = intent.with_slots(self.slots.clone());
        self.last_activity = Utc::now();
        self.history.push(intent)
    }

    /// Marks the session as active now.
    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}
