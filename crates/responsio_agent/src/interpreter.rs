//! Classification of raw chat input into intent records.

use crate::ClientSession;
use responsio_core::IntentRecord;
use responsio_error::ResponsioResult;
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::debug;

/// Turns raw user input into an intent record.
///
/// Returning `Ok(None)` means the input could not be classified; the agent
/// then records the assistant's default intent. Interpreters may promote
/// extracted entities into session slots.
pub trait Interpreter: Send + Sync {
    /// Classifies `input` for `session`.
    fn interpret(
        &self,
        session: &mut ClientSession,
        input: &str,
    ) -> ResponsioResult<Option<IntentRecord>>;
}

/// Interpreter for pre-classified input of the form `intent key=value ...`.
///
/// Useful for scripted conversations and tests. Entities are copied into
/// session slots unless their name is marked local.
///
/// # Examples
///
/// ```
/// use responsio_agent::{ClientSession, DirectInterpreter, Interpreter};
///
/// let mut session = ClientSession::new("concierge", "u1", "en");
/// let intent = DirectInterpreter::default()
///     .interpret(&mut session, "tell_name name=Ada")
///     .expect("interpreted")
///     .expect("classified");
/// assert_eq!(intent.name(), "tell_name");
/// assert_eq!(intent.entity("name"), Some("Ada"));
/// assert_eq!(session.slot("name").and_then(|v| v.as_str()), Some("Ada"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct DirectInterpreter {
    local_entities: BTreeSet<String>,
}

impl DirectInterpreter {
    /// Creates an interpreter that promotes every entity.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks an entity as local to its intent; it is not copied to slots.
    pub fn with_local_entity(mut self, name: impl Into<String>) -> Self {
        self.local_entities.insert(name.into());
        self
    }
}

impl Interpreter for DirectInterpreter {
    fn interpret(
        &self,
        session: &mut ClientSession,
        input: &str,
    ) -> ResponsioResult<Option<IntentRecord>> {
        let mut tokens = input.split_whitespace();
        let Some(name) = tokens.next() else {
            debug!("Intent could not be determined");
            return Ok(None);
        };

        let mut intent = IntentRecord::named(name);
        for token in tokens {
            // Tokens without '=' carry no entity
            if let Some((key, value)) = token.split_once('=')
                && !key.is_empty()
            {
                intent = intent.with_entity(key, value);
            }
        }

        for (key, value) in intent.entities() {
            if !self.local_entities.contains(key) {
                session.set_slot(key.clone(), Value::String(value.clone()));
            }
        }

        debug!(intent = %intent.name(), entities = intent.entities().len(), "Intent");
        Ok(Some(intent))
    }
}
