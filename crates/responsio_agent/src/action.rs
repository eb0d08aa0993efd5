//! Actions and utterances.
//!
//! Actions are the side effects a story step asks for: speaking an
//! utterance (fixed or picked at random), changing slots, or running a list
//! of other actions. Custom
//! behavior is provided by registering an [`ActionHandler`] under a name and
//! referencing it from an `extension` action.

use crate::{ClientResponse, ClientSession};
use rand::seq::SliceRandom;
use regex::Regex;
use responsio_core::ActionId;
use responsio_error::{ActionError, ActionErrorKind, ResponsioResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};
use tracing::{debug, instrument};

/// Language used when an utterance has no content for the session language.
pub const FALLBACK_LANGUAGE: &str = "en";

static SLOT_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid slot placeholder pattern"));

/// Localized text keyed by language code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Utterance(BTreeMap<String, String>);

impl Utterance {
    /// Creates an utterance with content for a single language.
    pub fn single(language: impl Into<String>, text: impl Into<String>) -> Self {
        let mut content = BTreeMap::new();
        content.insert(language.into(), text.into());
        Self(content)
    }

    /// Adds content for another language.
    pub fn with(mut self, language: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(language.into(), text.into());
        self
    }

    /// Content for `language`, falling back to English.
    pub fn content(&self, language: &str) -> Option<&str> {
        self.0
            .get(language)
            .or_else(|| self.0.get(FALLBACK_LANGUAGE))
            .map(String::as_str)
    }

    /// Languages with content.
    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Whether no language has content.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Replaces `${slot}` placeholders with session slot values.
///
/// String slots are inserted verbatim, other values in their JSON form.
/// Missing slots become the empty string.
///
/// # Examples
///
/// ```
/// use responsio_agent::substitute_slots;
/// use responsio_core::Slots;
///
/// let mut slots = Slots::new();
/// slots.insert("name".into(), "Ada".into());
/// assert_eq!(substitute_slots("Hi ${name}${mood}!", &slots), "Hi Ada!");
/// ```
pub fn substitute_slots(template: &str, slots: &responsio_core::Slots) -> String {
    SLOT_PLACEHOLDER
        .replace_all(template, |captures: &regex::Captures<'_>| {
            match slots.get(&captures[1]) {
                Some(Value::String(text)) => text.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            }
        })
        .into_owned()
}

/// Declarative action as written in an assistant file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActionDefinition {
    /// Speak an utterance
    Utter {
        /// Utterance name
        utterance: String,
    },
    /// Speak one of several utterances, chosen at random
    RandomUtter {
        /// Candidate utterance names
        utterances: Vec<String>,
    },
    /// Set a slot to a fixed value
    SlotSet {
        /// Slot name
        name: String,
        /// Value to store
        value: Value,
    },
    /// Remove a slot
    SlotClear {
        /// Slot name
        name: String,
    },
    /// Copy one slot into another
    SlotCopy {
        /// Slot to read
        source: String,
        /// Slot to write
        destination: String,
    },
    /// Run other actions in order
    List {
        /// Actions to run
        actions: Vec<ActionId>,
    },
    /// Run a registered handler
    Extension {
        /// Handler name
        handler: String,
    },
}

impl ActionDefinition {
    /// Variant name as used in the `type` key.
    pub fn type_name(&self) -> &'static str {
        match self {
            ActionDefinition::Utter { .. } => "utter",
            ActionDefinition::RandomUtter { .. } => "random_utter",
            ActionDefinition::SlotSet { .. } => "slot_set",
            ActionDefinition::SlotClear { .. } => "slot_clear",
            ActionDefinition::SlotCopy { .. } => "slot_copy",
            ActionDefinition::List { .. } => "list",
            ActionDefinition::Extension { .. } => "extension",
        }
    }
}

/// Custom action behavior registered by the embedding application.
pub trait ActionHandler: Send + Sync {
    /// Runs the action against a session, appending to `response`.
    fn perform(
        &self,
        session: &mut ClientSession,
        response: &mut ClientResponse,
    ) -> ResponsioResult<()>;
}

impl<F> ActionHandler for F
where
    F: Fn(&mut ClientSession, &mut ClientResponse) -> ResponsioResult<()> + Send + Sync,
{
    fn perform(
        &self,
        session: &mut ClientSession,
        response: &mut ClientResponse,
    ) -> ResponsioResult<()> {
        self(session, response)
    }
}

/// Registered actions, utterances and handlers of one assistant.
#[derive(Clone, Default)]
pub struct ActionSet {
    actions: BTreeMap<ActionId, ActionDefinition>,
    utterances: BTreeMap<String, Utterance>,
    handlers: BTreeMap<String, Arc<dyn ActionHandler>>,
}

impl fmt::Debug for ActionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionSet")
            .field("actions", &self.actions)
            .field("utterances", &self.utterances)
            .field("handlers", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ActionSet {
    /// Creates an action set.
    pub fn new(
        actions: BTreeMap<ActionId, ActionDefinition>,
        utterances: BTreeMap<String, Utterance>,
    ) -> Self {
        Self {
            actions,
            utterances,
            handlers: BTreeMap::new(),
        }
    }

    /// Registers an extension handler.
    pub fn register_handler(&mut self, name: impl Into<String>, handler: Arc<dyn ActionHandler>) {
        self.handlers.insert(name.into(), handler);
    }

    /// Looks up an action.
    pub fn action(&self, id: &ActionId) -> Option<&ActionDefinition> {
        self.actions.get(id)
    }

    /// Looks up an utterance.
    pub fn utterance(&self, name: &str) -> Option<&Utterance> {
        self.utterances.get(name)
    }

    /// Names of registered handlers.
    pub fn handler_names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }

    /// Executes an action, appending its output to `response`.
    #[instrument(skip(self, session, response), fields(user_id = %session.user_id()))]
    pub fn perform(
        &self,
        id: &ActionId,
        session: &mut ClientSession,
        response: &mut ClientResponse,
    ) -> ResponsioResult<()> {
        let mut active = Vec::new();
        self.perform_nested(id, session, response, &mut active)
    }

    fn perform_nested<'a>(
        &'a self,
        id: &'a ActionId,
        session: &mut ClientSession,
        response: &mut ClientResponse,
        active: &mut Vec<&'a ActionId>,
    ) -> ResponsioResult<()> {
        if active.contains(&id) {
            return Err(ActionError::new(ActionErrorKind::RecursiveAction(id.to_string())).into());
        }

        let definition = self
            .actions
            .get(id)
            .ok_or_else(|| ActionError::new(ActionErrorKind::UnknownAction(id.to_string())))?;
        debug!(action = %id, kind = definition.type_name(), "Performing action");

        match definition {
            ActionDefinition::Utter { utterance } => {
                let text = self.render(utterance, session)?;
                response.utter(text);
            }
            ActionDefinition::RandomUtter { utterances } => {
                let utterance = utterances.choose(&mut rand::thread_rng()).ok_or_else(|| {
                    ActionError::new(ActionErrorKind::EmptyUtteranceChoice(id.to_string()))
                })?;
                debug!(action = %id, utterance = %utterance, "Chose utterance");
                let text = self.render(utterance, session)?;
                response.utter(text);
            }
            ActionDefinition::SlotSet { name, value } => {
                session.set_slot(name.clone(), value.clone());
            }
            ActionDefinition::SlotClear { name } => {
                session.clear_slot(name);
            }
            ActionDefinition::SlotCopy {
                source,
                destination,
            } => match session.slot(source).cloned() {
                Some(value) => session.set_slot(destination.clone(), value),
                None => {
                    session.clear_slot(destination);
                }
            },
            ActionDefinition::List { actions } => {
                active.push(id);
                for nested in actions {
                    self.perform_nested(nested, session, response, active)?;
                }
                active.pop();
            }
            ActionDefinition::Extension { handler } => {
                let handler = self.handlers.get(handler).ok_or_else(|| {
                    ActionError::new(ActionErrorKind::UnknownHandler(handler.clone()))
                })?;
                handler.perform(session, response)?;
            }
        }
        Ok(())
    }

    /// Renders an utterance in the session language with slot substitution.
    pub fn render(&self, utterance: &str, session: &ClientSession) -> Result<String, ActionError> {
        let content = self
            .utterances
            .get(utterance)
            .ok_or_else(|| ActionError::new(ActionErrorKind::UnknownUtterance(utterance.into())))?;
        let template = content.content(session.language()).ok_or_else(|| {
            ActionError::new(ActionErrorKind::MissingContent {
                utterance: utterance.into(),
                language: session.language().clone(),
            })
        })?;
        Ok(substitute_slots(template, session.slots()))
    }
}
