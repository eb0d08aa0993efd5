//! Assistant definitions and the runtime assistant built from them.
//!
//! An assistant file is a single TOML document:
//!
//! ```toml
//! identity = "concierge"
//! language = "en"
//! default_intent = "oos"
//! welcome_action = "utter_welcome"
//!
//! [utterances.welcome]
//! en = "Hello!"
//! de = "Hallo!"
//!
//! [actions.utter_welcome]
//! type = "utter"
//! utterance = "welcome"
//!
//! [[stories]]
//! name = "greet"
//! steps = [{ type = "leaf", intent = "greet", action = "utter_welcome" }]
//! ```

use crate::validator::{ValidationConfig, validate_assistant_with_config};
use crate::{
    ActionDefinition, ActionHandler, ActionSet, RetentionPolicy, TurnOrchestrator, Utterance,
};
use responsio_core::ActionId;
use responsio_error::{ConfigError, ResponsioResult};
use responsio_story::{ExpressionEvaluator, ExpressionFunction, StoryDefinition, StoryLibrary};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// Intent recorded when the interpreter cannot classify an input.
pub const DEFAULT_INTENT: &str = "oos";

/// Language used when an assistant file does not name one.
pub const DEFAULT_LANGUAGE: &str = "en";

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

fn default_intent() -> String {
    DEFAULT_INTENT.to_string()
}

/// Declarative content of an assistant file.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters, derive_setters::Setters,
)]
#[setters(prefix = "with_", into)]
pub struct AssistantDefinition {
    /// Assistant name
    identity: String,
    /// Language of new sessions
    #[serde(default = "default_language")]
    language: String,
    /// Intent recorded for unclassified input
    #[serde(default = "default_intent")]
    default_intent: String,
    /// Action run when a new session starts
    #[serde(default, skip_serializing_if = "Option::is_none")]
    welcome_action: Option<ActionId>,
    /// Action run when a returning session resumes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    welcome_back_action: Option<ActionId>,
    /// History retention policy
    #[serde(default)]
    retention: RetentionPolicy,
    /// Utterances by name
    #[serde(default)]
    utterances: BTreeMap<String, Utterance>,
    /// Actions by identifier
    #[serde(default)]
    actions: BTreeMap<ActionId, ActionDefinition>,
    /// Stories in priority order
    #[serde(default)]
    stories: Vec<StoryDefinition>,
}

impl AssistantDefinition {
    /// Creates an empty definition with default language and intent.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
            language: default_language(),
            default_intent: default_intent(),
            welcome_action: None,
            welcome_back_action: None,
            retention: RetentionPolicy::default(),
            utterances: BTreeMap::new(),
            actions: BTreeMap::new(),
            stories: Vec::new(),
        }
    }

    /// Loads a definition from a TOML file.
    #[instrument(skip(path))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ConfigError::new(format!(
                "Failed to read assistant file {}: {}",
                path.display(),
                e
            ))
        })?;
        content.parse()
    }

    /// Adds an utterance.
    pub fn utterance(mut self, name: impl Into<String>, utterance: Utterance) -> Self {
        self.utterances.insert(name.into(), utterance);
        self
    }

    /// Adds an action.
    pub fn action(mut self, id: impl Into<ActionId>, action: ActionDefinition) -> Self {
        self.actions.insert(id.into(), action);
        self
    }

    /// Appends a story.
    pub fn story(mut self, story: StoryDefinition) -> Self {
        self.stories.push(story);
        self
    }
}

impl FromStr for AssistantDefinition {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse assistant: {}", e)))
    }
}

/// A validated assistant ready to process turns.
#[derive(Debug, derive_getters::Getters)]
pub struct Assistant {
    /// Assistant name
    identity: String,
    /// Language of new sessions
    language: String,
    /// Intent recorded for unclassified input
    default_intent: String,
    /// Action run when a new session starts
    welcome_action: Option<ActionId>,
    /// Action run when a returning session resumes
    welcome_back_action: Option<ActionId>,
    /// Compiled stories
    library: StoryLibrary,
    /// Actions and utterances
    actions: ActionSet,
    /// Turn resolver
    orchestrator: TurnOrchestrator,
}

impl Assistant {
    /// Starts building an assistant from a definition.
    pub fn builder(definition: AssistantDefinition) -> AssistantBuilder {
        AssistantBuilder::new(definition)
    }

    /// Parses and builds an assistant from TOML.
    pub fn from_toml_str(content: &str) -> ResponsioResult<Self> {
        let definition: AssistantDefinition = content.parse()?;
        Self::builder(definition).build()
    }

    /// Loads and builds an assistant from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> ResponsioResult<Self> {
        Self::builder(AssistantDefinition::from_file(path)?).build()
    }
}

/// Builder attaching runtime collaborators to an assistant definition.
pub struct AssistantBuilder {
    definition: AssistantDefinition,
    evaluator: Option<Arc<dyn ExpressionEvaluator>>,
    functions: Vec<(String, ExpressionFunction)>,
    handlers: BTreeMap<String, Arc<dyn ActionHandler>>,
}

impl AssistantBuilder {
    /// Creates a builder with no evaluator and no handlers.
    pub fn new(definition: AssistantDefinition) -> Self {
        Self {
            definition,
            evaluator: None,
            functions: Vec::new(),
            handlers: BTreeMap::new(),
        }
    }

    /// Sets the evaluator used for expression matchers.
    pub fn expression_evaluator(mut self, evaluator: Arc<dyn ExpressionEvaluator>) -> Self {
        self.evaluator = Some(evaluator);
        self
    }

    /// Registers an expression function.
    pub fn function(mut self, name: impl Into<String>, function: ExpressionFunction) -> Self {
        self.functions.push((name.into(), function));
        self
    }

    /// Registers a handler for `extension` actions.
    pub fn handler(mut self, name: impl Into<String>, handler: Arc<dyn ActionHandler>) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    /// Validates the definition and compiles its stories.
    ///
    /// # Errors
    ///
    /// Returns a configuration error listing every validation error, or the
    /// story error raised while compiling the library.
    #[instrument(skip_all, fields(identity = %self.definition.identity()))]
    pub fn build(self) -> ResponsioResult<Assistant> {
        let config = ValidationConfig {
            known_handlers: Some(self.handlers.keys().cloned().collect()),
            ..ValidationConfig::default()
        };
        let validation = validate_assistant_with_config(&self.definition, &config);
        if !validation.warnings.is_empty() {
            warn!(
                warnings = validation.warnings.len(),
                "Assistant has warnings:\n{}",
                validation.format_warnings()
            );
        }
        if !validation.is_valid() {
            return Err(ConfigError::new(format!(
                "Assistant '{}' is invalid:\n{}",
                self.definition.identity(),
                validation.format_errors()
            ))
            .into());
        }

        let definition = self.definition;
        let mut library = StoryLibrary::builder();
        if let Some(evaluator) = self.evaluator {
            library = library.expression_evaluator(evaluator);
        }
        for (name, function) in self.functions {
            library = library.function(name, function);
        }
        let library = library.definitions(definition.stories).build()?;

        let mut actions = ActionSet::new(definition.actions, definition.utterances);
        for (name, handler) in self.handlers {
            actions.register_handler(name, handler);
        }

        info!(
            identity = %definition.identity,
            stories = library.len(),
            retention = %definition.retention,
            "Assistant ready"
        );

        Ok(Assistant {
            identity: definition.identity,
            language: definition.language,
            default_intent: definition.default_intent,
            welcome_action: definition.welcome_action,
            welcome_back_action: definition.welcome_back_action,
            library,
            actions,
            orchestrator: TurnOrchestrator::new(definition.retention),
        })
    }
}
