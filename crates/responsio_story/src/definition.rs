//! Serializable story definitions.
//!
//! Story graphs are described as tagged trees: every step and matcher carries
//! a `type` discriminator selecting its variant. Definitions are compiled
//! into runtime [`Story`](crate::Story) values by the
//! [`StoryLibraryBuilder`](crate::StoryLibraryBuilder).
//!
//! ```toml
//! [[stories]]
//! name = "greet_then_name"
//! steps = [
//!     { type = "leaf", intent = "greet", action = "utter_greet" },
//!     { type = "optional", step = { type = "leaf", intent = "small_talk" } },
//!     { type = "leaf", matcher = { type = "any_of", matchers = [
//!         { type = "name", intent = "tell_name" },
//!         { type = "expression", expression = "inform and name" },
//!     ] }, action = "utter_nice_to_meet" },
//! ]
//! ```

use crate::step::{DEFAULT_LEAF_WEIGHT, StepKind};
use crate::story::DEFAULT_COMPLETION_PENALTY;
use responsio_core::ActionId;
use serde::{Deserialize, Serialize};

/// Definition of one story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct StoryDefinition {
    /// Story name, unique within a library
    name: String,
    /// Score subtracted on full completion
    #[serde(default = "default_completion_penalty")]
    completion_penalty: f64,
    /// Steps of the root sequence
    #[serde(default)]
    steps: Vec<StepDefinition>,
}

impl StoryDefinition {
    /// Creates a definition with the default completion penalty.
    pub fn new(name: impl Into<String>, steps: Vec<StepDefinition>) -> Self {
        Self {
            name: name.into(),
            completion_penalty: DEFAULT_COMPLETION_PENALTY,
            steps,
        }
    }

    /// Visits every step definition depth-first.
    pub fn walk<'d>(&'d self, visit: &mut impl FnMut(&'d StepDefinition)) {
        for step in &self.steps {
            step.walk(visit);
        }
    }
}

fn default_completion_penalty() -> f64 {
    DEFAULT_COMPLETION_PENALTY
}

fn default_weight() -> f64 {
    DEFAULT_LEAF_WEIGHT
}

fn default_repeat_max() -> usize {
    1
}

/// Definition of one grammar node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StepDefinition {
    /// Single intent test.
    ///
    /// `intent` is shorthand for a name matcher and is used only when
    /// `matcher` is absent.
    Leaf {
        /// Intent matcher
        #[serde(default, skip_serializing_if = "Option::is_none")]
        matcher: Option<MatcherDefinition>,
        /// Intent name shorthand
        #[serde(default, skip_serializing_if = "Option::is_none")]
        intent: Option<String>,
        /// Score added on match
        #[serde(default = "default_weight")]
        weight: f64,
        /// Action bound to this step
        #[serde(default, skip_serializing_if = "Option::is_none")]
        action: Option<ActionId>,
    },
    /// Ordered children.
    Sequence {
        /// Children in order
        #[serde(default)]
        steps: Vec<StepDefinition>,
    },
    /// Zero or one occurrence of the inner step.
    Optional {
        /// Inner step
        step: Box<StepDefinition>,
    },
    /// Best-matching alternative.
    Alternation {
        /// Alternatives
        #[serde(default)]
        steps: Vec<StepDefinition>,
    },
    /// Bounded repetition of the inner step.
    Repeat {
        /// Inner step
        step: Box<StepDefinition>,
        /// Minimum repetitions
        #[serde(default)]
        min: usize,
        /// Maximum repetitions
        #[serde(default = "default_repeat_max")]
        max: usize,
    },
}

impl StepDefinition {
    /// Leaf matching `intent` by name.
    pub fn intent(intent: impl Into<String>, action: Option<&str>) -> Self {
        StepDefinition::Leaf {
            matcher: None,
            intent: Some(intent.into()),
            weight: DEFAULT_LEAF_WEIGHT,
            action: action.map(ActionId::from),
        }
    }

    /// The discriminator of this node.
    pub fn kind(&self) -> StepKind {
        match self {
            StepDefinition::Leaf { .. } => StepKind::Leaf,
            StepDefinition::Sequence { .. } => StepKind::Sequence,
            StepDefinition::Optional { .. } => StepKind::Optional,
            StepDefinition::Alternation { .. } => StepKind::Alternation,
            StepDefinition::Repeat { .. } => StepKind::Repeat,
        }
    }

    /// The matcher a leaf will use, resolving the `intent` shorthand.
    pub fn leaf_matcher(&self) -> Option<MatcherDefinition> {
        match self {
            StepDefinition::Leaf {
                matcher: Some(matcher),
                ..
            } => Some(matcher.clone()),
            StepDefinition::Leaf {
                intent: Some(intent),
                ..
            } => Some(MatcherDefinition::Name {
                intent: intent.clone(),
            }),
            _ => None,
        }
    }

    /// Visits this node and all descendants depth-first.
    pub fn walk<'d>(&'d self, visit: &mut impl FnMut(&'d StepDefinition)) {
        visit(self);
        match self {
            StepDefinition::Leaf { .. } => {}
            StepDefinition::Sequence { steps } | StepDefinition::Alternation { steps } => {
                for step in steps {
                    step.walk(visit);
                }
            }
            StepDefinition::Optional { step } | StepDefinition::Repeat { step, .. } => {
                step.walk(visit)
            }
        }
    }
}

/// Definition of an intent matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatcherDefinition {
    /// Case-insensitive intent name equality
    Name {
        /// Intent name
        intent: String,
    },
    /// Boolean expression over intent name and entities
    Expression {
        /// Expression source
        expression: String,
    },
    /// Logical or of inner matchers
    AnyOf {
        /// Inner matchers
        matchers: Vec<MatcherDefinition>,
    },
}

impl MatcherDefinition {
    /// Collects every intent name tested by name equality.
    pub fn named_intents(&self) -> Vec<&str> {
        match self {
            MatcherDefinition::Name { intent } => vec![intent.as_str()],
            MatcherDefinition::Expression { .. } => Vec::new(),
            MatcherDefinition::AnyOf { matchers } => {
                matchers.iter().flat_map(|m| m.named_intents()).collect()
            }
        }
    }
}

/// A standalone story file: an ordered `[[stories]]` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoryFile {
    /// Stories in file order
    #[serde(default)]
    pub stories: Vec<StoryDefinition>,
}
