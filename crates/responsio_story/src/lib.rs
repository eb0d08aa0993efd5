//! Story grammar and narrative matching for the Responsio dialogue engine.
//!
//! A story is a small grammar over classified intents: leaves test a single
//! intent, and sequences, optionals, alternations and bounded repetitions
//! combine them. Matching runs a story against a window of intent history
//! with a backtracking cursor (the [`Narrative`]), scoring how far the story
//! got and recording the action bound to the deepest leaf reached.
//!
//! # Example
//!
//! ```
//! use responsio_core::{ActionId, History, IntentRecord};
//! use responsio_story::{IntentMatcher, Step, Story};
//!
//! let story = Story::new(
//!     "choose",
//!     [Step::alternation([
//!         Step::leaf(IntentMatcher::name("a"), 1.0, Some(ActionId::from("ax"))),
//!         Step::leaf(IntentMatcher::name("b"), 2.0, Some(ActionId::from("ay"))),
//!     ])],
//! )
//! .with_completion_penalty(0.0);
//!
//! let history: History = [IntentRecord::named("b")].into_iter().collect();
//! let result = story.evaluate(history.records());
//! assert_eq!(*result.reached_cursor(), 1);
//! assert_eq!(*result.final_score(), 2.0);
//! assert_eq!(result.action().as_ref().map(ActionId::as_str), Some("ay"));
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod definition;
mod expression;
mod library;
mod matcher;
mod narrative;
mod step;
mod story;

pub use definition::{MatcherDefinition, StepDefinition, StoryDefinition, StoryFile};
pub use expression::{
    CompiledExpression, ExpressionContext, ExpressionEvaluator, ExpressionFunction,
    FunctionRegistry, SLOT_FUNCTION, truthy,
};
pub use library::{StoryLibrary, StoryLibraryBuilder};
pub use matcher::{ExpressionMatcher, IntentMatcher, NameMatcher};
pub use narrative::{Checkpoint, Narrative};
pub use step::{DEFAULT_LEAF_WEIGHT, Leaf, Repeat, Step, StepKind};
pub use story::{DEFAULT_COMPLETION_PENALTY, MatchResult, Story};
