//! Stories: named root sequences with a completion penalty.

use crate::narrative::Narrative;
use crate::step::Step;
use responsio_core::{ActionId, SharedIntent};

/// Score subtracted from a story that matches to completion.
pub const DEFAULT_COMPLETION_PENALTY: f64 = 0.1;

/// One conversation path registered in a story library.
///
/// When two stories reach the same depth, the completed one scores slightly
/// lower, so the story that can still be extended by later turns is
/// preferred.
///
/// # Examples
///
/// ```
/// use responsio_core::{ActionId, History, IntentRecord};
/// use responsio_story::{Step, Story};
///
/// let story = Story::new(
///     "greet_then_name",
///     [
///         Step::intent("greet", Some(ActionId::from("a1"))),
///         Step::intent("tell_name", Some(ActionId::from("a2"))),
///     ],
/// );
/// let history: History = [IntentRecord::named("greet"), IntentRecord::named("tell_name")]
///     .into_iter()
///     .collect();
///
/// let result = story.evaluate(history.records());
/// assert!(*result.complete());
/// assert_eq!(*result.reached_cursor(), 2);
/// assert_eq!(result.action().as_ref().map(ActionId::as_str), Some("a2"));
/// ```
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct Story {
    /// Story name
    name: String,
    /// Root sequence
    root: Step,
    /// Subtracted from the score on full completion
    completion_penalty: f64,
}

impl Story {
    /// Creates a story whose root sequence holds `steps`.
    pub fn new(name: impl Into<String>, steps: impl IntoIterator<Item = Step>) -> Self {
        Self {
            name: name.into(),
            root: Step::sequence(steps),
            completion_penalty: DEFAULT_COMPLETION_PENALTY,
        }
    }

    /// Overrides the completion penalty.
    pub fn with_completion_penalty(mut self, completion_penalty: f64) -> Self {
        self.completion_penalty = completion_penalty;
        self
    }

    /// Top-level steps of the root sequence.
    pub fn steps(&self) -> &[Step] {
        match &self.root {
            Step::Sequence(steps) => steps,
            other => std::slice::from_ref(other),
        }
    }

    /// Matches the story against the narrative, returning completeness.
    pub fn match_narrative(&self, narrative: &mut Narrative<'_>) -> bool {
        let complete = self.root.match_narrative(narrative);
        if complete {
            narrative.add_score(-self.completion_penalty);
        }
        complete
    }

    /// Matches the story against a fresh narrative over `history`.
    pub fn evaluate(&self, history: &[SharedIntent]) -> MatchResult {
        let mut narrative = Narrative::new(history);
        let complete = self.match_narrative(&mut narrative);
        MatchResult::from_narrative(&narrative, complete)
    }
}

/// Observable outcome of matching one story against one window.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters, derive_new::new)]
pub struct MatchResult {
    /// Number of intents consumed
    reached_cursor: usize,
    /// Score after any completion penalty
    final_score: f64,
    /// Whether the story matched to completion
    complete: bool,
    /// Action of the last matched leaf
    action: Option<ActionId>,
}

impl MatchResult {
    /// Captures the state of a narrative after matching.
    pub fn from_narrative(narrative: &Narrative<'_>, complete: bool) -> Self {
        Self {
            reached_cursor: narrative.cursor(),
            final_score: narrative.score(),
            complete,
            action: narrative.action().cloned(),
        }
    }

    /// Whether any intent was consumed.
    pub fn made_progress(&self) -> bool {
        self.reached_cursor > 0
    }
}
