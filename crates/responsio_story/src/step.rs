//! Story grammar nodes and the backtracking matcher.
//!
//! Every node implements the same contract: [`Step::match_narrative`] returns
//! `true` when the node is fully satisfied, having consumed zero or more
//! intents. A `false` return may still have consumed intents (a partial
//! match); callers tell the two apart by comparing the cursor before and
//! after the call.

use crate::matcher::IntentMatcher;
use crate::narrative::{Checkpoint, Narrative};
use responsio_core::ActionId;
use tracing::trace;

/// Default score a leaf adds when it matches.
pub const DEFAULT_LEAF_WEIGHT: f64 = 1.0;

/// Discriminator naming each step kind.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum StepKind {
    /// Single intent test
    Leaf,
    /// Ordered children
    Sequence,
    /// Zero or one occurrence
    Optional,
    /// Best of several alternatives
    Alternation,
    /// Bounded repetition
    Repeat,
}

/// One node of a story grammar.
///
/// Step trees are immutable once built and can be shared across any number
/// of concurrent matches.
#[derive(Debug, Clone)]
pub enum Step {
    /// Matches a single intent.
    Leaf(Leaf),
    /// Matches children in order.
    Sequence(Vec<Step>),
    /// Matches the inner step zero or one times.
    Optional(Box<Step>),
    /// Matches whichever alternative gets furthest.
    Alternation(Vec<Step>),
    /// Matches the inner step between `min` and `max` times.
    Repeat(Repeat),
}

/// Leaf step: an intent matcher with a score weight and a bound action.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct Leaf {
    matcher: IntentMatcher,
    weight: f64,
    action: Option<ActionId>,
}

/// Bounded repetition of an inner step.
#[derive(Debug, Clone, derive_getters::Getters)]
pub struct Repeat {
    step: Box<Step>,
    min: usize,
    max: usize,
}

impl Step {
    /// Builds a leaf step.
    pub fn leaf(matcher: IntentMatcher, weight: f64, action: Option<ActionId>) -> Self {
        Step::Leaf(Leaf {
            matcher,
            weight,
            action,
        })
    }

    /// Builds a leaf matching `intent` by name with the default weight.
    pub fn intent(intent: impl Into<String>, action: Option<ActionId>) -> Self {
        Self::leaf(IntentMatcher::name(intent), DEFAULT_LEAF_WEIGHT, action)
    }

    /// Builds a sequence.
    pub fn sequence(steps: impl IntoIterator<Item = Step>) -> Self {
        Step::Sequence(steps.into_iter().collect())
    }

    /// Builds an optional step.
    pub fn optional(step: Step) -> Self {
        Step::Optional(Box::new(step))
    }

    /// Builds an alternation.
    pub fn alternation(steps: impl IntoIterator<Item = Step>) -> Self {
        Step::Alternation(steps.into_iter().collect())
    }

    /// Builds a bounded repetition.
    pub fn repeat(step: Step, min: usize, max: usize) -> Self {
        Step::Repeat(Repeat {
            step: Box::new(step),
            min,
            max,
        })
    }

    /// The discriminator of this node.
    pub fn kind(&self) -> StepKind {
        match self {
            Step::Leaf(_) => StepKind::Leaf,
            Step::Sequence(_) => StepKind::Sequence,
            Step::Optional(_) => StepKind::Optional,
            Step::Alternation(_) => StepKind::Alternation,
            Step::Repeat(_) => StepKind::Repeat,
        }
    }

    /// Direct children of this node.
    pub fn children(&self) -> Vec<&Step> {
        match self {
            Step::Leaf(_) => Vec::new(),
            Step::Sequence(steps) | Step::Alternation(steps) => steps.iter().collect(),
            Step::Optional(step) => vec![step.as_ref()],
            Step::Repeat(repeat) => vec![repeat.step.as_ref()],
        }
    }

    /// Visits this node and all descendants depth-first.
    pub fn walk<'s>(&'s self, visit: &mut impl FnMut(&'s Step)) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }

    /// Matches this node against the narrative.
    ///
    /// Returns `true` when the node is complete. The narrative is left at the
    /// furthest position this node reached.
    pub fn match_narrative(&self, narrative: &mut Narrative<'_>) -> bool {
        match self {
            Step::Leaf(leaf) => leaf.match_narrative(narrative),
            Step::Sequence(steps) => match_sequence(steps, narrative),
            Step::Optional(step) => match_optional(step, narrative),
            Step::Alternation(steps) => match_alternation(steps, narrative),
            Step::Repeat(repeat) => repeat.match_narrative(narrative),
        }
    }
}

impl Leaf {
    fn match_narrative(&self, narrative: &mut Narrative<'_>) -> bool {
        let Some(intent) = narrative.current() else {
            return false;
        };
        if !self.matcher.matches(intent) {
            return false;
        }

        trace!(intent = %intent.name(), cursor = narrative.cursor(), weight = self.weight, "Leaf matched");
        narrative.advance();
        narrative.add_score(self.weight);
        narrative.set_action(self.action.clone());
        true
    }
}

pub(crate) fn match_sequence(steps: &[Step], narrative: &mut Narrative<'_>) -> bool {
    let mut index = 0;
    while narrative.has_more() && index < steps.len() {
        let step = &steps[index];
        index += 1;
        if !step.match_narrative(narrative) {
            return false;
        }
    }

    // Either every child matched or the narrative ran out first
    index == steps.len()
}

fn match_optional(step: &Step, narrative: &mut Narrative<'_>) -> bool {
    let start = narrative.cursor();
    let complete = step.match_narrative(narrative);

    // No progress means the optional part is simply absent
    narrative.cursor() == start || complete
}

fn match_alternation(steps: &[Step], narrative: &mut Narrative<'_>) -> bool {
    let baseline = narrative.checkpoint();
    let mut best: Option<(Checkpoint, bool)> = None;

    for step in steps {
        baseline.restore(narrative);
        let complete = step.match_narrative(narrative);

        let leader = best.as_ref().map_or(&baseline, |(checkpoint, _)| checkpoint);
        if leader.is_surpassed_by(narrative) {
            best = Some((narrative.checkpoint(), complete));
        }
    }

    match best {
        Some((checkpoint, complete)) => {
            checkpoint.restore(narrative);
            complete
        }
        None => {
            baseline.restore(narrative);
            false
        }
    }
}

impl Repeat {
    fn match_narrative(&self, narrative: &mut Narrative<'_>) -> bool {
        let mut count = 0;
        let mut complete = false;

        while count < self.max && narrative.has_more() {
            let checkpoint = narrative.checkpoint();
            complete = self.step.match_narrative(narrative);

            if !complete {
                // A failure with history left over marks the end of the
                // repeated segment; roll back the partial attempt. With the
                // history exhausted the attempt may still be continued later.
                if narrative.has_more() {
                    checkpoint.restore(narrative);
                    complete = true;
                }
                break;
            }
            count += 1;
        }

        // Below the minimum the narrative keeps whatever the loop left behind
        count >= self.min && complete
    }
}
