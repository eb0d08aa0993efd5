//! Matching cursor over an intent history window.

use responsio_core::{ActionId, IntentRecord, SharedIntent};

/// Mutable cursor used by one story while matching a history window.
///
/// A fresh narrative is created for every story on every matching pass. Steps
/// advance the cursor as they consume intents, accumulate a score, and record
/// the action of the last leaf that matched. Backtracking steps take a
/// [`Checkpoint`] and restore it when an attempt has to be undone.
///
/// # Examples
///
/// ```
/// use responsio_core::{ActionId, History, IntentRecord};
/// use responsio_story::Narrative;
///
/// let history: History = [IntentRecord::named("greet")].into_iter().collect();
/// let mut narrative = Narrative::new(history.records());
///
/// let checkpoint = narrative.checkpoint();
/// narrative.advance();
/// narrative.add_score(1.0);
/// narrative.set_action(Some(ActionId::from("utter_hello")));
/// assert!(!narrative.has_more());
///
/// checkpoint.restore(&mut narrative);
/// assert_eq!(narrative.cursor(), 0);
/// assert_eq!(narrative.score(), 0.0);
/// assert!(narrative.action().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct Narrative<'h> {
    history: &'h [SharedIntent],
    cursor: usize,
    score: f64,
    action: Option<ActionId>,
}

impl<'h> Narrative<'h> {
    /// Creates a narrative positioned at the start of `history`.
    pub fn new(history: &'h [SharedIntent]) -> Self {
        Self {
            history,
            cursor: 0,
            score: 0.0,
            action: None,
        }
    }

    /// Whether unconsumed intents remain.
    pub fn has_more(&self) -> bool {
        self.cursor < self.history.len()
    }

    /// The intent at the cursor, if any.
    pub fn current(&self) -> Option<&'h IntentRecord> {
        self.history.get(self.cursor).map(|intent| intent.as_ref())
    }

    /// Consumes the intent at the cursor.
    ///
    /// # Panics
    ///
    /// Panics if the history is exhausted. Steps must check
    /// [`has_more`](Self::has_more) first.
    pub fn advance(&mut self) {
        assert!(
            self.cursor < self.history.len(),
            "Invalid advance past end of history"
        );
        self.cursor += 1;
    }

    /// Adds to the running score.
    pub fn add_score(&mut self, delta: f64) {
        self.score += delta;
    }

    /// Records the action of the most recently matched step.
    ///
    /// Later calls overwrite earlier ones, including with `None`.
    pub fn set_action(&mut self, action: Option<ActionId>) {
        self.action = action;
    }

    /// Snapshots the cursor, score and action.
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            cursor: self.cursor,
            score: self.score,
            action: self.action.clone(),
        }
    }

    /// Number of intents consumed so far.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current score.
    pub fn score(&self) -> f64 {
        self.score
    }

    /// Action of the last matched leaf.
    pub fn action(&self) -> Option<&ActionId> {
        self.action.as_ref()
    }

    /// The full window being matched.
    pub fn history(&self) -> &'h [SharedIntent] {
        self.history
    }

    /// Intents consumed so far.
    pub fn used(&self) -> &'h [SharedIntent] {
        &self.history[..self.cursor]
    }

    /// Intents not yet consumed.
    pub fn remaining(&self) -> &'h [SharedIntent] {
        &self.history[self.cursor..]
    }
}

/// Value snapshot of a narrative's cursor, score and action.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct Checkpoint {
    cursor: usize,
    score: f64,
    action: Option<ActionId>,
}

impl Checkpoint {
    /// Resets `narrative` to this snapshot.
    pub fn restore(&self, narrative: &mut Narrative<'_>) {
        narrative.cursor = self.cursor;
        narrative.score = self.score;
        narrative.action = self.action.clone();
    }

    /// Whether `narrative` sits strictly ahead of this snapshot: further along,
    /// or at the same position with a higher score.
    pub fn is_surpassed_by(&self, narrative: &Narrative<'_>) -> bool {
        narrative.cursor > self.cursor
            || (narrative.cursor == self.cursor && narrative.score > self.score)
    }
}
