//! Turn resolution over a session's unresolved history.
//!
//! Each turn re-matches every story against the window of history that is
//! still unresolved. The best story's consumed segment is either discarded
//! (the story completed and more history follows it) or stashed on a stack
//! (the story may still continue in a later turn), and matching repeats on
//! what is left until the window is empty.

use responsio_core::{ActionId, History, SharedIntent};
use responsio_story::{Narrative, Story, StoryLibrary};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// How completed stories at the end of a turn affect retained history.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RetentionPolicy {
    /// Drop the segment of a story that completes on the final pass, so a
    /// fully consumed turn leaves nothing behind.
    #[default]
    ReleaseCompleted,
    /// Keep every stashed segment and rewrite history only after a completed
    /// story was discarded mid-turn. A story completing on the final pass is
    /// released on the next turn instead.
    RetainTrailingCompleted,
}

/// A consumed piece of history attributed to one story.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct NarrativeSegment {
    /// Story that matched the segment
    story: String,
    /// Intents consumed by the story
    used: Vec<SharedIntent>,
    /// Score the story reached
    score: f64,
    /// Whether the story matched to completion
    complete: bool,
    /// Action of the deepest matched step
    action: Option<ActionId>,
}

impl NarrativeSegment {
    /// Intent names of the consumed segment.
    pub fn intent_names(&self) -> Vec<&str> {
        self.used.iter().map(|intent| intent.name().as_str()).collect()
    }
}

/// Outcome of a turn that selected at least one story.
#[derive(Debug, Clone, PartialEq, derive_getters::Getters)]
pub struct ResolvedTurn {
    /// Stashed segments, oldest first; the last one selected the action
    segments: Vec<NarrativeSegment>,
    /// Replacement for the session history, when it must be rewritten
    retained: Option<Vec<SharedIntent>>,
    /// Number of matching passes run
    passes: usize,
}

impl ResolvedTurn {
    /// The segment that determines this turn's action.
    pub fn selected(&self) -> Option<&NarrativeSegment> {
        self.segments.last()
    }

    /// The action to execute for this turn.
    pub fn action(&self) -> Option<&ActionId> {
        self.selected().and_then(|segment| segment.action.as_ref())
    }

    /// Name of the story that determines this turn's action.
    pub fn story(&self) -> Option<&str> {
        self.selected().map(|segment| segment.story.as_str())
    }

    /// Whether the story that selected the action completed.
    pub fn is_complete(&self) -> bool {
        self.selected().is_some_and(|segment| segment.complete)
    }

    /// Whether the session history has to be rewritten.
    pub fn rewrites_history(&self) -> bool {
        self.retained.is_some()
    }
}

/// Result of resolving one turn.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnResolution {
    /// A story was selected.
    Resolved(ResolvedTurn),
    /// No story consumed any history.
    Unresolved,
}

impl TurnResolution {
    /// The resolved turn, if any.
    pub fn resolved(&self) -> Option<&ResolvedTurn> {
        match self {
            TurnResolution::Resolved(turn) => Some(turn),
            TurnResolution::Unresolved => None,
        }
    }

    /// Whether no story could be matched.
    pub fn is_unresolved(&self) -> bool {
        matches!(self, TurnResolution::Unresolved)
    }
}

/// Best story found on a single matching pass.
struct PassWinner<'s> {
    story: &'s Story,
    cursor: usize,
    score: f64,
    complete: bool,
    action: Option<ActionId>,
}

/// Resolves turns by repeatedly matching a story library.
///
/// # Examples
///
/// ```
/// use responsio_agent::{TurnOrchestrator, TurnResolution};
/// use responsio_core::{ActionId, History, IntentRecord};
/// use responsio_story::{Step, Story, StoryLibrary};
///
/// let library = StoryLibrary::builder()
///     .story(Story::new(
///         "greet_then_name",
///         [
///             Step::intent("greet", Some(ActionId::from("a1"))),
///             Step::intent("tell_name", Some(ActionId::from("a2"))),
///         ],
///     ))
///     .build()
///     .expect("valid library");
///
/// let mut history: History = [IntentRecord::named("greet"), IntentRecord::named("tell_name")]
///     .into_iter()
///     .collect();
///
/// let resolution = TurnOrchestrator::default().resolve_turn(&library, &mut history);
/// let turn = resolution.resolved().expect("resolved");
/// assert_eq!(turn.action().map(ActionId::as_str), Some("a2"));
/// assert!(history.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, derive_new::new)]
pub struct TurnOrchestrator {
    retention: RetentionPolicy,
}

impl TurnOrchestrator {
    /// The configured retention policy.
    pub fn retention(&self) -> RetentionPolicy {
        self.retention
    }

    /// Resolves a turn and applies any history rewrite in place.
    pub fn resolve_turn(&self, library: &StoryLibrary, history: &mut History) -> TurnResolution {
        let resolution = self.resolve(library, history.records());
        if let TurnResolution::Resolved(turn) = &resolution
            && let Some(retained) = turn.retained()
        {
            history.replace(retained.clone());
        }
        resolution
    }

    /// Resolves a turn over `history` without modifying it.
    #[instrument(skip_all, fields(stories = library.len(), history = history.len()))]
    pub fn resolve(&self, library: &StoryLibrary, history: &[SharedIntent]) -> TurnResolution {
        let mut stack: Vec<NarrativeSegment> = Vec::new();
        let mut window: Vec<SharedIntent> = history.to_vec();
        let mut discarded = false;
        let mut passes = 0;

        while !window.is_empty() {
            passes += 1;
            info!(pass = passes, history = ?intent_names(&window), "Matching stories against history");

            let Some(winner) = best_story(library, &window) else {
                warn!(pass = passes, "No story matched the history");
                return TurnResolution::Unresolved;
            };

            let used = window[..winner.cursor].to_vec();
            let remaining = window[winner.cursor..].to_vec();

            if winner.complete && !remaining.is_empty() {
                debug!(story = %winner.story.name(), "Discarding matched narrative segment");
                discarded = true;

                window = match stack.pop() {
                    Some(previous) => {
                        // Rematch the superseded story in case it continues
                        debug!(story = %previous.story, "Discarding last matched story for rematch");
                        let mut merged = previous.used;
                        merged.extend(remaining);
                        merged
                    }
                    None => remaining,
                };
            } else {
                stack.push(NarrativeSegment {
                    story: winner.story.name().clone(),
                    used,
                    score: winner.score,
                    complete: winner.complete,
                    action: winner.action,
                });
                window = remaining;
            }
        }

        if stack.is_empty() {
            warn!("Empty history, nothing to resolve");
            return TurnResolution::Unresolved;
        }

        info!(
            narrative = %describe_stack(&stack),
            "Resolved narrative"
        );

        let retained = self.retained_history(&stack, discarded);
        TurnResolution::Resolved(ResolvedTurn {
            segments: stack,
            retained,
            passes,
        })
    }

    fn retained_history(
        &self,
        stack: &[NarrativeSegment],
        discarded: bool,
    ) -> Option<Vec<SharedIntent>> {
        match self.retention {
            RetentionPolicy::ReleaseCompleted => {
                let released = stack.iter().any(|segment| segment.complete);
                (discarded || released).then(|| {
                    stack
                        .iter()
                        .filter(|segment| !segment.complete)
                        .flat_map(|segment| segment.used.iter().cloned())
                        .collect()
                })
            }
            RetentionPolicy::RetainTrailingCompleted => discarded.then(|| {
                stack
                    .iter()
                    .flat_map(|segment| segment.used.iter().cloned())
                    .collect()
            }),
        }
    }
}

/// Matches every story against a fresh narrative over `window`.
///
/// Stories that consume nothing are ignored. Among the rest the greatest
/// cursor wins, then the greatest score; earlier stories win exact ties.
fn best_story<'s>(library: &'s StoryLibrary, window: &[SharedIntent]) -> Option<PassWinner<'s>> {
    let mut best: Option<PassWinner<'s>> = None;

    for story in library.iter() {
        let mut narrative = Narrative::new(window);
        let complete = story.match_narrative(&mut narrative);
        let (cursor, score) = (narrative.cursor(), narrative.score());

        if cursor == 0 {
            continue;
        }
        debug!(story = %story.name(), cursor, score, complete, "Story matches");

        let improves = best.as_ref().is_none_or(|current| {
            cursor > current.cursor || (cursor == current.cursor && score > current.score)
        });
        if improves {
            debug!(story = %story.name(), "Found new best story");
            best = Some(PassWinner {
                story,
                cursor,
                score,
                complete,
                action: narrative.action().cloned(),
            });
        }
    }

    best
}

fn intent_names(window: &[SharedIntent]) -> Vec<&str> {
    window.iter().map(|intent| intent.name().as_str()).collect()
}

fn describe_stack(stack: &[NarrativeSegment]) -> String {
    stack
        .iter()
        .map(|segment| format!("{}[{}]", segment.story, segment.intent_names().join(",")))
        .collect::<Vec<_>>()
        .join(",")
}
