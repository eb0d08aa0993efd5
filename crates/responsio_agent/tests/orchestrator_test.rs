//! Tests for turn resolution across stories and turns.

use responsio_agent::{RetentionPolicy, TurnOrchestrator, TurnResolution};
use responsio_core::{ActionId, History, IntentRecord};
use responsio_story::{Step, Story, StoryLibrary};

fn leaf(intent: &str, weight: f64, action: &str) -> Step {
    Step::leaf(
        responsio_story::IntentMatcher::name(intent),
        weight,
        Some(ActionId::from(action)),
    )
}

fn greet_then_name() -> Story {
    Story::new(
        "greet_then_name",
        [leaf("greet", 1.0, "a1"), leaf("tell_name", 1.0, "a2")],
    )
}

fn weather() -> Story {
    Story::new("weather", [leaf("ask_weather", 1.0, "utter_weather")])
}

fn library(stories: impl IntoIterator<Item = Story>) -> StoryLibrary {
    stories
        .into_iter()
        .fold(StoryLibrary::builder(), |builder, story| builder.story(story))
        .build()
        .expect("valid library")
}

fn history(names: &[&str]) -> History {
    names.iter().map(|name| IntentRecord::named(*name)).collect()
}

fn action_of(resolution: &TurnResolution) -> Option<&str> {
    resolution
        .resolved()
        .and_then(|turn| turn.action())
        .map(ActionId::as_str)
}

#[test]
fn test_full_story_consumes_history() {
    let library = library([greet_then_name()]);
    let mut history = history(&["greet", "tell_name"]);

    let resolution = TurnOrchestrator::default().resolve_turn(&library, &mut history);

    let turn = resolution.resolved().expect("resolved");
    assert_eq!(turn.story(), Some("greet_then_name"));
    assert!(turn.is_complete());
    assert_eq!(turn.selected().map(|s| s.used().len()), Some(2));
    assert_eq!(action_of(&resolution), Some("a2"));
    assert!(history.is_empty());
}

#[test]
fn test_alternation_story_selects_weighted_branch() {
    let library = library([Story::new(
        "choice",
        [Step::alternation([leaf("a", 1.0, "ax"), leaf("b", 2.0, "ay")])],
    )]);
    let mut history = history(&["b"]);

    let resolution = TurnOrchestrator::default().resolve_turn(&library, &mut history);

    let turn = resolution.resolved().expect("resolved");
    assert_eq!(action_of(&resolution), Some("ay"));
    assert_eq!(turn.selected().map(|s| s.used().len()), Some(1));
    assert!((turn.selected().map(|s| *s.score()).unwrap_or_default() - 1.9).abs() < 1e-9);
}

#[test]
fn test_partial_story_is_carried_to_next_turn() {
    let library = library([greet_then_name()]);
    let orchestrator = TurnOrchestrator::default();
    let mut history = history(&["greet"]);

    let first = orchestrator.resolve_turn(&library, &mut history);
    let turn = first.resolved().expect("resolved");
    assert!(!turn.is_complete());
    assert!(!turn.rewrites_history());
    assert_eq!(action_of(&first), Some("a1"));
    assert_eq!(history.names(), vec!["greet"]);

    history.push(IntentRecord::named("tell_name"));
    let second = orchestrator.resolve_turn(&library, &mut history);
    assert_eq!(action_of(&second), Some("a2"));
    assert!(history.is_empty());
}

#[test]
fn test_no_story_advancing_is_unresolved() {
    let library = library([greet_then_name()]);
    let mut history = history(&["greet", "tell_name", "mumble"]);

    let resolution = TurnOrchestrator::default().resolve_turn(&library, &mut history);

    assert!(resolution.is_unresolved());
    assert_eq!(history.len(), 3);
}

#[test]
fn test_empty_history_is_unresolved() {
    let library = library([greet_then_name()]);
    let mut history = History::new();

    assert!(
        TurnOrchestrator::default()
            .resolve_turn(&library, &mut history)
            .is_unresolved()
    );
}

#[test]
fn test_completed_prefix_is_discarded() {
    let library = library([greet_then_name(), weather()]);
    let mut history = history(&["greet", "tell_name", "ask_weather"]);

    let resolution = TurnOrchestrator::default().resolve_turn(&library, &mut history);

    let turn = resolution.resolved().expect("resolved");
    assert_eq!(turn.story(), Some("weather"));
    assert_eq!(*turn.passes(), 2);
    assert_eq!(turn.segments().len(), 1);
    assert!(history.is_empty());
}

#[test]
fn test_interleaved_story_keeps_pending_segment() {
    let library = library([greet_then_name(), weather()]);
    let orchestrator = TurnOrchestrator::default();
    let mut history = history(&["greet", "ask_weather"]);

    let resolution = orchestrator.resolve_turn(&library, &mut history);

    let turn = resolution.resolved().expect("resolved");
    let stories: Vec<&str> = turn.segments().iter().map(|s| s.story().as_str()).collect();
    assert_eq!(stories, vec!["greet_then_name", "weather"]);
    assert_eq!(action_of(&resolution), Some("utter_weather"));
    assert_eq!(history.names(), vec!["greet"]);

    history.push(IntentRecord::named("tell_name"));
    let next = orchestrator.resolve_turn(&library, &mut history);
    assert_eq!(action_of(&next), Some("a2"));
    assert!(history.is_empty());
}

#[test]
fn test_superseded_segment_is_rematched() {
    let library = library([greet_then_name(), weather()]);
    let mut history = history(&["greet", "ask_weather", "tell_name"]);

    let resolution = TurnOrchestrator::default().resolve_turn(&library, &mut history);

    let turn = resolution.resolved().expect("resolved");
    assert_eq!(*turn.passes(), 3);
    assert_eq!(turn.story(), Some("greet_then_name"));
    assert_eq!(
        turn.selected().map(|s| s.intent_names()),
        Some(vec!["greet", "tell_name"])
    );
    assert_eq!(action_of(&resolution), Some("a2"));
    assert!(history.is_empty());
}

#[test]
fn test_retain_trailing_completed_keeps_final_story() {
    let library = library([greet_then_name(), weather()]);
    let orchestrator = TurnOrchestrator::new(RetentionPolicy::RetainTrailingCompleted);

    let mut discarded = history(&["greet", "tell_name", "ask_weather"]);
    orchestrator.resolve_turn(&library, &mut discarded);
    assert_eq!(discarded.names(), vec!["ask_weather"]);

    let mut consumed = history(&["greet", "tell_name"]);
    orchestrator.resolve_turn(&library, &mut consumed);
    assert_eq!(consumed.names(), vec!["greet", "tell_name"]);
}

#[test]
fn test_tie_goes_to_first_registered_story() {
    let library = library([
        Story::new("first", [leaf("greet", 1.0, "from_first")]),
        Story::new("second", [leaf("greet", 1.0, "from_second")]),
    ]);
    let mut history = history(&["greet"]);

    let resolution = TurnOrchestrator::default().resolve_turn(&library, &mut history);
    assert_eq!(action_of(&resolution), Some("from_first"));
}

#[test]
fn test_extensible_story_beats_completed_one_at_equal_depth() {
    let library = library([
        Story::new("complete", [leaf("greet", 1.0, "closed")]),
        Story::new(
            "open",
            [leaf("greet", 1.0, "continues"), leaf("tell_name", 1.0, "later")],
        ),
    ]);
    let mut history = history(&["greet"]);

    let resolution = TurnOrchestrator::default().resolve_turn(&library, &mut history);
    assert_eq!(action_of(&resolution), Some("continues"));
    assert_eq!(history.names(), vec!["greet"]);
}

#[test]
fn test_resolve_does_not_touch_input() {
    let library = library([greet_then_name()]);
    let history = history(&["greet", "tell_name"]);

    let resolution = TurnOrchestrator::default().resolve(&library, history.records());

    let turn = resolution.resolved().expect("resolved");
    assert_eq!(turn.retained().as_ref().map(Vec::len), Some(0));
    assert_eq!(history.len(), 2);
}
