//! Tests for narrative cursors and checkpoints.

use responsio_core::{ActionId, IntentRecord, SharedIntent};
use responsio_story::Narrative;
use std::sync::Arc;

fn history(names: &[&str]) -> Vec<SharedIntent> {
    names
        .iter()
        .map(|name| Arc::new(IntentRecord::named(*name)))
        .collect()
}

#[test]
fn test_new_narrative_starts_at_zero() {
    let history = history(&["a", "b"]);
    let narrative = Narrative::new(&history);

    assert_eq!(narrative.cursor(), 0);
    assert_eq!(narrative.score(), 0.0);
    assert!(narrative.action().is_none());
    assert!(narrative.has_more());
    assert_eq!(narrative.current().map(|i| i.name().as_str()), Some("a"));
}

#[test]
fn test_used_and_remaining_split_at_cursor() {
    let history = history(&["a", "b", "c"]);
    let mut narrative = Narrative::new(&history);
    narrative.advance();

    let used: Vec<&str> = narrative.used().iter().map(|i| i.name().as_str()).collect();
    let remaining: Vec<&str> = narrative
        .remaining()
        .iter()
        .map(|i| i.name().as_str())
        .collect();
    assert_eq!(used, vec!["a"]);
    assert_eq!(remaining, vec!["b", "c"]);
}

#[test]
fn test_checkpoint_restore_is_idempotent() {
    let history = history(&["a", "b", "c"]);
    let mut narrative = Narrative::new(&history);
    narrative.advance();
    narrative.add_score(1.0);
    narrative.set_action(Some(ActionId::from("first")));
    let checkpoint = narrative.checkpoint();

    narrative.advance();
    narrative.add_score(4.0);
    narrative.set_action(Some(ActionId::from("second")));

    checkpoint.restore(&mut narrative);
    let once = narrative.checkpoint();
    checkpoint.restore(&mut narrative);
    let twice = narrative.checkpoint();

    assert_eq!(once, twice);
    assert_eq!(narrative.cursor(), 1);
    assert_eq!(narrative.score(), 1.0);
    assert_eq!(narrative.action().map(ActionId::as_str), Some("first"));
}

#[test]
fn test_checkpoint_comparison_prefers_depth_then_score() {
    let history = history(&["a", "b"]);
    let mut narrative = Narrative::new(&history);
    let start = narrative.checkpoint();

    assert!(!start.is_surpassed_by(&narrative));

    narrative.add_score(1.0);
    assert!(start.is_surpassed_by(&narrative));

    let scored = narrative.checkpoint();
    narrative.add_score(-5.0);
    narrative.advance();
    assert!(scored.is_surpassed_by(&narrative));
}

#[test]
fn test_set_action_overwrites_with_none() {
    let history = history(&["a"]);
    let mut narrative = Narrative::new(&history);
    narrative.set_action(Some(ActionId::from("first")));
    narrative.set_action(None);

    assert!(narrative.action().is_none());
}

#[test]
#[should_panic(expected = "Invalid advance past end of history")]
fn test_advance_past_end_panics() {
    let history = history(&["a"]);
    let mut narrative = Narrative::new(&history);
    narrative.advance();
    narrative.advance();
}
