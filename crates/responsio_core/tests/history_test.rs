//! Tests for intent records and history.

use responsio_core::{ActionId, History, IntentRecord, Slots};
use serde_json::json;
use std::sync::Arc;

#[test]
fn test_push_returns_shared_record() {
    let mut history = History::new();
    let shared = history.push(IntentRecord::named("greet"));

    assert_eq!(history.len(), 1);
    assert!(Arc::ptr_eq(&shared, &history.records()[0]));
}

#[test]
fn test_names_in_order() {
    let history: History = ["greet", "tell_name", "bye"]
        .into_iter()
        .map(IntentRecord::named)
        .collect();

    assert_eq!(history.names(), vec!["greet", "tell_name", "bye"]);
}

#[test]
fn test_replace_keeps_shared_records() {
    let mut history: History = ["a", "b", "c"].into_iter().map(IntentRecord::named).collect();
    let kept = vec![Arc::clone(&history.records()[2])];

    history.replace(kept);
    assert_eq!(history.names(), vec!["c"]);

    history.clear();
    assert!(history.is_empty());
}

#[test]
fn test_record_slot_snapshot() {
    let mut slots = Slots::new();
    slots.insert("name".to_string(), json!("Ada"));
    let intent = IntentRecord::named("tell_name")
        .with_entity("name", "Ada")
        .with_slots(slots);

    assert_eq!(intent.entity("name"), Some("Ada"));
    assert_eq!(intent.slot("name"), Some(&json!("Ada")));
    assert!(intent.slot("missing").is_none());
}

#[test]
fn test_history_serializes_as_array() {
    let history: History = ["greet"].into_iter().map(IntentRecord::named).collect();
    let json = serde_json::to_value(&history).expect("serialize");

    assert_eq!(
        json,
        json!([{ "name": "greet", "entities": {}, "slots": {} }])
    );

    let restored: History = serde_json::from_value(json!([{ "name": "greet" }])).expect("parse");
    assert_eq!(restored, history);
}

#[test]
fn test_action_id_display() {
    let action = ActionId::from("utter_greet".to_string());
    assert_eq!(format!("{}", action), "utter_greet");
    assert_eq!(action, ActionId::from("utter_greet"));
}
