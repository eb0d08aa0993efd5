//! Tests for action execution.

use responsio_agent::{
    ActionDefinition, ActionSet, ClientResponse, ClientSession, Utterance, substitute_slots,
};
use responsio_core::{ActionId, Slots};
use responsio_error::{ActionErrorKind, ResponsioErrorKind};
use serde_json::json;
use std::collections::BTreeMap;

fn action_set() -> ActionSet {
    let mut actions = BTreeMap::new();
    actions.insert(
        ActionId::from("utter_hello"),
        ActionDefinition::Utter {
            utterance: "hello".to_string(),
        },
    );
    actions.insert(
        ActionId::from("set_mood"),
        ActionDefinition::SlotSet {
            name: "mood".to_string(),
            value: json!("happy"),
        },
    );
    actions.insert(
        ActionId::from("copy_mood"),
        ActionDefinition::SlotCopy {
            source: "mood".to_string(),
            destination: "last_mood".to_string(),
        },
    );
    actions.insert(
        ActionId::from("clear_mood"),
        ActionDefinition::SlotClear {
            name: "mood".to_string(),
        },
    );
    actions.insert(
        ActionId::from("cheer_up"),
        ActionDefinition::List {
            actions: vec![
                ActionId::from("set_mood"),
                ActionId::from("copy_mood"),
                ActionId::from("utter_hello"),
            ],
        },
    );
    actions.insert(
        ActionId::from("loop"),
        ActionDefinition::List {
            actions: vec![ActionId::from("loop")],
        },
    );
    actions.insert(
        ActionId::from("utter_missing"),
        ActionDefinition::Utter {
            utterance: "missing".to_string(),
        },
    );

    let mut utterances = BTreeMap::new();
    utterances.insert(
        "hello".to_string(),
        Utterance::single("en", "Hello ${name}, you seem ${mood}.").with("de", "Hallo ${name}."),
    );

    ActionSet::new(actions, utterances)
}

fn session() -> ClientSession {
    let mut session = ClientSession::new("test", "u1", "en");
    session.set_slot("name", json!("Ada"));
    session
}

fn action_error_kind(err: &responsio_error::ResponsioError) -> Option<&ActionErrorKind> {
    match err.kind() {
        ResponsioErrorKind::Action(e) => Some(e.kind()),
        _ => None,
    }
}

#[test]
fn test_list_runs_actions_in_order() {
    let actions = action_set();
    let mut session = session();
    let mut response = ClientResponse::new();

    actions
        .perform(&ActionId::from("cheer_up"), &mut session, &mut response)
        .expect("perform");

    assert_eq!(response.texts(), vec!["Hello Ada, you seem happy."]);
    assert_eq!(session.slot("last_mood"), Some(&json!("happy")));
}

#[test]
fn test_slot_clear_and_copy_of_missing_slot() {
    let actions = action_set();
    let mut session = session();
    let mut response = ClientResponse::new();
    session.set_slot("last_mood", json!("sad"));

    actions
        .perform(&ActionId::from("copy_mood"), &mut session, &mut response)
        .expect("perform");
    assert!(session.slot("last_mood").is_none());

    actions
        .perform(&ActionId::from("set_mood"), &mut session, &mut response)
        .expect("perform");
    actions
        .perform(&ActionId::from("clear_mood"), &mut session, &mut response)
        .expect("perform");
    assert!(session.slot("mood").is_none());
    assert!(response.is_empty());
}

#[test]
fn test_utterance_uses_session_language() {
    let actions = action_set();
    let mut session = session();
    session.set_language("de");
    let mut response = ClientResponse::new();

    actions
        .perform(&ActionId::from("utter_hello"), &mut session, &mut response)
        .expect("perform");
    assert_eq!(response.texts(), vec!["Hallo Ada."]);
}

#[test]
fn test_recursive_list_is_an_error() {
    let actions = action_set();
    let mut session = session();
    let mut response = ClientResponse::new();

    let err = actions
        .perform(&ActionId::from("loop"), &mut session, &mut response)
        .expect_err("recursion");
    assert_eq!(
        action_error_kind(&err),
        Some(&ActionErrorKind::RecursiveAction("loop".to_string()))
    );
}

#[test]
fn test_unknown_action_and_utterance() {
    let actions = action_set();
    let mut session = session();
    let mut response = ClientResponse::new();

    let err = actions
        .perform(&ActionId::from("nope"), &mut session, &mut response)
        .expect_err("unknown action");
    assert_eq!(
        action_error_kind(&err),
        Some(&ActionErrorKind::UnknownAction("nope".to_string()))
    );

    let err = actions
        .perform(&ActionId::from("utter_missing"), &mut session, &mut response)
        .expect_err("unknown utterance");
    assert_eq!(
        action_error_kind(&err),
        Some(&ActionErrorKind::UnknownUtterance("missing".to_string()))
    );
}

#[test]
fn test_missing_content_without_fallback() {
    let utterance = Utterance::single("de", "Hallo");
    assert_eq!(utterance.content("de"), Some("Hallo"));
    assert_eq!(utterance.content("fr"), None);

    let mut utterances = BTreeMap::new();
    utterances.insert("hello".to_string(), utterance);
    let actions = ActionSet::new(BTreeMap::new(), utterances);

    let err = actions
        .render("hello", &ClientSession::new("test", "u1", "fr"))
        .expect_err("no content");
    assert_eq!(
        err.kind(),
        &ActionErrorKind::MissingContent {
            utterance: "hello".to_string(),
            language: "fr".to_string()
        }
    );
}

#[test]
fn test_substitution_formats_non_string_slots() {
    let mut slots = Slots::new();
    slots.insert("count".to_string(), json!(3));
    slots.insert("empty".to_string(), json!(null));

    assert_eq!(
        substitute_slots("${count} items${empty}, ${unknown}end", &slots),
        "3 items, end"
    );
}

#[test]
fn test_action_definitions_parse_from_toml() {
    let toml = r#"
        type = "list"
        actions = ["a", "b"]
    "#;
    let action: ActionDefinition = toml::from_str(toml).expect("parse");
    assert_eq!(
        action,
        ActionDefinition::List {
            actions: vec![ActionId::from("a"), ActionId::from("b")]
        }
    );
    assert_eq!(action.type_name(), "list");
}

#[test]
fn test_random_utter_speaks_one_listed_utterance() {
    let mut actions = BTreeMap::new();
    actions.insert(
        ActionId::from("utter_any_greeting"),
        ActionDefinition::RandomUtter {
            utterances: vec!["hi".to_string(), "hello".to_string()],
        },
    );
    let mut utterances = BTreeMap::new();
    utterances.insert("hi".to_string(), Utterance::single("en", "Hi ${name}!"));
    utterances.insert("hello".to_string(), Utterance::single("en", "Hello ${name}!"));
    let actions = ActionSet::new(actions, utterances);
    let mut session = session();

    for _ in 0..20 {
        let mut response = ClientResponse::new();
        actions
            .perform(&ActionId::from("utter_any_greeting"), &mut session, &mut response)
            .expect("perform");
        let texts = response.texts();
        assert_eq!(texts.len(), 1);
        assert!(
            ["Hi Ada!", "Hello Ada!"].contains(&texts[0]),
            "Unexpected utterance: {}",
            texts[0]
        );
    }
}

#[test]
fn test_random_utter_with_no_utterances_is_an_error() {
    let mut actions = BTreeMap::new();
    actions.insert(
        ActionId::from("utter_nothing"),
        ActionDefinition::RandomUtter {
            utterances: Vec::new(),
        },
    );
    let actions = ActionSet::new(actions, BTreeMap::new());
    let mut session = session();
    let mut response = ClientResponse::new();

    let err = actions
        .perform(&ActionId::from("utter_nothing"), &mut session, &mut response)
        .expect_err("empty choice");
    assert_eq!(
        action_error_kind(&err),
        Some(&ActionErrorKind::EmptyUtteranceChoice("utter_nothing".to_string()))
    );
    assert!(response.is_empty());
}

#[test]
fn test_random_utter_parses_from_toml() {
    let action: ActionDefinition = toml::from_str(
        r#"
        type = "random_utter"
        utterances = ["hi", "hello"]
    "#,
    )
    .expect("parse");
    assert_eq!(action.type_name(), "random_utter");
}
