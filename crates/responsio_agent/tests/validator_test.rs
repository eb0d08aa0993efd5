//! Tests for assistant validation.

use responsio_agent::{
    AssistantDefinition, ValidationConfig, ValidationErrorKind, ValidationWarningKind,
    validate_assistant, validate_assistant_file, validate_assistant_path,
    validate_assistant_with_config,
};
use std::io::Write;

fn parse(toml: &str) -> AssistantDefinition {
    toml.parse().expect("parse assistant")
}

#[test]
fn test_valid_assistant() {
    let definition = parse(
        r#"
        identity = "concierge"

        [utterances.hello]
        en = "Hello!"

        [actions.utter_hello]
        type = "utter"
        utterance = "hello"

        [[stories]]
        name = "greet"
        steps = [{ type = "leaf", intent = "greet", action = "utter_hello" }]

        [[stories]]
        name = "fallback"
        steps = [{ type = "leaf", intent = "oos" }]
    "#,
    );

    let result = validate_assistant(&definition);
    assert!(
        result.is_valid(),
        "Expected valid assistant, got errors: {:?}",
        result.errors
    );
    assert!(result.warnings.is_empty(), "Unexpected warnings: {:?}", result.warnings);
}

#[test]
fn test_empty_library_error() {
    let result = validate_assistant(&parse(r#"identity = "empty""#));

    assert!(!result.is_valid());
    assert!(result.has_error(ValidationErrorKind::EmptyLibrary));
}

#[test]
fn test_unknown_action_with_suggestion() {
    let definition = parse(
        r#"
        identity = "typo"

        [utterances.hello]
        en = "Hello!"

        [actions.utter_hello]
        type = "utter"
        utterance = "hello"

        [[stories]]
        name = "greet"
        steps = [{ type = "leaf", intent = "greet", action = "utter_helo" }]
    "#,
    );

    let result = validate_assistant(&definition);
    let error = result
        .errors
        .iter()
        .find(|e| e.kind == ValidationErrorKind::UnknownAction)
        .expect("unknown action error");
    assert_eq!(error.location.as_deref(), Some("stories.greet"));
    assert_eq!(
        error.suggestion.as_deref(),
        Some("Did you mean 'utter_hello'?")
    );
    assert!(result.format_errors().contains("Undefined action 'utter_helo'"));
}

#[test]
fn test_unknown_utterance_and_welcome_action() {
    let definition = parse(
        r#"
        identity = "broken"
        welcome_action = "utter_welcome"

        [actions.utter_hello]
        type = "utter"
        utterance = "hello"

        [[stories]]
        name = "greet"
        steps = [{ type = "leaf", intent = "greet", action = "utter_hello" }]
    "#,
    );

    let result = validate_assistant(&definition);
    assert!(result.has_error(ValidationErrorKind::UnknownUtterance));
    assert!(
        result
            .errors
            .iter()
            .any(|e| e.kind == ValidationErrorKind::UnknownAction
                && e.location.as_deref() == Some("welcome_action"))
    );
}

#[test]
fn test_structural_errors_are_all_reported() {
    let definition = parse(
        r#"
        identity = "structure"

        [[stories]]
        name = "a"
        steps = [
            { type = "leaf" },
            { type = "sequence", steps = [] },
            { type = "alternation", steps = [] },
            { type = "repeat", min = 2, max = 1, step = { type = "leaf", intent = "x" } },
            { type = "leaf", matcher = { type = "any_of", matchers = [] } },
        ]

        [[stories]]
        name = "a"
        steps = []
    "#,
    );

    let result = validate_assistant(&definition);
    for kind in [
        ValidationErrorKind::MissingMatcher,
        ValidationErrorKind::EmptyContainer,
        ValidationErrorKind::InvalidRepeat,
        ValidationErrorKind::DuplicateStory,
        ValidationErrorKind::EmptyStory,
    ] {
        assert!(result.has_error(kind), "Missing {:?} in {:?}", kind, result.errors);
    }
    assert_eq!(
        result
            .errors
            .iter()
            .filter(|e| e.kind == ValidationErrorKind::EmptyContainer)
            .count(),
        3
    );
}

#[test]
fn test_circular_action_lists() {
    let definition = parse(
        r#"
        identity = "cycle"

        [actions.first]
        type = "list"
        actions = ["second"]

        [actions.second]
        type = "list"
        actions = ["first"]

        [actions.selfish]
        type = "list"
        actions = ["selfish"]

        [[stories]]
        name = "go"
        steps = [
            { type = "leaf", intent = "go", action = "first" },
            { type = "leaf", intent = "again", action = "selfish" },
        ]
    "#,
    );

    let result = validate_assistant(&definition);
    let cycles = result
        .errors
        .iter()
        .filter(|e| e.kind == ValidationErrorKind::CircularAction)
        .count();
    assert_eq!(cycles, 2, "Errors: {:?}", result.errors);
}

#[test]
fn test_unused_and_uncovered_warnings() {
    let definition = parse(
        r#"
        identity = "noisy"

        [utterances.spare]
        en = "Unused"

        [utterances.german]
        de = "Nur Deutsch"

        [actions.spare]
        type = "slot_clear"
        name = "x"

        [actions.utter_german]
        type = "utter"
        utterance = "german"

        [[stories]]
        name = "greet"
        steps = [{ type = "leaf", intent = "greet", action = "utter_german" }]
    "#,
    );

    let result = validate_assistant(&definition);
    assert!(result.is_valid(), "Errors: {:?}", result.errors);
    assert!(result.has_warning(ValidationWarningKind::UnusedAction));
    assert!(result.has_warning(ValidationWarningKind::UnusedUtterance));
    assert!(result.has_warning(ValidationWarningKind::MissingTranslation));
    assert!(result.has_warning(ValidationWarningKind::UncoveredDefaultIntent));

    let quiet = validate_assistant_with_config(
        &definition,
        &ValidationConfig {
            warn_unused: false,
            warn_default_intent: false,
            ..ValidationConfig::default()
        },
    );
    assert!(!quiet.has_warning(ValidationWarningKind::UnusedAction));
    assert!(!quiet.has_warning(ValidationWarningKind::UncoveredDefaultIntent));
}

#[test]
fn test_known_handlers_are_checked_when_given() {
    let definition = parse(
        r#"
        identity = "ext"

        [actions.tell_joke]
        type = "extension"
        handler = "jokes"

        [[stories]]
        name = "joke"
        steps = [{ type = "leaf", intent = "oos", action = "tell_joke" }]
    "#,
    );

    assert!(validate_assistant(&definition).is_valid());

    let config = ValidationConfig {
        known_handlers: Some(["joke".to_string()].into_iter().collect()),
        ..ValidationConfig::default()
    };
    let result = validate_assistant_with_config(&definition, &config);
    let error = result
        .errors
        .iter()
        .find(|e| e.kind == ValidationErrorKind::UnknownHandler)
        .expect("unknown handler");
    assert_eq!(error.suggestion.as_deref(), Some("Did you mean 'joke'?"));
}

#[test]
fn test_validate_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    writeln!(file, "identity = \"file\"").expect("write");

    let result =
        validate_assistant_file(file.path(), &ValidationConfig::default()).expect("parse file");
    assert!(result.has_error(ValidationErrorKind::EmptyLibrary));

    let missing = validate_assistant_file(
        file.path().with_extension("missing"),
        &ValidationConfig::default(),
    );
    assert!(missing.is_err());
}

#[test]
fn test_unreadable_files_are_reported_per_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "identity = [").expect("write broken");
    let valid = dir.path().join("valid.toml");
    std::fs::write(
        &valid,
        r#"
        identity = "ok"

        [[stories]]
        name = "fallback"
        steps = [{ type = "leaf", intent = "oos" }]
    "#,
    )
    .expect("write valid");

    let config = ValidationConfig::default();
    let broken_result = validate_assistant_path(&broken, &config);
    assert!(broken_result.has_error(ValidationErrorKind::UnreadableFile));
    assert_eq!(broken_result.errors.len(), 1);
    assert_eq!(
        broken_result.errors[0].location.as_deref(),
        Some(broken.display().to_string().as_str())
    );

    let missing_result = validate_assistant_path(dir.path().join("absent.toml"), &config);
    assert!(missing_result.has_error(ValidationErrorKind::UnreadableFile));

    assert!(validate_assistant_path(&valid, &config).is_valid());
}

#[test]
fn test_random_utter_references_are_checked() {
    let definition = parse(
        r#"
        identity = "chatty"

        [utterances.hi]
        en = "Hi!"

        [utterances.hello]
        en = "Hello!"

        [actions.greet_randomly]
        type = "random_utter"
        utterances = ["hi", "helo"]

        [actions.say_nothing]
        type = "random_utter"
        utterances = []

        [[stories]]
        name = "greet"
        steps = [
            { type = "leaf", intent = "greet", action = "greet_randomly" },
            { type = "leaf", intent = "oos", action = "say_nothing" },
        ]
    "#,
    );

    let result = validate_assistant(&definition);
    let unknown = result
        .errors
        .iter()
        .find(|e| e.kind == ValidationErrorKind::UnknownUtterance)
        .expect("unknown utterance");
    assert_eq!(unknown.location.as_deref(), Some("actions.greet_randomly"));
    assert_eq!(unknown.suggestion.as_deref(), Some("Did you mean 'hello'?"));

    let empty = result
        .errors
        .iter()
        .find(|e| e.kind == ValidationErrorKind::EmptyContainer)
        .expect("empty utterance list");
    assert_eq!(empty.location.as_deref(), Some("actions.say_nothing"));

    let unused: Vec<_> = result
        .warnings
        .iter()
        .filter(|w| w.kind == ValidationWarningKind::UnusedUtterance)
        .filter_map(|w| w.location.as_deref())
        .collect();
    assert_eq!(unused, vec!["utterances.hello"]);
}
