//! Assistant validation with actionable error messages.
//!
//! Validation runs over the declarative [`AssistantDefinition`] before any
//! story is compiled, so every problem in a file is reported at once.

use crate::{ActionDefinition, AssistantDefinition};
use petgraph::algo::kosaraju_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use responsio_core::ActionId;
use responsio_story::{MatcherDefinition, StepDefinition, StoryDefinition};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;

/// Result of validating an assistant definition.
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    /// Validation errors (must be fixed)
    pub errors: Vec<ValidationError>,
    /// Validation warnings (should be reviewed)
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    /// Creates a new validation result with no errors or warnings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if validation passed (no errors).
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Adds an error to the result.
    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Adds a warning to the result.
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Returns true if any error has the given kind.
    pub fn has_error(&self, kind: ValidationErrorKind) -> bool {
        self.errors.iter().any(|error| error.kind == kind)
    }

    /// Returns true if any warning has the given kind.
    pub fn has_warning(&self, kind: ValidationWarningKind) -> bool {
        self.warnings.iter().any(|warning| warning.kind == kind)
    }

    /// Formats errors as a human-readable string.
    pub fn format_errors(&self) -> String {
        let mut output = String::new();

        for (i, error) in self.errors.iter().enumerate() {
            if i > 0 {
                output.push_str("\n\n");
            }
            output.push_str(&format!("Error {}: {}", i + 1, error.message));
            if let Some(section) = &error.location {
                output.push_str(&format!(" (in {})", section));
            }

            if let Some(suggestion) = &error.suggestion {
                output.push_str(&format!("\n\n  Suggestion: {}", suggestion));
            }
        }

        output
    }

    /// Formats warnings as a human-readable string.
    pub fn format_warnings(&self) -> String {
        let mut output = String::new();

        for (i, warning) in self.warnings.iter().enumerate() {
            if i > 0 {
                output.push_str("\n\n");
            }
            output.push_str(&format!("Warning {}: {}", i + 1, warning.message));
        }

        output
    }

    fn error(
        &mut self,
        kind: ValidationErrorKind,
        location: Option<String>,
        message: String,
        suggestion: Option<String>,
    ) {
        self.add_error(ValidationError {
            kind,
            location,
            message,
            suggestion,
        });
    }

    fn warning(&mut self, kind: ValidationWarningKind, location: Option<String>, message: String) {
        self.add_warning(ValidationWarning {
            kind,
            location,
            message,
        });
    }
}

/// A validation error with location and fix suggestion.
#[derive(Debug, Clone)]
pub struct ValidationError {
    /// Type of validation error
    pub kind: ValidationErrorKind,
    /// Section of the assistant file, such as `stories.greet`
    pub location: Option<String>,
    /// Human-readable error message
    pub message: String,
    /// Suggestion on how to fix the error
    pub suggestion: Option<String>,
}

/// A validation warning that should be reviewed.
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    /// Type of validation warning
    pub kind: ValidationWarningKind,
    /// Section of the assistant file
    pub location: Option<String>,
    /// Human-readable warning message
    pub message: String,
}

/// Types of validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationErrorKind {
    /// The file defines no stories
    EmptyLibrary,
    /// Two stories share a name
    DuplicateStory,
    /// A story has no steps
    EmptyStory,
    /// A sequence, alternation, any-of matcher or random utterance list is empty
    EmptyContainer,
    /// A leaf has neither a matcher nor an intent
    MissingMatcher,
    /// A repeat has min greater than max
    InvalidRepeat,
    /// An action identifier is referenced but not defined
    UnknownAction,
    /// An utterance is referenced but not defined
    UnknownUtterance,
    /// An extension action names an unregistered handler
    UnknownHandler,
    /// Action lists reference each other in a cycle
    CircularAction,
    /// The assistant file could not be read or parsed
    UnreadableFile,
}

/// Types of validation warnings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationWarningKind {
    /// Defined action never referenced
    UnusedAction,
    /// Defined utterance never referenced
    UnusedUtterance,
    /// Utterance has no content for the assistant language or the fallback
    MissingTranslation,
    /// No story matches the default intent by name
    UncoveredDefaultIntent,
}

/// Configuration for validation behavior.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Warn on actions and utterances that are never referenced
    pub warn_unused: bool,
    /// Warn when no story handles the default intent
    pub warn_default_intent: bool,
    /// Registered extension handlers, or `None` to skip the check
    pub known_handlers: Option<BTreeSet<String>>,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            warn_unused: true,
            warn_default_intent: true,
            known_handlers: None,
        }
    }
}

/// Validates an assistant definition with the default configuration.
pub fn validate_assistant(definition: &AssistantDefinition) -> ValidationResult {
    validate_assistant_with_config(definition, &ValidationConfig::default())
}

/// Validates an assistant definition.
pub fn validate_assistant_with_config(
    definition: &AssistantDefinition,
    config: &ValidationConfig,
) -> ValidationResult {
    let mut result = ValidationResult::new();
    let mut references = References::default();

    validate_stories(definition, &mut references, &mut result);
    validate_actions(definition, config, &mut references, &mut result);
    check_circular_actions(definition, &mut result);

    for (section, action) in [
        ("welcome_action", definition.welcome_action()),
        ("welcome_back_action", definition.welcome_back_action()),
    ] {
        if let Some(action) = action {
            references.actions.insert(action.clone());
            check_action_reference(definition, action, section.to_string(), &mut result);
        }
    }

    check_translations(definition, &mut result);
    if config.warn_unused {
        check_unused(definition, &references, &mut result);
    }
    if config.warn_default_intent && !references.intents.contains(definition.default_intent()) {
        result.warning(
            ValidationWarningKind::UncoveredDefaultIntent,
            None,
            format!(
                "No story handles the default intent '{}'; unclassified input will go unanswered",
                definition.default_intent()
            ),
        );
    }

    result
}

/// Reads an assistant file and validates it.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid assistant
/// document.
pub fn validate_assistant_file(
    path: impl AsRef<Path>,
    config: &ValidationConfig,
) -> Result<ValidationResult, responsio_error::ConfigError> {
    let definition = AssistantDefinition::from_file(path)?;
    Ok(validate_assistant_with_config(&definition, config))
}

/// Validates an assistant file, reporting a read or parse failure as an
/// `UnreadableFile` error instead of failing.
pub fn validate_assistant_path(
    path: impl AsRef<Path>,
    config: &ValidationConfig,
) -> ValidationResult {
    let path = path.as_ref();
    match validate_assistant_file(path, config) {
        Ok(result) => result,
        Err(e) => {
            let mut result = ValidationResult::new();
            result.error(
                ValidationErrorKind::UnreadableFile,
                Some(path.display().to_string()),
                e.message,
                Some("Check that the file exists and is valid assistant TOML".to_string()),
            );
            result
        }
    }
}

#[derive(Default)]
struct References {
    actions: HashSet<ActionId>,
    utterances: HashSet<String>,
    intents: HashSet<String>,
}

fn validate_stories(
    definition: &AssistantDefinition,
    references: &mut References,
    result: &mut ValidationResult,
) {
    if definition.stories().is_empty() {
        result.error(
            ValidationErrorKind::EmptyLibrary,
            None,
            "Assistant defines no stories".to_string(),
            Some("Add at least one [[stories]] entry".to_string()),
        );
        return;
    }

    let mut names = HashSet::new();
    for story in definition.stories() {
        let section = format!("stories.{}", story.name());
        if !names.insert(story.name().as_str()) {
            result.error(
                ValidationErrorKind::DuplicateStory,
                Some(section.clone()),
                format!("Story '{}' is defined more than once", story.name()),
                Some("Rename one of the stories".to_string()),
            );
        }
        if story.steps().is_empty() {
            result.error(
                ValidationErrorKind::EmptyStory,
                Some(section.clone()),
                format!("Story '{}' has no steps", story.name()),
                None,
            );
        }
        validate_story_steps(definition, story, &section, references, result);
    }
}

fn validate_story_steps(
    definition: &AssistantDefinition,
    story: &StoryDefinition,
    section: &str,
    references: &mut References,
    result: &mut ValidationResult,
) {
    story.walk(&mut |step| match step {
        StepDefinition::Leaf { action, .. } => {
            match step.leaf_matcher() {
                Some(matcher) => {
                    references
                        .intents
                        .extend(matcher.named_intents().into_iter().map(String::from));
                    validate_matcher(&matcher, section, result);
                }
                None => result.error(
                    ValidationErrorKind::MissingMatcher,
                    Some(section.to_string()),
                    format!("Leaf step in story '{}' has no matcher", story.name()),
                    Some("Add `intent = \"...\"` or a `matcher` table to the leaf".to_string()),
                ),
            }
            if let Some(action) = action {
                references.actions.insert(action.clone());
                check_action_reference(definition, action, section.to_string(), result);
            }
        }
        StepDefinition::Sequence { steps } | StepDefinition::Alternation { steps }
            if steps.is_empty() =>
        {
            result.error(
                ValidationErrorKind::EmptyContainer,
                Some(section.to_string()),
                format!(
                    "Empty {} step in story '{}'",
                    step.kind(),
                    story.name()
                ),
                Some("Add child steps or remove the container".to_string()),
            );
        }
        StepDefinition::Repeat { min, max, .. } if min > max => {
            result.error(
                ValidationErrorKind::InvalidRepeat,
                Some(section.to_string()),
                format!(
                    "Repeat in story '{}' has min {} greater than max {}",
                    story.name(),
                    min,
                    max
                ),
                Some(format!("Set max to at least {}", min)),
            );
        }
        _ => {}
    });
}

fn validate_matcher(matcher: &MatcherDefinition, section: &str, result: &mut ValidationResult) {
    if let MatcherDefinition::AnyOf { matchers } = matcher {
        if matchers.is_empty() {
            result.error(
                ValidationErrorKind::EmptyContainer,
                Some(section.to_string()),
                "Empty any_of matcher never matches".to_string(),
                Some("Add inner matchers or use a name matcher".to_string()),
            );
        }
        for inner in matchers {
            validate_matcher(inner, section, result);
        }
    }
}

fn validate_actions(
    definition: &AssistantDefinition,
    config: &ValidationConfig,
    references: &mut References,
    result: &mut ValidationResult,
) {
    for (id, action) in definition.actions() {
        let section = format!("actions.{}", id);
        match action {
            ActionDefinition::Utter { utterance } => {
                references.utterances.insert(utterance.clone());
                check_utterance_reference(definition, id, utterance, section, result);
            }
            ActionDefinition::RandomUtter { utterances } => {
                if utterances.is_empty() {
                    result.error(
                        ValidationErrorKind::EmptyContainer,
                        Some(section.clone()),
                        format!("Action '{}' has no utterances to choose from", id),
                        Some("List at least one utterance or use an utter action".to_string()),
                    );
                }
                for utterance in utterances {
                    references.utterances.insert(utterance.clone());
                    check_utterance_reference(definition, id, utterance, section.clone(), result);
                }
            }
            ActionDefinition::List { actions } => {
                for nested in actions {
                    references.actions.insert(nested.clone());
                    check_action_reference(definition, nested, section.clone(), result);
                }
            }
            ActionDefinition::Extension { handler } => {
                if let Some(known) = &config.known_handlers
                    && !known.contains(handler)
                {
                    result.error(
                        ValidationErrorKind::UnknownHandler,
                        Some(section),
                        format!("Action '{}' uses unregistered handler '{}'", id, handler),
                        find_closest(handler, known.iter())
                            .map(|name| format!("Did you mean '{}'?", name)),
                    );
                }
            }
            ActionDefinition::SlotSet { .. }
            | ActionDefinition::SlotClear { .. }
            | ActionDefinition::SlotCopy { .. } => {}
        }
    }
}

fn check_utterance_reference(
    definition: &AssistantDefinition,
    id: &ActionId,
    utterance: &str,
    section: String,
    result: &mut ValidationResult,
) {
    if definition.utterances().contains_key(utterance) {
        return;
    }
    let suggestion = find_closest(utterance, definition.utterances().keys())
        .map(|name| format!("Did you mean '{}'?", name))
        .or_else(|| Some(format!("Define [utterances.{}]", utterance)));
    result.error(
        ValidationErrorKind::UnknownUtterance,
        Some(section),
        format!("Action '{}' utters undefined utterance '{}'", id, utterance),
        suggestion,
    );
}

fn check_action_reference(
    definition: &AssistantDefinition,
    action: &ActionId,
    section: String,
    result: &mut ValidationResult,
) {
    if definition.actions().contains_key(action) {
        return;
    }
    let suggestion = find_closest(
        action.as_str(),
        definition.actions().keys().map(ActionId::as_str),
    )
    .map(|name| format!("Did you mean '{}'?", name))
    .or_else(|| Some(format!("Define [actions.{}]", action)));
    result.error(
        ValidationErrorKind::UnknownAction,
        Some(section),
        format!("Undefined action '{}'", action),
        suggestion,
    );
}

fn check_translations(definition: &AssistantDefinition, result: &mut ValidationResult) {
    for (name, utterance) in definition.utterances() {
        if utterance.content(definition.language()).is_none() {
            result.warning(
                ValidationWarningKind::MissingTranslation,
                Some(format!("utterances.{}", name)),
                format!(
                    "Utterance '{}' has no content for '{}' or the fallback language",
                    name,
                    definition.language()
                ),
            );
        }
    }
}

fn check_unused(
    definition: &AssistantDefinition,
    references: &References,
    result: &mut ValidationResult,
) {
    for id in definition.actions().keys() {
        if !references.actions.contains(id) {
            result.warning(
                ValidationWarningKind::UnusedAction,
                Some(format!("actions.{}", id)),
                format!("Action '{}' is defined but never used", id),
            );
        }
    }
    for name in definition.utterances().keys() {
        if !references.utterances.contains(name) {
            result.warning(
                ValidationWarningKind::UnusedUtterance,
                Some(format!("utterances.{}", name)),
                format!("Utterance '{}' is defined but never used", name),
            );
        }
    }
}

/// Checks for cycles among list actions.
fn check_circular_actions(definition: &AssistantDefinition, result: &mut ValidationResult) {
    let mut graph = DiGraph::<&str, ()>::new();
    let mut node_map = HashMap::<&str, NodeIndex>::new();

    for (id, action) in definition.actions() {
        if let ActionDefinition::List { actions } = action {
            let from = node_for(&mut graph, &mut node_map, id.as_str());
            for nested in actions {
                let to = node_for(&mut graph, &mut node_map, nested.as_str());
                graph.add_edge(from, to, ());
            }
        }
    }

    for scc in kosaraju_scc(&graph) {
        if scc.len() > 1 {
            let cycle_names: Vec<&str> = scc.iter().map(|&idx| graph[idx]).collect();
            result.error(
                ValidationErrorKind::CircularAction,
                None,
                format!("Circular action list: {}", cycle_names.join(" → ")),
                Some("Remove one of the nested action references".to_string()),
            );
        } else if let &[node] = scc.as_slice()
            && graph.neighbors(node).any(|n| n == node)
        {
            result.error(
                ValidationErrorKind::CircularAction,
                Some(format!("actions.{}", graph[node])),
                format!("Action '{}' lists itself", graph[node]),
                Some("Remove the self-reference".to_string()),
            );
        }
    }
}

fn node_for<'a>(
    graph: &mut DiGraph<&'a str, ()>,
    node_map: &mut HashMap<&'a str, NodeIndex>,
    name: &'a str,
) -> NodeIndex {
    *node_map
        .entry(name)
        .or_insert_with(|| graph.add_node(name))
}

/// Finds the closest defined name within a small edit distance.
fn find_closest<'a, S>(name: &str, candidates: impl IntoIterator<Item = &'a S>) -> Option<&'a str>
where
    S: AsRef<str> + ?Sized + 'a,
{
    let mut best_match: Option<(&str, usize)> = None;
    for candidate in candidates {
        let candidate = candidate.as_ref();
        let distance = levenshtein_distance(name, candidate);
        if distance <= 3 && best_match.is_none_or(|(_, best)| distance < best) {
            best_match = Some((candidate, distance));
        }
    }
    best_match.map(|(candidate, _)| candidate)
}

/// Simple Levenshtein distance calculation.
fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let len2 = s2.chars().count();
    let mut previous: Vec<usize> = (0..=len2).collect();

    for (i, c1) in s1.chars().enumerate() {
        let mut current = vec![i + 1; len2 + 1];
        for (j, c2) in s2.chars().enumerate() {
            let cost = usize::from(c1 != c2);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        previous = current;
    }

    previous[len2]
}
