//! Intent matcher predicates.

use crate::expression::{CompiledExpression, ExpressionContext, truthy};
use responsio_core::IntentRecord;
use std::sync::Arc;
use tracing::warn;

/// Boolean test applied by a leaf step to the current intent.
#[derive(Debug, Clone)]
pub enum IntentMatcher {
    /// Matches when the intent name equals this one, ignoring case.
    Name(NameMatcher),
    /// Matches when a compiled boolean expression over the intent is true.
    Expression(ExpressionMatcher),
    /// Matches when any inner matcher does.
    AnyOf(Vec<IntentMatcher>),
}

impl IntentMatcher {
    /// Shorthand for a name matcher.
    pub fn name(intent: impl Into<String>) -> Self {
        Self::Name(NameMatcher::new(intent))
    }

    /// Shorthand for a logical-or composite.
    pub fn any_of(matchers: impl IntoIterator<Item = IntentMatcher>) -> Self {
        Self::AnyOf(matchers.into_iter().collect())
    }

    /// Tests the intent record.
    pub fn matches(&self, intent: &IntentRecord) -> bool {
        match self {
            IntentMatcher::Name(matcher) => matcher.matches(intent),
            IntentMatcher::Expression(matcher) => matcher.matches(intent),
            IntentMatcher::AnyOf(matchers) => matchers.iter().any(|m| m.matches(intent)),
        }
    }

    /// Whether this matcher or a nested one is an any-of with no members.
    pub fn has_empty_any_of(&self) -> bool {
        match self {
            IntentMatcher::AnyOf(matchers) => {
                matchers.is_empty() || matchers.iter().any(IntentMatcher::has_empty_any_of)
            }
            IntentMatcher::Name(_) | IntentMatcher::Expression(_) => false,
        }
    }

    /// Collects every intent name this matcher tests by name equality.
    pub fn named_intents(&self) -> Vec<&str> {
        match self {
            IntentMatcher::Name(matcher) => vec![matcher.intent()],
            IntentMatcher::Expression(_) => Vec::new(),
            IntentMatcher::AnyOf(matchers) => {
                matchers.iter().flat_map(|m| m.named_intents()).collect()
            }
        }
    }
}

/// Intent name equality test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameMatcher {
    intent: String,
    folded: String,
}

impl NameMatcher {
    /// Creates a matcher for the given intent name.
    pub fn new(intent: impl Into<String>) -> Self {
        let intent = intent.into();
        let folded = intent.to_lowercase();
        Self { intent, folded }
    }

    /// The configured intent name.
    pub fn intent(&self) -> &str {
        &self.intent
    }

    /// Tests the intent record.
    pub fn matches(&self, intent: &IntentRecord) -> bool {
        let name = intent.name();
        name.eq_ignore_ascii_case(&self.intent) || name.to_lowercase() == self.folded
    }
}

/// Boolean expression test over the intent name and entities.
#[derive(Debug, Clone)]
pub struct ExpressionMatcher {
    source: String,
    compiled: Arc<dyn CompiledExpression>,
}

impl ExpressionMatcher {
    /// Wraps an already compiled expression.
    pub fn new(source: impl Into<String>, compiled: Arc<dyn CompiledExpression>) -> Self {
        Self {
            source: source.into(),
            compiled,
        }
    }

    /// The expression source text.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Tests the intent record.
    ///
    /// Evaluation failures are logged and count as no match.
    pub fn matches(&self, intent: &IntentRecord) -> bool {
        let context = ExpressionContext::for_intent(intent);
        match self.compiled.evaluate(&context) {
            Ok(value) => truthy(&value),
            Err(e) => {
                warn!(expression = %self.source, intent = %intent.name(), error = %e, "Intent matcher expression failed");
                false
            }
        }
    }
}
