//! Action execution error types.

/// Specific error conditions for action execution.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ActionErrorKind {
    /// Action identifier is not registered
    #[display("Unknown action: {_0}")]
    UnknownAction(String),
    /// Utterance referenced by an action does not exist
    #[display("Unknown utterance: {_0}")]
    UnknownUtterance(String),
    /// Utterance has no content for the requested language or the fallback
    #[display("Utterance '{utterance}' has no content for language '{language}'")]
    MissingContent {
        /// Utterance name
        utterance: String,
        /// Requested language
        language: String,
    },
    /// Extension action names a handler that was never registered
    #[display("Unknown action handler: {_0}")]
    UnknownHandler(String),
    /// Random utterance action has no utterances to choose from
    #[display("Action '{_0}' has no utterances to choose from")]
    EmptyUtteranceChoice(String),
    /// Action list references form a cycle
    #[display("Action '{_0}' references itself")]
    RecursiveAction(String),
}

/// Action error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Action Error: {} at line {} in {}", kind, line, file)]
pub struct ActionError {
    /// The specific error condition
    pub kind: ActionErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ActionError {
    /// Create a new ActionError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ActionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ActionErrorKind {
        &self.kind
    }
}
