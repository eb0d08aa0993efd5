//! Story library error types.

/// Specific error conditions raised while building a story library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StoryErrorKind {
    /// Failed to read a story file
    #[display("Failed to read story file: {_0}")]
    FileRead(String),
    /// Failed to parse TOML content
    #[display("Failed to parse TOML: {_0}")]
    TomlParse(String),
    /// A leaf step was defined without an intent matcher
    #[display("Story '{story}' has a leaf step with no intent matcher")]
    MissingMatcher {
        /// Story name
        story: String,
    },
    /// Story root has no steps
    #[display("Story '{_0}' has no steps")]
    EmptyStory(String),
    /// A nested sequence has no steps
    #[display("Story '{_0}' contains an empty sequence")]
    EmptySequence(String),
    /// An alternation has no alternatives
    #[display("Story '{_0}' contains an alternation with no alternatives")]
    EmptyAlternation(String),
    /// An any-of matcher has no inner matchers
    #[display("Story '{_0}' contains an any_of matcher with no matchers")]
    EmptyAnyOf(String),
    /// A repeat step has inconsistent bounds
    #[display("Story '{story}' has a repeat step with min {min} greater than max {max}")]
    InvalidRepeat {
        /// Story name
        story: String,
        /// Minimum repetitions
        min: usize,
        /// Maximum repetitions
        max: usize,
    },
    /// Two stories share a name
    #[display("Story '{_0}' is defined more than once")]
    DuplicateStory(String),
    /// An expression matcher was configured but no evaluator registered
    #[display("No expression evaluator registered for expression '{_0}'")]
    NoExpressionEvaluator(String),
    /// An expression matcher failed to compile
    #[display("Failed to compile intent matcher expression '{expression}': {message}")]
    ExpressionCompile {
        /// Expression source
        expression: String,
        /// Compiler message
        message: String,
    },
    /// The library was built with no stories
    #[display("Story library contains no stories")]
    EmptyLibrary,
}

/// Error type for story library construction.
///
/// # Examples
///
/// ```
/// use responsio_error::{StoryError, StoryErrorKind};
///
/// let err = StoryError::new(StoryErrorKind::EmptyStory("greet".to_string()));
/// assert!(format!("{}", err).contains("no steps"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Story Error: {} at line {} in {}", kind, line, file)]
pub struct StoryError {
    /// The specific error condition
    pub kind: StoryErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl StoryError {
    /// Create a new StoryError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: StoryErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &StoryErrorKind {
        &self.kind
    }
}
