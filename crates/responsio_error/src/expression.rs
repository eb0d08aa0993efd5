//! Expression evaluation error types.

/// Error raised by an expression evaluator while compiling or evaluating.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Expression Error: {} at line {} in {}", message, line, file)]
pub struct ExpressionError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ExpressionError {
    /// Create a new ExpressionError with the given message at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }
}
