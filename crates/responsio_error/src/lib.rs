//! Error types for the Responsio dialogue engine.
//!
//! Every error records the source location where it was created. The
//! crate-level [`ResponsioError`] wraps the per-concern errors so callers can
//! propagate any of them with `?`.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
mod config;
mod expression;
mod session;
mod story;

pub use action::{ActionError, ActionErrorKind};
pub use config::ConfigError;
pub use expression::ExpressionError;
pub use session::SessionError;
pub use story::{StoryError, StoryErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From, derive_more::Display)]
pub enum ResponsioErrorKind {
    /// Configuration error
    #[display("{_0}")]
    Config(ConfigError),
    /// Story library construction error
    #[display("{_0}")]
    Story(StoryError),
    /// Expression compile or evaluation error
    #[display("{_0}")]
    Expression(ExpressionError),
    /// Action execution error
    #[display("{_0}")]
    Action(ActionError),
    /// Session error
    #[display("{_0}")]
    Session(SessionError),
}

/// Responsio error with kind discrimination.
#[derive(Debug, derive_more::Display)]
#[display("Responsio Error: {}", _0)]
pub struct ResponsioError(Box<ResponsioErrorKind>);

impl ResponsioError {
    /// Create a new error from a kind.
    pub fn new(kind: ResponsioErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ResponsioErrorKind {
        &self.0
    }
}

impl std::error::Error for ResponsioError {}

// Generic From implementation for any type that converts to ResponsioErrorKind
impl<T> From<T> for ResponsioError
where
    T: Into<ResponsioErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Responsio operations.
pub type ResponsioResult<T> = std::result::Result<T, ResponsioError>;
