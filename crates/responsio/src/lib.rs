//! Responsio: a story-driven dialogue engine.
//!
//! This crate re-exports the workspace crates behind a single dependency:
//!
//! - [`responsio_core`]: intent records, history and action identifiers
//! - [`responsio_story`]: the story grammar and its matcher
//! - [`responsio_agent`]: sessions, actions and turn orchestration
//! - [`responsio_error`]: error types

#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use responsio_agent::*;
pub use responsio_core::*;
pub use responsio_error::*;
pub use responsio_story::*;
