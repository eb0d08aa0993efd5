//! Core data types for the Responsio dialogue engine.
//!
//! This crate provides the values shared by the story matcher and the agent:
//! classified intent records, the per-session intent history, and the opaque
//! action identifiers that stories bind to their steps.

mod action;
mod history;
mod intent;
pub mod observability;

pub use action::ActionId;
pub use history::History;
pub use intent::{Entities, IntentRecord, SharedIntent, Slots};
