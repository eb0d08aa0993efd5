//! Action identifiers.

use serde::{Deserialize, Serialize};

/// Opaque handle naming the action bound to a story step.
///
/// The matcher only records which action the deepest matched step carries;
/// interpreting the handle belongs to whoever executes actions.
///
/// # Examples
///
/// ```
/// use responsio_core::ActionId;
///
/// let action = ActionId::from("utter_greet");
/// assert_eq!(action.as_str(), "utter_greet");
/// assert_eq!(action.to_string(), "utter_greet");
/// ```
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::From,
)]
#[serde(transparent)]
pub struct ActionId(String);

impl ActionId {
    /// Returns the action name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ActionId {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for ActionId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
