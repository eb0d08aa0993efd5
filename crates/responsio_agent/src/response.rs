//! Commands returned to the client after a turn.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command name for plain text output.
pub const TEXT_COMMAND: &str = "text";

/// A single command for the client to carry out.
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters, derive_new::new,
)]
pub struct ClientCommand {
    /// Command name
    command: String,
    /// Command payload
    data: Value,
}

/// Ordered list of commands produced by executing actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientResponse {
    commands: Vec<ClientCommand>,
}

impl ClientResponse {
    /// Creates an empty response.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a text command.
    pub fn utter(&mut self, text: impl Into<String>) {
        self.add_command(TEXT_COMMAND, Value::String(text.into()));
    }

    /// Appends an arbitrary command.
    pub fn add_command(&mut self, command: impl Into<String>, data: Value) {
        self.commands.push(ClientCommand::new(command.into(), data));
    }

    /// Appends every command of `other`.
    pub fn extend(&mut self, other: ClientResponse) {
        self.commands.extend(other.commands);
    }

    /// Commands in order.
    pub fn commands(&self) -> &[ClientCommand] {
        &self.commands
    }

    /// Whether the response has no commands.
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Text payloads of every text command, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter(|command| command.command == TEXT_COMMAND)
            .filter_map(|command| command.data.as_str())
            .collect()
    }
}
