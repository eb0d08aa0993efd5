//! Command-line interface module.

mod chat;
mod commands;
mod validate;

pub use chat::handle_chat_command;
pub use commands::{Cli, Commands, ValidationOutputFormat};
pub use validate::handle_validate_command;
