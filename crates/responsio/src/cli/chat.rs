//! Interactive chat command handler.

use responsio_agent::{Agent, Assistant, ClientResponse, ClientSession, DirectInterpreter, TurnReply};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

const QUIT_COMMAND: &str = ":quit";

/// Handles the chat command.
///
/// Each stdin line is passed to a [`DirectInterpreter`]. Text commands are
/// printed as plain lines, other commands as JSON.
#[tracing::instrument(skip_all, fields(file = %file.display(), user = %user))]
pub fn handle_chat_command(
    file: PathBuf,
    user: String,
    session_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let assistant = Assistant::from_file(&file)?;
    let agent = Agent::new(Arc::new(assistant), DirectInterpreter::new());

    let resumed = session_path
        .as_ref()
        .filter(|path| path.is_file())
        .map(ClientSession::from_file)
        .transpose()?;

    let mut stdout = std::io::stdout().lock();
    let mut session = match resumed {
        Some(mut session) => {
            tracing::info!("Resuming session");
            print_response(&mut stdout, &agent.welcome_back(&mut session)?)?;
            session
        }
        None => {
            let mut session = agent.new_session(user);
            print_response(&mut stdout, &agent.welcome(&mut session)?)?;
            session
        }
    };

    for line in std::io::stdin().lock().lines() {
        let line = line?;
        let input = line.trim();
        if input == QUIT_COMMAND {
            break;
        }
        if input.is_empty() {
            continue;
        }

        match agent.process_chat_input(&mut session, input)? {
            TurnReply::Responded { response, .. } => print_response(&mut stdout, &response)?,
            TurnReply::Unresolved => writeln!(stdout, "(no story matched)")?,
        }
    }

    if let Some(path) = session_path {
        session.save(&path)?;
        tracing::info!(path = %path.display(), "Session saved");
    }

    Ok(())
}

fn print_response(out: &mut impl Write, response: &ClientResponse) -> std::io::Result<()> {
    for command in response.commands() {
        match command.data().as_str() {
            Some(text) if command.command() == responsio_agent::TEXT_COMMAND => {
                writeln!(out, "{}", text)?
            }
            _ => writeln!(
                out,
                "{}",
                serde_json::json!({ "command": command.command(), "data": command.data() })
            )?,
        }
    }
    out.flush()
}
