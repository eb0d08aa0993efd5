//! Responsio command-line interface.

mod cli;

use clap::Parser;
use cli::{Cli, Commands, handle_chat_command, handle_validate_command};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let default_directive = if cli.verbose { "debug" } else { "warn" };
    responsio_core::observability::init_tracing(default_directive);

    match cli.command {
        Commands::Chat {
            file,
            user,
            session,
        } => handle_chat_command(file, user, session),
        Commands::Validate {
            file,
            format,
            strict,
            quiet,
        } => handle_validate_command(file, format, strict, quiet),
    }
}
