//! Slash-command interpreter.
//!
//! The leading whitespace-delimited token of the trimmed input selects a
//! command from the registry. Every handled command appends exactly one
//! echo/response pair to the display transcript. Anything else, including
//! unknown `/x` tokens, is left for the normal chat path.

mod handlers;
mod registry;

pub use registry::{all_commands, find_command, Command, CommandInvocation, CommandKind};

use tracing::debug;

use crate::core::session::Session;

/// Run the command named by `raw_input`, if any. Returns whether it was handled.
pub async fn dispatch(session: &mut Session, raw_input: &str) -> bool {
    let trimmed = raw_input.trim();
    let Some(token) = trimmed.split_whitespace().next() else {
        return false;
    };
    let Some(name) = token.strip_prefix('/') else {
        return false;
    };
    let Some(command) = find_command(name) else {
        debug!(token, "Unknown command; sending as chat");
        return false;
    };

    let invocation = CommandInvocation {
        input: trimmed,
        args: trimmed[token.len()..].trim(),
    };
    debug!(command = command.name, args = invocation.args, "Dispatching command");

    match command.kind {
        CommandKind::Help => handlers::core::handle_help(session, invocation),
        CommandKind::Reset => handlers::core::handle_reset(session, invocation),
        CommandKind::Connect => handlers::config::handle_connect(session, invocation).await,
        CommandKind::SystemPrompt => handlers::config::handle_system_prompt(session, invocation),
        CommandKind::Temperature => handlers::config::handle_temperature(session, invocation),
        CommandKind::Backend => handlers::config::handle_backend(session, invocation),
    }
    true
}

/// The help text, generated from the registry.
pub fn help_text() -> String {
    let mut help = String::from("Help / TL;DR\n");
    for command in all_commands() {
        for usage in command.usages {
            help.push_str(&format!("- `{}`: {}\n", usage.syntax, usage.description));
        }
    }
    help.push_str("\nLong forms work too, e.g. `/help`, `/connect <host>`.");
    help
}
